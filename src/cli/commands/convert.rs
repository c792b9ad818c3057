//! `ypack convert`: package description to installer script.

use crate::cli::{ConvertArgs, RuntimeConfig};
use crate::error::Result;
use crate::installer::{
    self, BuildContext, Strictness, ToolId,
    converter::{self, registry},
};
use std::io::Write;

pub(super) async fn execute_convert(args: &ConvertArgs, runtime: &RuntimeConfig) -> Result<i32> {
    // Pick the backend before touching the description so an unknown
    // format fails without any generation work.
    let tool: ToolId = args.format.parse()?;
    let backend = registry::global().create(tool)?;

    let (package, document) = installer::config::load(&args.config)?;
    let strictness = if args.strict {
        Strictness::Strict
    } else {
        Strictness::Lenient
    };
    let ctx = BuildContext::builder()
        .tool(tool)
        .config(&package)
        .document(&document)
        .strictness(strictness)
        .build()?;

    if args.dry_run {
        let script = backend.convert(&ctx)?;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(script.as_bytes())?;
        stdout.flush()?;
        return Ok(0);
    }

    let output = args.output_path(backend.output_extension());
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    converter::save(backend.as_ref(), &ctx, &output).await?;

    runtime.success(&format!(
        "Wrote {tool} script for {} to {}",
        package.app.name,
        output.display()
    ))?;
    Ok(0)
}
