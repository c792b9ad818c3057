//! `ypack validate`: reference check without writing anything.

use crate::cli::{RuntimeConfig, ValidateArgs};
use crate::error::Result;
use crate::installer::{
    self, BuildContext, Resolver, Strictness, ToolId, converter::registry,
};

/// Exit code 1 when any reference is unresolved.
///
/// A clean document is also converted strictly in memory when the format
/// has a backend, which surfaces reference cycles and unusable values.
pub(super) fn execute_validate(args: &ValidateArgs, runtime: &RuntimeConfig) -> Result<i32> {
    let tool: ToolId = args.format.parse()?;
    let (package, document) = installer::config::load(&args.config)?;

    let findings = Resolver::new(tool, &document).unresolved_in_document();
    if !findings.is_empty() {
        runtime.warn(&format!(
            "{} unresolved reference(s) in {}",
            findings.len(),
            args.config.display()
        ))?;
        for (pointer, reference) in &findings {
            runtime.indent(&format!("{pointer}: {reference}"))?;
        }
        return Ok(1);
    }

    let backends = registry::global();
    if backends.contains(tool) {
        let ctx = BuildContext::with_strictness(tool, &package, &document, Strictness::Strict);
        backends.create(tool)?.convert(&ctx)?;
    } else {
        runtime.info(&format!("no {tool} backend; skipped the conversion check"))?;
    }

    runtime.success(&format!("{} is valid for {tool}", args.config.display()))?;
    Ok(0)
}
