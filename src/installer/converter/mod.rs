//! Converters from a package description to installer-builder scripts.
//!
//! A [`Converter`] turns a [`BuildContext`] into the complete script text for
//! one target tool. Conversion is pure: no I/O, no hidden state, identical
//! output for identical input, so dry-run previews and written files always
//! agree. [`save`] is the only operation here that touches the filesystem.

pub mod nsis;
pub mod registry;
mod script;

pub use nsis::NsisConverter;
pub use registry::{ConverterFactory, ConverterRegistry};
pub use script::GeneratedScript;

use crate::installer::{
    context::BuildContext,
    error::{ErrorExt, Result},
    variables::ToolId,
};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// UTF-8 byte order mark.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Renders a package description for one target tool.
pub trait Converter: Send + Sync {
    /// Tool this converter generates scripts for.
    fn tool(&self) -> ToolId;

    /// Generates the full script text.
    fn convert(&self, ctx: &BuildContext<'_>) -> Result<String>;

    /// Extension of the generated script, including the dot.
    fn output_extension(&self) -> &'static str {
        self.tool().script_extension()
    }
}

/// Converts and writes the script with a UTF-8 byte order mark.
///
/// The script is generated completely in memory first; nothing is written
/// when conversion fails.
pub async fn save(converter: &dyn Converter, ctx: &BuildContext<'_>, path: &Path) -> Result<()> {
    let content = converter.convert(ctx)?;
    write_utf8_bom(path, &content).await?;
    log::info!("wrote {} script to {}", converter.tool(), path.display());
    Ok(())
}

/// Write file with UTF-8 BOM.
///
/// NSIS reads scripts as ANSI unless they start with a BOM (EF BB BF).
pub async fn write_utf8_bom(path: &Path, content: &str) -> Result<()> {
    let mut file = tokio::fs::File::create(path)
        .await
        .fs_context("creating script file", path)?;

    file.write_all(&UTF8_BOM)
        .await
        .fs_context("writing UTF-8 BOM", path)?;
    file.write_all(content.as_bytes())
        .await
        .fs_context("writing script content", path)?;
    file.flush().await.fs_context("flushing script file", path)?;

    Ok(())
}
