//! `ypack formats`: known target formats.

use crate::error::Result;
use crate::installer::{ToolId, converter::registry};

pub(super) fn execute_formats() -> Result<i32> {
    let backends = registry::global();
    for tool in ToolId::ALL {
        let status = if backends.contains(tool) {
            "available"
        } else {
            "not implemented"
        };
        println!("{:<6} {:<5} {status}", tool.name(), tool.script_extension());
    }
    Ok(0)
}
