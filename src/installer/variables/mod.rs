//! Builtin location variables and target tool identifiers.

mod builtins;
mod tool;

pub use builtins::{BuiltinTable, BuiltinVariable, STANDARD_BUILTINS};
pub use tool::ToolId;
