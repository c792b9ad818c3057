//! Target tool identifiers.

use crate::installer::error::Error;
use std::{fmt, str::FromStr};

/// Installer-builder technology a script is generated for.
///
/// Each variant owns one column of the builtin variable table and one
/// entry of tool conventions (script extension, path separator, define
/// reference syntax).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolId {
    /// Nullsoft Scriptable Install System
    Nsis,
    /// WiX Toolset
    Wix,
    /// Inno Setup
    Inno,
}

impl ToolId {
    /// All known tools, in declaration order.
    pub const ALL: [ToolId; 3] = [ToolId::Nsis, ToolId::Wix, ToolId::Inno];

    /// Lowercase name used on the command line and in `custom_includes`.
    pub fn name(self) -> &'static str {
        match self {
            ToolId::Nsis => "nsis",
            ToolId::Wix => "wix",
            ToolId::Inno => "inno",
        }
    }

    /// Extension of the generated script, including the dot.
    pub fn script_extension(self) -> &'static str {
        match self {
            ToolId::Nsis => ".nsi",
            ToolId::Wix => ".wxs",
            ToolId::Inno => ".iss",
        }
    }

    /// Directory separator used for paths emitted into the script.
    ///
    /// NSIS and Inno Setup scripts are compiled on Windows and expect
    /// backslashes. WiX source paths are resolved by MSBuild, which accepts
    /// forward slashes on every host.
    pub fn path_separator(self) -> char {
        match self {
            ToolId::Nsis | ToolId::Inno => '\\',
            ToolId::Wix => '/',
        }
    }

    /// Reference to a compile-time define in the tool's macro syntax.
    pub fn define_reference(self, name: &str) -> String {
        match self {
            ToolId::Nsis => format!("${{{name}}}"),
            ToolId::Wix => format!("$(var.{name})"),
            ToolId::Inno => format!("{{#{name}}}"),
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nsis" => Ok(ToolId::Nsis),
            "wix" => Ok(ToolId::Wix),
            "inno" | "innosetup" => Ok(ToolId::Inno),
            _ => Err(Error::UnknownTool(s.to_string())),
        }
    }
}
