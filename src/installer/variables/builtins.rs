//! Builtin variable table.
//!
//! Maps tool-neutral location identifiers (`$INSTDIR`, `$APPDATA`, ...) to the
//! native spelling of every supported target tool. Adding a target tool means
//! adding one column to [`BuiltinVariable`] and one arm to
//! [`BuiltinVariable::token`]; call sites never change.

use super::ToolId;
use crate::installer::error::{Error, Result};
use std::{collections::HashMap, sync::LazyLock};

/// One builtin identifier and its per-tool tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinVariable {
    /// Identifier as written after `$` in a package description
    pub identifier: &'static str,
    /// Human readable meaning
    pub description: &'static str,
    /// NSIS token
    pub nsis: &'static str,
    /// WiX token
    pub wix: &'static str,
    /// Inno Setup token
    pub inno: &'static str,
}

impl BuiltinVariable {
    /// Native token for `tool`.
    pub fn token(&self, tool: ToolId) -> &'static str {
        match tool {
            ToolId::Nsis => self.nsis,
            ToolId::Wix => self.wix,
            ToolId::Inno => self.inno,
        }
    }
}

const fn builtin(
    identifier: &'static str,
    description: &'static str,
    nsis: &'static str,
    wix: &'static str,
    inno: &'static str,
) -> BuiltinVariable {
    BuiltinVariable {
        identifier,
        description,
        nsis,
        wix,
        inno,
    }
}

/// Entries of the standard table, in documentation order.
pub const STANDARD_BUILTINS: &[BuiltinVariable] = &[
    builtin("INSTDIR", "Installation directory chosen by user", "$INSTDIR", "[INSTALLDIR]", "{app}"),
    builtin(
        "PROGRAMFILES",
        "Program Files folder (32-bit on 64-bit systems)",
        "$PROGRAMFILES",
        "[ProgramFilesFolder]",
        "{pf}",
    ),
    builtin(
        "PROGRAMFILES64",
        "Program Files folder (64-bit)",
        "$PROGRAMFILES64",
        "[ProgramFiles64Folder]",
        "{pf64}",
    ),
    builtin("APPDATA", "Application Data folder (roaming)", "$APPDATA", "[AppDataFolder]", "{userappdata}"),
    builtin(
        "LOCALAPPDATA",
        "Local Application Data folder (non-roaming)",
        "$LOCALAPPDATA",
        "[LocalAppDataFolder]",
        "{localappdata}",
    ),
    builtin("DESKTOP", "Desktop folder", "$DESKTOP", "[DesktopFolder]", "{userdesktop}"),
    builtin("STARTMENU", "Start Menu folder", "$STARTMENU", "[StartMenuFolder]", "{userstartmenu}"),
    builtin("SMPROGRAMS", "Start Menu Programs folder", "$SMPROGRAMS", "[ProgramMenuFolder]", "{userprograms}"),
    builtin("TEMP", "Temporary folder", "$TEMP", "[TempFolder]", "{tmp}"),
    builtin("WINDIR", "Windows directory", "$WINDIR", "[WindowsFolder]", "{win}"),
    builtin("SYSDIR", "System32 directory", "$SYSDIR", "[SystemFolder]", "{sys}"),
    builtin("COMMONFILES", "Common Files folder", "$COMMONFILES", "[CommonFilesFolder]", "{cf}"),
    builtin(
        "COMMONFILES64",
        "Common Files folder (64-bit)",
        "$COMMONFILES64",
        "[CommonFiles64Folder]",
        "{cf64}",
    ),
    builtin("DOCUMENTS", "My Documents folder", "$DOCUMENTS", "[PersonalFolder]", "{userdocs}"),
];

static STANDARD_TABLE: LazyLock<BuiltinTable> = LazyLock::new(|| {
    BuiltinTable::new(STANDARD_BUILTINS)
        .unwrap_or_else(|e| panic!("standard builtin table is malformed: {e}"))
});

/// Immutable identifier → [`BuiltinVariable`] table.
#[derive(Debug, Clone)]
pub struct BuiltinTable {
    entries: &'static [BuiltinVariable],
    index: HashMap<&'static str, usize>,
}

impl BuiltinTable {
    /// Builds a table, rejecting repeated identifiers.
    pub fn new(entries: &'static [BuiltinVariable]) -> Result<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if index.insert(entry.identifier, position).is_some() {
                return Err(Error::DuplicateBuiltin(entry.identifier.to_string()));
            }
        }
        Ok(Self { entries, index })
    }

    /// Process-wide standard table, initialised on first use.
    pub fn standard() -> &'static BuiltinTable {
        &STANDARD_TABLE
    }

    /// Entry for `identifier`.
    pub fn get(&self, identifier: &str) -> Option<&'static BuiltinVariable> {
        let entries = self.entries;
        self.index.get(identifier).map(|&position| &entries[position])
    }

    /// Native token of `identifier` for `tool`, if the identifier is known.
    pub fn lookup(&self, identifier: &str, tool: ToolId) -> Option<&'static str> {
        self.get(identifier).map(|entry| entry.token(tool))
    }

    /// Entries in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &'static BuiltinVariable> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
