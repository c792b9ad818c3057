//! Script-level helper functions and macros.

use super::utils::field;
use crate::installer::{context::BuildContext, error::Result};

/// Whole-entry search in a `;`-delimited list.
///
/// Stack in: list, entry (entry on top). Out: `$R9` is `1` when found.
const STR_CONTAINS: &str = r#"Function _StrContains
  Exch $R1
  Exch
  Exch $R2
  Push $R3
  Push $R4
  Push $R5
  StrCpy $R2 ";$R2;"
  StrCpy $R1 ";$R1;"
  StrLen $R3 $R1
  StrCpy $R4 0
  StrCpy $R9 "0"
  contains_loop:
    StrCpy $R5 $R2 $R3 $R4
    StrCmp $R5 "" contains_done
    StrCmp $R5 $R1 contains_found
    IntOp $R4 $R4 + 1
    Goto contains_loop
  contains_found:
    StrCpy $R9 "1"
  contains_done:
  Pop $R5
  Pop $R4
  Pop $R3
  Pop $R2
  Pop $R1
FunctionEnd"#;

/// Removes every occurrence of entry `$1` from list `$0`, result in `$0`.
///
/// Neighbouring entries are kept intact; an emptied list comes back as "".
const REMOVE_PATH_ENTRY: &str = r#"Function un._RemovePathEntry
  Push $R1
  Push $R2
  Push $R3
  Push $R4
  Push $R5
  StrCpy $R1 ";$0;"
  StrCpy $R2 ";$1;"
  StrLen $R3 $R2
  StrCpy $R4 0
  remove_loop:
    StrCpy $R5 $R1 $R3 $R4
    StrCmp $R5 "" remove_done
    StrCmp $R5 $R2 remove_found
    IntOp $R4 $R4 + 1
    Goto remove_loop
  remove_found:
    StrCpy $R5 $R1 $R4
    IntOp $R4 $R4 + $R3
    StrCpy $R1 $R1 "" $R4
    StrCpy $R1 "$R5;$R1"
    StrCpy $R4 0
    Goto remove_loop
  remove_done:
  StrCpy $R1 $R1 "" 1
  StrCpy $R1 $R1 -1
  StrCpy $0 $R1
  Pop $R5
  Pop $R4
  Pop $R3
  Pop $R2
  Pop $R1
FunctionEnd"#;

/// PATH-style list helpers.
pub fn path_helpers() -> Vec<String> {
    let mut lines = vec!["; PATH helpers".to_string()];
    lines.extend(STR_CONTAINS.lines().map(str::to_string));
    lines.push(String::new());
    lines.extend(REMOVE_PATH_ENTRY.lines().map(str::to_string));
    lines
}

/// `LogInit`, `LogWrite` and `LogClose` over one global file handle.
pub fn log_macros(ctx: &BuildContext<'_>) -> Result<Vec<String>> {
    let Some(logging) = ctx.config().logging.as_ref().filter(|l| l.enabled) else {
        return Ok(Vec::new());
    };
    let path = field(ctx, &logging.path)?;
    let level = field(ctx, &logging.level.to_ascii_uppercase())?;

    Ok(vec![
        "; Install log".to_string(),
        "Var YpackLogHandle".to_string(),
        String::new(),
        "!macro LogInit".to_string(),
        format!("  ${{GetParent}} \"{path}\" $R0"),
        "  CreateDirectory $R0".to_string(),
        format!("  FileOpen $YpackLogHandle \"{path}\" a"),
        "  FileSeek $YpackLogHandle 0 END".to_string(),
        "!macroend".to_string(),
        String::new(),
        "!macro LogWrite text".to_string(),
        format!("  FileWrite $YpackLogHandle \"[{level}] ${{text}}$\\r$\\n\""),
        "!macroend".to_string(),
        String::new(),
        "!macro LogClose".to_string(),
        "  FileClose $YpackLogHandle".to_string(),
        "!macroend".to_string(),
    ])
}
