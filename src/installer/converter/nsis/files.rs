//! File copy and removal.

use super::utils::{self, escape_nsis_string, file_name, install_path_field, path_field};
use crate::installer::{
    config::{is_recursive, is_remote},
    context::BuildContext,
    error::Result,
};

/// Emits `SetOutPath`/`File` lines, tracking the current output directory.
#[derive(Debug)]
pub struct FileCopier {
    outpath: String,
    every_source: bool,
}

impl FileCopier {
    /// Copier for a section that already set `$INSTDIR` as output path.
    ///
    /// With `every_source`, `SetOutPath` precedes every source even when the
    /// directory did not change.
    pub fn new(every_source: bool) -> Self {
        Self {
            outpath: "$INSTDIR".to_string(),
            every_source,
        }
    }

    /// Current output directory.
    pub fn outpath(&self) -> &str {
        &self.outpath
    }

    /// Switches the output directory, emitting `SetOutPath` when needed.
    pub fn set_outpath(&mut self, dir: String, lines: &mut Vec<String>) {
        if self.every_source || dir != self.outpath {
            lines.push(format!("SetOutPath \"{dir}\""));
            self.outpath = dir;
        }
    }

    /// Copies one source into `destination`.
    pub fn copy(
        &mut self,
        ctx: &BuildContext<'_>,
        source: &str,
        destination: &str,
        lines: &mut Vec<String>,
    ) -> Result<()> {
        self.set_outpath(install_path_field(ctx, destination)?, lines);

        let resolved = ctx.resolve(source)?;
        if is_remote(&resolved) {
            let name = utils::remote_file_name(&resolved)?;
            let url = escape_nsis_string(&resolved);
            let name = escape_nsis_string(&name);
            lines.extend([
                format!("inetc::get /CAPTION \"Downloading {name}\" \"{url}\" \"$OUTDIR\\{name}\" /END"),
                "Pop $0".to_string(),
                "StrCmp $0 \"OK\" +3".to_string(),
                format!("MessageBox MB_OK|MB_ICONSTOP \"Download of {name} failed: $0\" /SD IDOK"),
                "Abort".to_string(),
            ]);
        } else if is_recursive(&resolved) {
            lines.push(format!("File /r \"{}\"", path_field(ctx, source)?));
        } else {
            lines.push(format!("File \"{}\"", path_field(ctx, source)?));
        }
        Ok(())
    }
}

/// Collects uninstall lines for copied files.
///
/// Sources are fed in install order and removed in reverse.
#[derive(Debug, Default)]
pub struct FileRemoval {
    lines: Vec<String>,
    purge_install_dir: bool,
}

impl FileRemoval {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes one group of `(source, destination)` pairs, then every
    /// distinct destination directory below `$INSTDIR`, deepest first.
    pub fn remove_group<'s, I>(&mut self, ctx: &BuildContext<'_>, sources: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'s str, &'s str)>,
        I::IntoIter: DoubleEndedIterator,
    {
        let mut dirs: Vec<String> = Vec::new();
        for (source, destination) in sources.into_iter().rev() {
            let dir = install_path_field(ctx, destination)?;
            let resolved = ctx.resolve(source)?;
            let is_install_dir = dir == "$INSTDIR";

            if is_remote(&resolved) {
                let name = escape_nsis_string(&utils::remote_file_name(&resolved)?);
                self.lines.push(format!("Delete \"{dir}\\{name}\""));
            } else if is_recursive(&resolved) {
                if is_install_dir {
                    self.purge_install_dir = true;
                } else {
                    self.lines.push(format!("RMDir /r \"{dir}\""));
                }
                continue;
            } else {
                let local = path_field(ctx, source)?;
                self.lines.push(format!("Delete \"{dir}\\{}\"", file_name(&local)));
            }
            if !is_install_dir && !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        self.lines
            .extend(dirs.into_iter().map(|dir| format!("RMDir \"{dir}\"")));
        Ok(())
    }

    /// Final `$INSTDIR` removal: recursive when a `**` source was copied
    /// straight into it.
    pub fn install_dir_removal(&self) -> String {
        if self.purge_install_dir {
            "RMDir /r \"$INSTDIR\"".to_string()
        } else {
            "RMDir \"$INSTDIR\"".to_string()
        }
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
