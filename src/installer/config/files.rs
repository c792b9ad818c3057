//! Top-level file entries.

use serde::Deserialize;

/// A file or glob copied into the installation.
///
/// Written either as a bare source path or as a mapping:
///
/// ```yaml
/// files:
///   - bin/app.exe
///   - source: docs/**
///     destination: $INSTDIR\docs
///   - download_url: https://example.com/runtime.zip
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "FileEntryRepr")]
pub struct FileEntry {
    /// Local path or glob, or an `http(s)` URL
    pub source: String,
    /// Default: `$INSTDIR`
    pub destination: String,
}

impl FileEntry {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Downloaded at install time rather than embedded.
pub(crate) fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Copied recursively (`**` glob).
pub(crate) fn is_recursive(source: &str) -> bool {
    source.contains("**")
}

pub(crate) fn default_destination() -> String {
    "$INSTDIR".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FileEntryRepr {
    Path(String),
    Full {
        #[serde(default)]
        source: String,
        #[serde(default)]
        download_url: String,
        #[serde(default = "default_destination")]
        destination: String,
    },
}

impl From<FileEntryRepr> for FileEntry {
    fn from(repr: FileEntryRepr) -> Self {
        match repr {
            FileEntryRepr::Path(source) => FileEntry::new(source, default_destination()),
            FileEntryRepr::Full {
                source,
                download_url,
                destination,
            } => {
                let source = if !download_url.is_empty() && !is_remote(&source) {
                    download_url
                } else {
                    source
                };
                FileEntry::new(source, destination)
            }
        }
    }
}
