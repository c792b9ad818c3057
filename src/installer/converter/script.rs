//! Assembled script text.

/// Ordered, labelled fragments of a generated script.
///
/// Labels name the region a fragment came from (`header`, `install`,
/// `uninstall`, ...) so callers and tests can inspect one region without
/// re-parsing the rendered text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedScript {
    fragments: Vec<Fragment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fragment {
    label: &'static str,
    lines: Vec<String>,
}

impl GeneratedScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fragment. Empty fragments are dropped.
    pub fn push(&mut self, label: &'static str, lines: Vec<String>) {
        if !lines.is_empty() {
            self.fragments.push(Fragment { label, lines });
        }
    }

    /// Lines of the first fragment labelled `label`.
    pub fn fragment(&self, label: &str) -> Option<&[String]> {
        self.fragments
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.lines.as_slice())
    }

    /// Fragment labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fragments.iter().map(|f| f.label)
    }

    /// Joins all fragments, one line per row, blank line between fragments.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, fragment) in self.fragments.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for line in &fragment.lines {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_separates_fragments() {
        let mut script = GeneratedScript::new();
        script.push("header", vec!["Unicode true".into()]);
        script.push("empty", Vec::new());
        script.push("install", vec!["Section".into(), "SectionEnd".into()]);

        assert_eq!(script.render(), "Unicode true\n\nSection\nSectionEnd\n");
        assert_eq!(script.labels().collect::<Vec<_>>(), vec!["header", "install"]);
        assert!(script.fragment("empty").is_none());
    }
}
