//! Reference resolution for package description strings.
//!
//! Two reference grammars are interleaved in every string field:
//!
//! - `${variables.NAME}` and `${a.b.c}` point into the package document
//! - `$NAME` names a builtin location, translated per target tool
//!
//! `$$` escapes a literal dollar sign. Resolution runs in two strictly ordered
//! passes: [`Resolver::expand_references`] expands every `${...}` (recursively,
//! guarded against cycles), then [`Resolver::substitute_builtins`] converts
//! builtins. The order matters because an expanded value may itself
//! introduce builtins such as `$APPDATA`, which still need the tool's
//! native spelling.

mod frame;
mod path;
mod scanner;

use crate::installer::{
    error::{Error, Result},
    variables::{BuiltinTable, ToolId},
};
use frame::ResolutionFrame;
use scanner::{Token, tokenize};
use serde_json::Value;

/// Prefix of references that address the `variables` mapping.
const VARIABLES_PREFIX: &str = "variables.";

/// Policy for `${...}` references that do not resolve.
///
/// Unknown `$NAME` builtins always pass through unchanged regardless of this
/// setting; cycles always fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Keep the reference text verbatim.
    #[default]
    Lenient,
    /// Fail with [`Error::UnresolvedReference`].
    Strict,
}

/// Resolves references against one package document for one target tool.
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    tool: ToolId,
    builtins: &'a BuiltinTable,
    document: &'a Value,
    strictness: Strictness,
}

impl<'a> Resolver<'a> {
    /// Creates a lenient resolver over the standard builtin table.
    pub fn new(tool: ToolId, document: &'a Value) -> Self {
        Self {
            tool,
            builtins: BuiltinTable::standard(),
            document,
            strictness: Strictness::default(),
        }
    }

    /// Replaces the builtin table.
    pub fn with_builtins(mut self, builtins: &'a BuiltinTable) -> Self {
        self.builtins = builtins;
        self
    }

    /// Sets the unresolved-reference policy.
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn tool(&self) -> ToolId {
        self.tool
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Fully resolves `text`: references first, then builtins.
    ///
    /// Strings without a `$` are returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`Error::CyclicReference`] when a reference chain revisits itself
    /// - [`Error::UnresolvedReference`] for a missing path under
    ///   [`Strictness::Strict`]
    pub fn resolve(&self, text: &str) -> Result<String> {
        if !text.contains('$') {
            return Ok(text.to_string());
        }
        let expanded = self.expand_references(text)?;
        Ok(self.substitute_builtins(&expanded))
    }

    /// First pass: expands every `${...}` reference.
    ///
    /// `$$` and `$NAME` are kept exactly as written so the second pass sees
    /// them untouched.
    pub fn expand_references(&self, text: &str) -> Result<String> {
        let mut frame = ResolutionFrame::default();
        self.expand(text, &mut frame)
    }

    /// Second pass: converts `$$` to `$` and builtins to tool tokens.
    ///
    /// Unknown builtins and any `${...}` left over by lenient expansion are
    /// copied verbatim.
    pub fn substitute_builtins(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for token in tokenize(text) {
            match token {
                Token::Text(t) => out.push_str(t),
                Token::Escape => out.push('$'),
                Token::Builtin { name, raw } => {
                    out.push_str(self.builtins.lookup(name, self.tool).unwrap_or(raw))
                }
                Token::Reference { raw, .. } => out.push_str(raw),
            }
        }
        out
    }

    /// References in `text` that would not resolve.
    ///
    /// Reports unknown `${...}` paths and unknown `$NAME` builtins by their
    /// raw spelling. Referenced values are not followed.
    pub fn find_unresolved(&self, text: &str) -> Vec<String> {
        tokenize(text)
            .into_iter()
            .filter_map(|token| match token {
                Token::Reference { path, raw } if self.lookup(path).is_none() => {
                    Some(raw.to_string())
                }
                Token::Builtin { name, raw } if self.builtins.get(name).is_none() => {
                    Some(raw.to_string())
                }
                _ => None,
            })
            .collect()
    }

    /// Unresolved references in every string leaf of the document.
    ///
    /// Returns `(json pointer, reference)` pairs in document order.
    pub fn unresolved_in_document(&self) -> Vec<(String, String)> {
        let mut findings = Vec::new();
        self.collect_unresolved(self.document, String::new(), &mut findings);
        findings
    }

    fn collect_unresolved(&self, node: &Value, pointer: String, out: &mut Vec<(String, String)>) {
        match node {
            Value::String(text) => out.extend(
                self.find_unresolved(text)
                    .into_iter()
                    .map(|reference| (pointer.clone(), reference)),
            ),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.collect_unresolved(item, format!("{pointer}/{i}"), out);
                }
            }
            Value::Object(map) => {
                for (key, value) in map {
                    let escaped = key.replace('~', "~0").replace('/', "~1");
                    self.collect_unresolved(value, format!("{pointer}/{escaped}"), out);
                }
            }
            _ => {}
        }
    }

    fn expand(&self, text: &str, frame: &mut ResolutionFrame) -> Result<String> {
        let mut out = String::with_capacity(text.len());
        for token in tokenize(text) {
            match token {
                Token::Text(t) => out.push_str(t),
                Token::Escape => out.push_str("$$"),
                Token::Builtin { raw, .. } => out.push_str(raw),
                Token::Reference { path, raw } => {
                    frame.enter(path)?;
                    log::trace!("expanding `{raw}` at depth {}", frame.depth());
                    let expanded = match self.lookup(path) {
                        Some(value) => self.expand(&value, frame).map(Some),
                        None => Ok(None),
                    };
                    frame.leave();

                    match expanded? {
                        Some(value) => out.push_str(&value),
                        None => match self.strictness {
                            Strictness::Strict => {
                                return Err(Error::UnresolvedReference {
                                    reference: raw.to_string(),
                                });
                            }
                            Strictness::Lenient => {
                                log::warn!("leaving unresolved reference `{raw}` in place");
                                out.push_str(raw);
                            }
                        },
                    }
                }
            }
        }
        Ok(out)
    }

    /// Raw text behind a reference path, before its own expansion.
    fn lookup(&self, path: &str) -> Option<String> {
        let node = match path.strip_prefix(VARIABLES_PREFIX) {
            // Variable names may themselves contain dots.
            Some(name) => self.document.get("variables")?.get(name),
            None => path::lookup(self.document, path),
        }?;
        path::scalar_text(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "app": {"name": "MyApp", "version": "1.2.0", "publisher": "ACME"},
            "install": {"install_dir": "$PROGRAMFILES64\\${app.name}"},
            "files": [{"source": "bin/app.exe"}],
            "variables": {
                "DATA_DIR": "$APPDATA\\${app.publisher}",
                "LOG_DIR": "${variables.DATA_DIR}\\logs",
                "PORT": 8080,
                "dotted.name": "ok"
            }
        })
    }

    #[test]
    fn test_identity_without_dollar() {
        let doc = doc();
        let resolver = Resolver::new(ToolId::Nsis, &doc);
        for s in ["", "plain", "C:\\Program Files\\x", "{app.name}", "100%"] {
            assert_eq!(resolver.resolve(s).unwrap(), s);
        }
    }

    #[test]
    fn test_escape_produces_literal_dollar() {
        let doc = doc();
        let resolver = Resolver::new(ToolId::Wix, &doc);
        assert_eq!(resolver.resolve("$$literal").unwrap(), "$literal");
        assert_eq!(resolver.resolve("$$INSTDIR").unwrap(), "$INSTDIR");
        assert_eq!(resolver.resolve("$${app.name}").unwrap(), "${app.name}");
        assert_eq!(resolver.resolve("$$").unwrap(), "$");
    }

    #[test]
    fn test_config_path() {
        let doc = doc();
        let resolver = Resolver::new(ToolId::Nsis, &doc);
        assert_eq!(resolver.resolve("${app.name}").unwrap(), "MyApp");
        assert_eq!(
            resolver.resolve("${app.name} v${app.version}").unwrap(),
            "MyApp v1.2.0"
        );
        assert_eq!(resolver.resolve("${files.0.source}").unwrap(), "bin/app.exe");
    }

    #[test]
    fn test_config_path_value_is_resolved() {
        let doc = doc();
        let resolver = Resolver::new(ToolId::Inno, &doc);
        assert_eq!(
            resolver.resolve("${install.install_dir}").unwrap(),
            "{pf64}\\MyApp"
        );
    }

    #[test]
    fn test_builtin_per_tool() {
        let doc = doc();
        assert_eq!(
            Resolver::new(ToolId::Nsis, &doc).resolve("$INSTDIR").unwrap(),
            "$INSTDIR"
        );
        assert_eq!(
            Resolver::new(ToolId::Wix, &doc).resolve("$INSTDIR").unwrap(),
            "[INSTALLDIR]"
        );
        assert_eq!(
            Resolver::new(ToolId::Inno, &doc).resolve("$INSTDIR\\bin").unwrap(),
            "{app}\\bin"
        );
    }

    #[test]
    fn test_unknown_builtin_passes_through() {
        let doc = doc();
        let resolver = Resolver::new(ToolId::Wix, &doc).with_strictness(Strictness::Strict);
        assert_eq!(resolver.resolve("$R0 and $HOME").unwrap(), "$R0 and $HOME");
    }

    #[test]
    fn test_variable_chain_reintroduces_builtin() {
        let doc = doc();
        let resolver = Resolver::new(ToolId::Wix, &doc);
        assert_eq!(
            resolver.resolve("${variables.LOG_DIR}").unwrap(),
            "[AppDataFolder]\\ACME\\logs"
        );
    }

    #[test]
    fn test_numeric_and_dotted_variables() {
        let doc = doc();
        let resolver = Resolver::new(ToolId::Nsis, &doc);
        assert_eq!(resolver.resolve("port=${variables.PORT}").unwrap(), "port=8080");
        assert_eq!(resolver.resolve("${variables.dotted.name}").unwrap(), "ok");
    }

    #[test]
    fn test_self_reference_is_cyclic() {
        let doc = json!({"variables": {"A": "${variables.A}"}});
        let err = Resolver::new(ToolId::Nsis, &doc)
            .resolve("${variables.A}")
            .unwrap_err();
        assert!(matches!(err, Error::CyclicReference { ref reference, .. } if reference == "variables.A"));
    }

    #[test]
    fn test_mutual_cycle_names_both() {
        let doc = json!({"variables": {"A": "x${variables.B}", "B": "y${variables.A}"}});
        let err = Resolver::new(ToolId::Nsis, &doc)
            .resolve("${variables.A}")
            .unwrap_err();
        match err {
            Error::CyclicReference { chain, .. } => {
                assert!(chain.contains(&"variables.A".to_string()));
                assert!(chain.contains(&"variables.B".to_string()));
                assert_eq!(chain.first(), chain.last());
            }
            other => panic!("expected cycle, got {other}"),
        }
    }

    #[test]
    fn test_cycle_through_config_path() {
        let doc = json!({"app": {"name": "${variables.N}"}, "variables": {"N": "${app.name}"}});
        let err = Resolver::new(ToolId::Nsis, &doc).resolve("${app.name}").unwrap_err();
        assert!(matches!(err, Error::CyclicReference { .. }));
    }

    #[test]
    fn test_cycle_fails_even_when_lenient() {
        let doc = json!({"variables": {"A": "${variables.A}"}});
        let resolver = Resolver::new(ToolId::Nsis, &doc).with_strictness(Strictness::Lenient);
        assert!(resolver.resolve("${variables.A}").is_err());
    }

    #[test]
    fn test_repeated_reference_is_not_a_cycle() {
        let doc = doc();
        let resolver = Resolver::new(ToolId::Nsis, &doc);
        assert_eq!(
            resolver.resolve("${app.name}/${app.name}").unwrap(),
            "MyApp/MyApp"
        );
    }

    #[test]
    fn test_unresolved_lenient_keeps_text() {
        let doc = doc();
        let resolver = Resolver::new(ToolId::Wix, &doc);
        assert_eq!(
            resolver.resolve("${app.missing}\\$INSTDIR").unwrap(),
            "${app.missing}\\[INSTALLDIR]"
        );
        assert_eq!(resolver.resolve("${variables.NOPE}").unwrap(), "${variables.NOPE}");
    }

    #[test]
    fn test_unresolved_strict_fails() {
        let doc = doc();
        let resolver = Resolver::new(ToolId::Nsis, &doc).with_strictness(Strictness::Strict);
        let err = resolver.resolve("x ${app.missing}").unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference { ref reference } if reference == "${app.missing}"));
    }

    #[test]
    fn test_container_values_do_not_resolve() {
        let doc = doc();
        let resolver = Resolver::new(ToolId::Nsis, &doc).with_strictness(Strictness::Strict);
        assert!(resolver.resolve("${app}").is_err());
    }

    #[test]
    fn test_passes_are_independent() {
        let doc = doc();
        let resolver = Resolver::new(ToolId::Wix, &doc);
        let expanded = resolver.expand_references("$$x $INSTDIR ${app.name}").unwrap();
        assert_eq!(expanded, "$$x $INSTDIR MyApp");
        assert_eq!(resolver.substitute_builtins(&expanded), "$x [INSTALLDIR] MyApp");
    }

    #[test]
    fn test_escaped_value_is_not_substituted_twice() {
        let doc = json!({"variables": {"LITERAL": "$$INSTDIR"}});
        let resolver = Resolver::new(ToolId::Wix, &doc);
        assert_eq!(resolver.resolve("${variables.LITERAL}").unwrap(), "$INSTDIR");
    }

    #[test]
    fn test_find_unresolved() {
        let doc = doc();
        let resolver = Resolver::new(ToolId::Nsis, &doc);
        assert_eq!(
            resolver.find_unresolved("${app.name} ${app.nope} $INSTDIR $NOPE $$ESC"),
            vec!["${app.nope}", "$NOPE"]
        );
    }

    #[test]
    fn test_unresolved_in_document_reports_pointer() {
        let doc = json!({"install": {"shortcuts": [{"target": "${app.exe}"}]}, "app": {"name": "A"}});
        let findings = Resolver::new(ToolId::Nsis, &doc).unresolved_in_document();
        assert_eq!(
            findings,
            vec![("/install/shortcuts/0/target".to_string(), "${app.exe}".to_string())]
        );
    }
}
