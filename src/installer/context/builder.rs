//! Builder for constructing BuildContext.

use super::BuildContext;
use crate::installer::{
    config::PackageConfig,
    error::{Context, Result},
    resolver::{Resolver, Strictness},
    variables::{BuiltinTable, ToolId},
};
use serde_json::Value;

/// Builder for constructing [`BuildContext`].
///
/// # Examples
///
/// ```no_run
/// use ypack::installer::{BuildContext, Strictness, ToolId, config};
///
/// # fn example() -> ypack::installer::Result<()> {
/// let (package, document) = config::from_yaml_str("app: {name: Demo}")?;
/// let ctx = BuildContext::builder()
///     .tool(ToolId::Nsis)
///     .config(&package)
///     .document(&document)
///     .strictness(Strictness::Strict)
///     .build()?;
/// assert_eq!(ctx.resolve("${app.name}")?, "Demo");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct BuildContextBuilder<'a> {
    tool: Option<ToolId>,
    config: Option<&'a PackageConfig>,
    document: Option<&'a Value>,
    strictness: Strictness,
    builtins: Option<&'a BuiltinTable>,
}

impl<'a> BuildContextBuilder<'a> {
    /// Creates a new builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the target tool.
    ///
    /// # Required
    pub fn tool(mut self, tool: ToolId) -> Self {
        self.tool = Some(tool);
        self
    }

    /// Sets the typed package description.
    ///
    /// # Required
    pub fn config(mut self, config: &'a PackageConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the raw document references are resolved against.
    ///
    /// # Required
    pub fn document(mut self, document: &'a Value) -> Self {
        self.document = Some(document);
        self
    }

    /// Sets the unresolved-reference policy.
    ///
    /// Default: [`Strictness::Lenient`]
    pub fn strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Sets the builtin table `$NAME` references are looked up in.
    ///
    /// Default: [`BuiltinTable::standard`]
    pub fn builtins(mut self, builtins: &'a BuiltinTable) -> Self {
        self.builtins = Some(builtins);
        self
    }

    /// Builds the context.
    ///
    /// # Errors
    ///
    /// Returns an error if `tool`, `config` or `document` is missing.
    pub fn build(self) -> Result<BuildContext<'a>> {
        let tool = self.tool.context("tool is required")?;
        let config = self.config.context("config is required")?;
        let document = self.document.context("document is required")?;

        let mut resolver = Resolver::new(tool, document).with_strictness(self.strictness);
        if let Some(builtins) = self.builtins {
            resolver = resolver.with_builtins(builtins);
        }
        Ok(BuildContext::from_resolver(config, document, resolver))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::{config::from_yaml_str, error::Error, variables::BuiltinVariable};

    static SOURCE_DIR: [BuiltinVariable; 1] = [BuiltinVariable {
        identifier: "SRCDIR",
        description: "Folder the installer was started from",
        nsis: "$EXEDIR",
        wix: "[SourceDir]",
        inno: "{src}",
    }];

    #[test]
    fn test_missing_parts_are_reported() {
        let err = BuildContextBuilder::new().tool(ToolId::Nsis).build().unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m == "config is required"));
    }

    #[test]
    fn test_strictness_is_applied() {
        let (config, document) = from_yaml_str("app: {name: Demo}").unwrap();
        let ctx = BuildContextBuilder::new()
            .tool(ToolId::Inno)
            .config(&config)
            .document(&document)
            .strictness(Strictness::Strict)
            .build()
            .unwrap();
        assert_eq!(ctx.resolver().strictness(), Strictness::Strict);
        assert!(ctx.resolve("${app.nope}").is_err());
    }

    #[test]
    fn test_custom_builtin_table() {
        let table = BuiltinTable::new(&SOURCE_DIR).unwrap();
        let (config, document) = from_yaml_str("app: {name: Demo}").unwrap();
        let ctx = BuildContextBuilder::new()
            .tool(ToolId::Inno)
            .config(&config)
            .document(&document)
            .builtins(&table)
            .build()
            .unwrap();
        assert_eq!(ctx.resolve("$SRCDIR\\setup.ini").unwrap(), "{src}\\setup.ini");
        // Only the custom table is consulted.
        assert_eq!(ctx.resolve("$INSTDIR").unwrap(), "$INSTDIR");
    }
}
