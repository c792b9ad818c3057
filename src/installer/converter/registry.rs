//! Converter registry.
//!
//! Maps target tools to converter factories so front ends can pick a backend
//! by name without depending on any backend directly. Adding a backend is a
//! single [`ConverterRegistry::register`] call.

use super::{Converter, NsisConverter};
use crate::installer::{
    error::{Error, Result},
    variables::ToolId,
};
use std::{collections::BTreeMap, sync::LazyLock};

/// Creates a fresh converter instance.
pub type ConverterFactory = fn() -> Box<dyn Converter>;

static GLOBAL: LazyLock<ConverterRegistry> = LazyLock::new(ConverterRegistry::with_builtin_backends);

/// Process-wide registry holding the built-in backends.
pub fn global() -> &'static ConverterRegistry {
    &GLOBAL
}

/// Tool → converter factory table.
#[derive(Debug, Clone, Default)]
pub struct ConverterRegistry {
    factories: BTreeMap<ToolId, ConverterFactory>,
}

impl ConverterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every implemented backend (currently NSIS).
    pub fn with_builtin_backends() -> Self {
        let mut registry = Self::new();
        registry.register(ToolId::Nsis, || Box::new(NsisConverter::new()));
        registry
    }

    /// Registers `factory` for `tool`, returning the factory it replaced.
    pub fn register(&mut self, tool: ToolId, factory: ConverterFactory) -> Option<ConverterFactory> {
        self.factories.insert(tool, factory)
    }

    /// Registers `factory` under a tool name.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownTool`] when `name` is not a known tool.
    pub fn register_named(&mut self, name: &str, factory: ConverterFactory) -> Result<()> {
        let tool = name.parse::<ToolId>()?;
        self.register(tool, factory);
        Ok(())
    }

    /// Factory for `tool`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownTool`] when no backend is registered for `tool`.
    pub fn get(&self, tool: ToolId) -> Result<ConverterFactory> {
        self.factories
            .get(&tool)
            .copied()
            .ok_or_else(|| Error::UnknownTool(tool.to_string()))
    }

    /// Factory for a tool given by name.
    pub fn get_by_name(&self, name: &str) -> Result<ConverterFactory> {
        self.get(name.parse::<ToolId>()?)
    }

    /// Instantiates the converter for `tool`.
    pub fn create(&self, tool: ToolId) -> Result<Box<dyn Converter>> {
        let factory = self.get(tool)?;
        log::debug!("selected {tool} converter backend");
        Ok(factory())
    }

    /// Tools with a registered backend, in declaration order.
    pub fn tools(&self) -> impl Iterator<Item = ToolId> + '_ {
        self.factories.keys().copied()
    }

    pub fn contains(&self, tool: ToolId) -> bool {
        self.factories.contains_key(&tool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::context::BuildContext;

    struct FakeWix;

    impl Converter for FakeWix {
        fn tool(&self) -> ToolId {
            ToolId::Wix
        }

        fn convert(&self, ctx: &BuildContext<'_>) -> Result<String> {
            ctx.resolve("<Wix>$INSTDIR</Wix>")
        }
    }

    #[test]
    fn test_builtin_backends() {
        let registry = ConverterRegistry::with_builtin_backends();
        assert_eq!(registry.tools().collect::<Vec<_>>(), vec![ToolId::Nsis]);
        let converter = registry.create(ToolId::Nsis).unwrap();
        assert_eq!(converter.tool(), ToolId::Nsis);
        assert_eq!(converter.output_extension(), ".nsi");
    }

    #[test]
    fn test_declared_but_unimplemented_tools_are_unknown() {
        let registry = global();
        for tool in [ToolId::Wix, ToolId::Inno] {
            let err = registry.get(tool).err().unwrap();
            assert!(matches!(err, Error::UnknownTool(ref name) if *name == tool.to_string()));
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = global().get_by_name("msix").err().unwrap();
        assert!(matches!(err, Error::UnknownTool(ref name) if name == "msix"));
        assert!(global().get_by_name("NSIS").is_ok());
    }

    #[test]
    fn test_registration_is_additive() {
        let mut registry = ConverterRegistry::with_builtin_backends();
        assert!(registry.register(ToolId::Wix, || Box::new(FakeWix)).is_none());
        assert!(registry.contains(ToolId::Nsis));

        let (config, document) =
            crate::installer::config::from_yaml_str("app: {name: Demo}").unwrap();
        let ctx = BuildContext::new(ToolId::Wix, &config, &document);
        let output = registry.create(ToolId::Wix).unwrap().convert(&ctx).unwrap();
        assert_eq!(output, "<Wix>[INSTALLDIR]</Wix>");
    }

    #[test]
    fn test_register_named_rejects_unknown_tool() {
        let mut registry = ConverterRegistry::new();
        assert!(registry.register_named("inno", || Box::new(FakeWix)).is_ok());
        assert!(registry.register_named("bogus", || Box::new(FakeWix)).is_err());
    }
}
