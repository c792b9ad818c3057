//! Per-conversion build context.
//!
//! A [`BuildContext`] binds one target tool to one package description and a
//! [`Resolver`] for that tool. It is created once per conversion, never
//! mutated, and shared by reference across every sub-generator of a
//! converter.

mod builder;

pub use builder::BuildContextBuilder;

use crate::installer::{
    config::{PackageConfig, RegistryView},
    error::Result,
    resolver::{Resolver, Strictness},
    variables::ToolId,
};
use serde_json::Value;

/// Everything a converter needs for one run.
#[derive(Debug, Clone)]
pub struct BuildContext<'a> {
    tool: ToolId,
    config: &'a PackageConfig,
    document: &'a Value,
    resolver: Resolver<'a>,
}

impl<'a> BuildContext<'a> {
    /// Creates a context with a lenient resolver.
    pub fn new(tool: ToolId, config: &'a PackageConfig, document: &'a Value) -> Self {
        Self::with_strictness(tool, config, document, Strictness::default())
    }

    pub fn with_strictness(
        tool: ToolId,
        config: &'a PackageConfig,
        document: &'a Value,
        strictness: Strictness,
    ) -> Self {
        Self::from_resolver(
            config,
            document,
            Resolver::new(tool, document).with_strictness(strictness),
        )
    }

    fn from_resolver(config: &'a PackageConfig, document: &'a Value, resolver: Resolver<'a>) -> Self {
        Self {
            tool: resolver.tool(),
            config,
            document,
            resolver,
        }
    }

    /// Returns a builder for constructing a context.
    pub fn builder() -> BuildContextBuilder<'a> {
        BuildContextBuilder::new()
    }

    pub fn tool(&self) -> ToolId {
        self.tool
    }

    pub fn config(&self) -> &'a PackageConfig {
        self.config
    }

    /// Raw document the package description was parsed from.
    pub fn document(&self) -> &'a Value {
        self.document
    }

    pub fn resolver(&self) -> &Resolver<'a> {
        &self.resolver
    }

    pub fn path_separator(&self) -> char {
        self.tool.path_separator()
    }

    /// Reference to a compile-time define in the tool's syntax.
    pub fn define_reference(&self, name: &str) -> String {
        self.tool.define_reference(name)
    }

    /// Resolves `text` for this context's tool.
    pub fn resolve(&self, text: &str) -> Result<String> {
        self.resolver.resolve(text)
    }

    /// Registry view used for the product and uninstall keys.
    ///
    /// `auto` picks the 32-bit view when the install directory lives under a
    /// 32-bit system folder and the 64-bit view otherwise.
    pub fn effective_registry_view(&self) -> Result<RegistryView> {
        Ok(match self.config.install.registry_view {
            RegistryView::Auto => {
                let raw = self.resolver.expand_references(&self.config.install.install_dir)?;
                let is_32_bit = ["$PROGRAMFILES", "$COMMONFILES"].iter().any(|folder| {
                    raw.find(folder).is_some_and(|at| {
                        !raw[at + folder.len()..].starts_with("64")
                    })
                });
                if is_32_bit {
                    RegistryView::View32
                } else {
                    RegistryView::View64
                }
            }
            explicit => explicit,
        })
    }

    /// Canonical names of the installer languages, English when none are set.
    pub fn language_names(&self) -> Vec<String> {
        if self.config.languages.is_empty() {
            vec!["English".to_string()]
        } else {
            self.config.languages.iter().map(|l| l.name.clone()).collect()
        }
    }
}
