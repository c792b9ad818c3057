//! Installer script generation core.
//!
//! Loads a package description, resolves its references for a target tool
//! and renders the installer-builder script through a registered
//! [`Converter`].
//!
//! # Module Organization
//!
//! - `config` - Typed package description tree and loaders
//! - `variables` - Target tools and the builtin location table
//! - `resolver` - `${...}` and `$NAME` reference resolution
//! - `context` - Per-run conversion state
//! - `converter` - Backend trait, registry and the NSIS backend
//! - `languages` - Installer language names and NSIS constants
//! - `error` - Error types and context helpers

pub mod config;
pub mod context;
pub mod converter;
pub mod error;
pub mod languages;
pub mod resolver;
pub mod variables;

pub use config::PackageConfig;
pub use context::{BuildContext, BuildContextBuilder};
pub use converter::{Converter, ConverterRegistry, GeneratedScript, NsisConverter};
pub use error::{Context, Error, ErrorExt, Result};
pub use resolver::{Resolver, Strictness};
pub use variables::{BuiltinTable, ToolId};
