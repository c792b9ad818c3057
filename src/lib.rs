//! Declarative installer scripts from YAML package descriptions
//!
//! This library turns one package description into the script of an
//! installer-builder tool:
//! - NSIS (`.nsi`), fully implemented
//! - WiX (`.wxs`) and Inno Setup (`.iss`), declared as targets
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod installer;

// Re-export commonly used types
pub use error::{CliError, Result, YpackError};
