//! Error types for installer script generation.
//!
//! Provides contextual error chaining, filesystem-specific errors, and the
//! resolver/registry failure kinds surfaced to callers of the core.
//!
//! # Features
//!
//! - **Context trait**: Add context to errors similar to anyhow
//! - **ErrorExt trait**: Filesystem operations with automatic path context
//! - **bail! macro**: Early return with formatted error messages
//!
//! # Example
//!
//! ```no_run
//! use ypack::installer::{Context, Result};
//! use ypack::installer::config::PackageConfig;
//!
//! fn parse(text: &str) -> Result<PackageConfig> {
//!     let (config, _document) = ypack::installer::config::from_yaml_str(text)
//!         .context("parsing package description")?;
//!     if config.app.name.is_empty() {
//!         ypack::bail!("app.name must not be empty");
//!     }
//!     Ok(config)
//! }
//! ```

use std::{
    fmt::Display,
    io,
    path::PathBuf,
};
use thiserror::Error as DeriveError;

/// Errors returned by the installer core.
///
/// Resolution failures, unknown backends, configuration problems and the
/// errors of the external crates used for loading and rendering.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method.
    #[error("{context} {}: {error}", path.display())]
    Fs {
        /// Context describing the operation (e.g., "reading package description")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// A reference was requested while it was already being expanded.
    ///
    /// `chain` lists the expansion stack from the first occurrence of
    /// `reference` back to the repeated request.
    #[error("cyclic reference to `{reference}`: {}", chain.join(" -> "))]
    CyclicReference {
        /// Reference path that closed the cycle (e.g. `variables.A`)
        reference: String,
        /// Expansion chain, first and last elements are equal
        chain: Vec<String>,
    },

    /// A `${...}` reference that does not exist in the package description.
    ///
    /// Only raised under [`Strictness::Strict`](crate::installer::resolver::Strictness).
    #[error("unresolved reference `{reference}`")]
    UnresolvedReference {
        /// Reference as written, including `${` and `}`
        reference: String,
    },

    /// No converter backend is registered for the requested tool.
    #[error("no converter backend registered for `{0}`")]
    UnknownTool(String),

    /// The builtin variable table was built with a repeated identifier.
    #[error("duplicate builtin variable identifier `{0}`")]
    DuplicateBuiltin(String),

    /// Package description is well-formed but semantically unusable.
    #[error("invalid package description: {0}")]
    InvalidConfig(String),

    /// I/O error without additional path context.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// YAML parsing error.
    #[error("`{0}`")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing or conversion error.
    #[error("`{0}`")]
    Json(#[from] serde_json::Error),

    /// Handlebars template registration error.
    #[error("`{0}`")]
    Template(#[from] handlebars::TemplateError),

    /// Handlebars rendering error.
    #[error("`{0}`")]
    Render(#[from] handlebars::RenderError),

    /// URL parsing error.
    #[error("`{0}`")]
    Url(#[from] url::ParseError),

    /// Generic error with custom message.
    #[error("{0}")]
    GenericError(String),
}

/// Convenient type alias of Result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation).
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context(f().to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Extension trait for filesystem operations with automatic path context.
///
/// Wraps I/O errors with the path that caused them for better diagnostics.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading package description", "writing script".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Macro for early return with error.
///
/// Converts the message into a [`Error::GenericError`] and returns immediately.
///
/// # Examples
///
/// ```ignore
/// bail!("operation failed");
/// bail!("invalid value: {}", value);
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::installer::error::Error::GenericError($msg.into()))
    };
    ($err:expr $(,)?) => {
        return Err($crate::installer::error::Error::GenericError($err.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::installer::error::Error::GenericError(format!($fmt, $($arg)*)))
    };
}
