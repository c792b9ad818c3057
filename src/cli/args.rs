//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with consistency
//! checks that clap cannot express on its own.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Installer script generator
#[derive(Parser, Debug)]
#[command(
    name = "ypack",
    version,
    about = "Generate installer scripts from YAML package descriptions",
    long_about = "Converts a declarative YAML (or JSON) package description into the script of an installer-builder tool.

Usage:
  ypack convert package.yaml
  ypack convert package.yaml --format nsis --output build/setup.nsi
  ypack convert package.yaml --dry-run
  ypack validate package.yaml
  ypack formats"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Suppress status messages
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a package description into an installer script
    Convert(ConvertArgs),

    /// Check a package description for unresolved references
    Validate(ValidateArgs),

    /// List target formats and their script extensions
    Formats,
}

impl Command {
    /// Subcommand name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Convert(_) => "convert",
            Command::Validate(_) => "validate",
            Command::Formats => "formats",
        }
    }
}

/// Arguments of `ypack convert`
#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Package description file (.yaml, .yml or .json)
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Target format: nsis, wix, inno
    #[arg(short, long, value_name = "FORMAT", default_value = "nsis")]
    pub format: String,

    /// Script output path (default: CONFIG with the format's extension)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print the script to stdout instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Fail on references that do not resolve
    #[arg(long)]
    pub strict: bool,
}

impl ConvertArgs {
    /// Where the script is written.
    ///
    /// `extension` includes the leading dot.
    pub fn output_path(&self, extension: &str) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.config.with_extension(extension.trim_start_matches('.')))
    }
}

/// Arguments of `ypack validate`
#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Package description file (.yaml, .yml or .json)
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Target format whose builtin spelling is checked
    #[arg(short, long, value_name = "FORMAT", default_value = "nsis")]
    pub format: String,
}

fn require_config(config: &Path) -> Result<(), String> {
    if config.as_os_str().is_empty() {
        return Err("Package description path cannot be empty".to_string());
    }
    Ok(())
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Convert(convert) => {
                require_config(&convert.config)?;
                if convert.format.trim().is_empty() {
                    return Err("Format cannot be empty".to_string());
                }
                if convert.dry_run && convert.output.is_some() {
                    return Err("--output cannot be combined with --dry-run".to_string());
                }
                if convert.output.as_deref().is_some_and(Path::is_dir) {
                    return Err("--output must name a file, not a directory".to_string());
                }
                Ok(())
            }
            Command::Validate(validate) => require_config(&validate.config),
            Command::Formats => Ok(()),
        }
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Print info message if not in quiet mode
    pub fn info(&self, message: &str) -> std::io::Result<()> {
        self.output.info(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message if not in quiet mode
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_convert_defaults() {
        let args = parse(&["ypack", "convert", "demo.yaml"]);
        let Command::Convert(convert) = &args.command else {
            panic!("expected convert");
        };
        assert_eq!(convert.format, "nsis");
        assert!(!convert.dry_run && !convert.strict);
        assert_eq!(convert.output_path(".nsi"), PathBuf::from("demo.nsi"));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_explicit_output_wins() {
        let args = parse(&["ypack", "convert", "demo.yaml", "-o", "build/setup.nsi", "--strict"]);
        let Command::Convert(convert) = &args.command else {
            panic!("expected convert");
        };
        assert!(convert.strict);
        assert_eq!(convert.output_path(".nsi"), PathBuf::from("build/setup.nsi"));
    }

    #[test]
    fn test_dry_run_conflicts_with_output() {
        let args = parse(&["ypack", "convert", "demo.yaml", "--dry-run", "-o", "x.nsi"]);
        assert!(args.validate().unwrap_err().contains("--dry-run"));
    }

    #[test]
    fn test_quiet_is_global() {
        let args = parse(&["ypack", "validate", "demo.yaml", "-q"]);
        assert!(args.quiet);
        assert_eq!(args.command.name(), "validate");
    }
}
