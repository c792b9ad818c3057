//! Command execution functions.
//!
//! Each subcommand lives in its own module; this module validates arguments,
//! dispatches and turns command failures into exit code 1.

mod convert;
mod formats;
mod validate;

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;

use convert::execute_convert;
use formats::execute_formats;
use validate::execute_validate;

/// Execute the main command based on parsed arguments
pub async fn execute_command(args: Args) -> Result<i32> {
    if let Err(validation_error) = args.validate() {
        let output = super::OutputManager::new(false);
        output.error(&format!("Invalid arguments: {validation_error}"));
        return Ok(1);
    }

    let config = RuntimeConfig::from(&args);

    let result = match &args.command {
        Command::Convert(convert) => execute_convert(convert, &config).await,
        Command::Validate(validate) => execute_validate(validate, &config),
        Command::Formats => execute_formats(),
    };

    match result {
        Ok(exit_code) => Ok(exit_code),
        Err(e) => {
            log::debug!("{} failed: {e:?}", args.command.name());
            config.error_println(&format!("Command '{}' failed: {e}", args.command.name()));
            Ok(1)
        }
    }
}
