//! ypack - installer script generator.
//!
//! This binary converts a YAML package description into an installer-builder
//! script (NSIS today) and validates descriptions before conversion.

use std::process;
use ypack::cli::{self, OutputManager};

#[tokio::main]
async fn main() {
    env_logger::init();

    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            OutputManager::new(false).error(&format!("Fatal error: {e}"));
            1
        }
    };

    process::exit(exit_code);
}
