//! Ziti config generator
//!
//! Entry point for the ziti-config-gen application.

use std::process::ExitCode;

use ziti_config_gen::config::{Cli, ProcessEnv};
use ziti_config_gen::host::SystemHost;

mod app;
mod run;

use app::{exit_code, exit_code_for, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();
    setup_tracing(cli.verbose);

    match run::execute(&cli.command, &ProcessEnv, &SystemHost) {
        Ok(destination) => {
            if !destination.is_stdout() {
                eprintln!("Configuration written to: {destination}");
            }
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            print_config_hint(&e);
            exit_code_for(&e)
        }
    }
}
