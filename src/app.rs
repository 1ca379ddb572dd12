//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use ziti_config_gen::config::ConfigError;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - invalid value, missing required field, bad template.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Output error (exit code 2) - missing directory, unwritable file.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn output_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Maps an error to the process exit code.
pub fn exit_code_for(error: &ConfigError) -> std::process::ExitCode {
    if error.is_output_error() {
        exit_code::output_error()
    } else {
        exit_code::CONFIG_ERROR
    }
}

/// Builds the hint naming how to override the offending field, if any.
pub fn config_hint(error: &ConfigError) -> Option<String> {
    let field = error.field()?;
    match (field.env_name(), field.flag_name()) {
        (Some(env), Some(flag)) => Some(format!("Set {env} or pass --{flag} to override {field}.")),
        (Some(env), None) => Some(format!("Set {env} to override {field}.")),
        (None, Some(flag)) => Some(format!("Pass --{flag} to override {field}.")),
        (None, None) => None,
    }
}

/// Prints helpful hints for configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    if let Some(hint) = config_hint(error) {
        eprintln!("\n{hint}");
    }
    if matches!(error, ConfigError::PathDoesNotExist { .. }) {
        eprintln!("\nCreate the directory first or use '--output stdout'.");
    }
}

/// Sets up the tracing subscriber for logging.
///
/// Logs go to stderr so a document written to stdout stays clean.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
