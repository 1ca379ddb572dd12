//! Application execution logic.
//!
//! Turns a parsed command into a rendered document and writes it out.

use ziti_config_gen::config::{Command, ConfigError, EnvSource};
use ziti_config_gen::emit::{Destination, emit};
use ziti_config_gen::generate::{Generator, Request};
use ziti_config_gen::host::HostInfo;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Maps a subcommand to the document it produces.
pub const fn request_for(command: &Command) -> Request {
    match command {
        Command::Controller(_) => Request::Controller,
        Command::Router(_) => Request::Router,
        Command::Environment(_) => Request::Environment,
    }
}

/// Renders the document for a command.
///
/// # Errors
///
/// Returns coercion, required-field and template errors.
pub fn render<E, H>(command: &Command, env: &E, host: &H) -> Result<String, ConfigError>
where
    E: EnvSource + ?Sized,
    H: HostInfo + ?Sized,
{
    Generator::new(env, host).generate(request_for(command), &command.overrides())
}

/// Renders the document for a command and writes it to its destination.
///
/// Nothing is written when rendering fails.
///
/// # Errors
///
/// Returns rendering errors and output errors.
pub fn execute<E, H>(command: &Command, env: &E, host: &H) -> Result<Destination, ConfigError>
where
    E: EnvSource + ?Sized,
    H: HostInfo + ?Sized,
{
    let destination = Destination::parse(command.output());
    let document = render(command, env, host)?;
    emit(&document, &destination)?;

    tracing::debug!("{:?} configuration generated and written to: {destination}", request_for(command));
    Ok(destination)
}
