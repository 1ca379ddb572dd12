//! CLI argument parsing using clap.
//!
//! Defines the subcommands and the flags that override resolved values.

use clap::{Args, Parser, Subcommand};

use super::field::FieldId;
use super::source::FlagOverrides;

/// Generates controller and router configuration files for a Ziti network.
///
/// Values come from command line flags, then `ZITI_*` environment variables,
/// then built-in defaults. Run `environment` to list the variables.
#[derive(Debug, Parser)]
#[command(name = "ziti-config-gen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config to generate
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (to stderr)
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for ziti-config-gen
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a controller config
    Controller(ControllerArgs),

    /// Create an edge router config
    Router(RouterArgs),

    /// Display config environment variables
    #[command(visible_alias = "env")]
    Environment(OutputArgs),
}

/// Output destination shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output file, or `stdout`
    #[arg(long, short, default_value = "stdout")]
    pub output: String,
}

/// Flags for the controller subcommand.
#[derive(Debug, Clone, Args)]
pub struct ControllerArgs {
    #[command(flatten)]
    pub output: OutputArgs,

    /// Identity enrollment duration, e.g. `1h`, `30m` or `180` (minutes)
    #[arg(long = "identityEnrollmentDuration", value_name = "DURATION")]
    pub identity_enrollment_duration: Option<String>,

    /// Router enrollment duration, e.g. `1h`, `30m` or `180` (minutes)
    #[arg(long = "routerEnrollmentDuration", value_name = "DURATION")]
    pub router_enrollment_duration: Option<String>,
}

/// Flags for the router subcommand.
#[derive(Debug, Clone, Args)]
pub struct RouterArgs {
    #[command(flatten)]
    pub output: OutputArgs,

    /// Name of the router; defaults to the hostname
    #[arg(long = "routerName", value_name = "NAME")]
    pub router_name: Option<String>,

    /// Create a fabric-only router without an edge listener
    #[arg(long)]
    pub fabric: bool,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Parses CLI arguments from an iterator, returning errors instead of exiting.
    ///
    /// # Errors
    ///
    /// Returns the clap error for unknown flags or missing subcommands.
    pub fn try_parse_from_iter<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(iter)
    }
}

impl Command {
    /// Raw `--output` value.
    #[must_use]
    pub fn output(&self) -> &str {
        match self {
            Self::Controller(args) => &args.output.output,
            Self::Router(args) => &args.output.output,
            Self::Environment(args) => &args.output,
        }
    }

    /// Flags that were explicitly given, keyed by the field they override.
    ///
    /// A switch that was not passed is absent rather than `false`, so it
    /// does not shadow the environment.
    #[must_use]
    pub fn overrides(&self) -> FlagOverrides {
        match self {
            Self::Controller(args) => FlagOverrides::new()
                .with_optional_text(
                    FieldId::EdgeIdentityEnrollmentDuration,
                    args.identity_enrollment_duration.as_deref(),
                )
                .with_optional_text(
                    FieldId::EdgeRouterEnrollmentDuration,
                    args.router_enrollment_duration.as_deref(),
                ),
            Self::Router(args) => {
                let flags = FlagOverrides::new()
                    .with_optional_text(FieldId::RouterName, args.router_name.as_deref());
                if args.fabric {
                    flags.with_switch(FieldId::RouterFabricOnly, true)
                } else {
                    flags
                }
            }
            Self::Environment(_) => FlagOverrides::new(),
        }
    }
}
