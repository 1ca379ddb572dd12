//! Configuration value resolution.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - The field catalog ([`FieldId`]) with environment variable and flag names
//! - Default values ([`defaults`])
//! - Precedence between sources ([`SourceResolver`])
//! - Coercion of raw text into typed values ([`ResolvedValue`])
//!
//! # Priority
//!
//! Each field is resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI flag** - Only the few fields that have a flag
//! 2. **Environment variable** - `ZITI_*`, ignored when set to an empty string
//! 3. **Built-in default** - Static, or derived from the host or another field
//!
//! An explicitly empty flag is kept and later rejected by the required-field
//! check, while an empty environment variable counts as unset.
//!
//! # Derived Defaults
//!
//! Some defaults depend on another field's *resolved* value, so overriding the
//! source field also moves the dependent one:
//! - `ZITI_CTRL_WEB_INTERFACE_PORT` and the edge API port follow
//!   `ZITI_CTRL_WEB_ADVERTISED_PORT`
//! - the edge API address follows `ZITI_CTRL_WEB_ADVERTISED_ADDRESS`
//! - web identity files follow the controller identity files
//! - `ZITI_EDGE_ROUTER_LISTENER_BIND_PORT` follows `ZITI_EDGE_ROUTER_PORT`

mod cli;
pub mod defaults;
mod error;
mod field;
mod source;
mod value;

#[cfg(test)]
mod cli_tests;
#[cfg(test)]
mod value_tests;

pub use cli::{Cli, Command, ControllerArgs, OutputArgs, RouterArgs};
pub use defaults::{DefaultValue, Derivation, FileStem, default_for};
pub use error::ConfigError;
pub use field::{FieldId, FieldKind, FieldSpec};
pub use source::{
    EnvSource, FlagOverrides, FlagValue, ProcessEnv, Resolution, Source, SourceResolver,
};
pub use value::{
    ResolvedValue, coerce, format_millis, format_minutes, format_seconds, normalize_path,
    parse_bool, parse_duration, parse_port, whole_minutes,
};
