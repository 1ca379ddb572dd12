//! Override sources and the precedence rules between them.
//!
//! [`SourceResolver`] is the single place where a field's winning source is
//! chosen: an explicit CLI flag, then a non-empty environment variable, then
//! the built-in default.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::defaults::{DefaultValue, default_for};
use super::error::ConfigError;
use super::field::FieldId;
use super::value::{ResolvedValue, coerce};

/// Read access to environment variables.
///
/// Production code uses [`ProcessEnv`]; tests pass a map so they never touch
/// the real process environment.
pub trait EnvSource {
    /// Returns the value of the variable, or `None` if it is not set.
    fn var(&self, name: &str) -> Option<String>;
}

/// Environment backed by the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    /// Non-UTF-8 values are ignored with a warning.
    fn var(&self, name: &str) -> Option<String> {
        match std::env::var_os(name)?.into_string() {
            Ok(value) => Some(value),
            Err(raw) => {
                tracing::warn!(
                    "Ignoring {name}: value is not valid UTF-8 ({})",
                    raw.to_string_lossy()
                );
                None
            }
        }
    }
}

impl<S: std::hash::BuildHasher> EnvSource for HashMap<String, String, S> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<E: EnvSource + ?Sized> EnvSource for &E {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

/// Value of a CLI flag as supplied by the argument parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    /// Raw text, coerced according to the field's kind.
    Text(String),
    /// A switch that was passed on the command line.
    Switch(bool),
}

/// Flags explicitly set on this invocation, keyed by the field they override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagOverrides {
    values: BTreeMap<FieldId, FlagValue>,
}

impl FlagOverrides {
    /// Creates an empty set of overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text override.
    #[must_use]
    pub fn with_text(mut self, field: FieldId, value: impl Into<String>) -> Self {
        self.values.insert(field, FlagValue::Text(value.into()));
        self
    }

    /// Adds a switch override.
    #[must_use]
    pub fn with_switch(mut self, field: FieldId, value: bool) -> Self {
        self.values.insert(field, FlagValue::Switch(value));
        self
    }

    /// Adds a text override when the flag was given.
    #[must_use]
    pub fn with_optional_text(self, field: FieldId, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.with_text(field, v),
            None => self,
        }
    }

    /// Returns the override for a field, if one was given.
    #[must_use]
    pub fn get(&self, field: FieldId) -> Option<&FlagValue> {
        self.values.get(&field)
    }

    /// Returns the number of overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no flags were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Where a field's value came from, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Source {
    /// Explicit CLI flag.
    Flag,
    /// Non-empty environment variable.
    Env,
    /// Built-in default.
    Default,
}

impl Source {
    /// Returns true for sources the user set explicitly.
    #[must_use]
    pub const fn is_explicit(self) -> bool {
        matches!(self, Self::Flag | Self::Env)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Flag => "flag",
            Self::Env => "env",
            Self::Default => "default",
        })
    }
}

/// Outcome of resolving one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An explicit override won.
    Override {
        /// The coerced value
        value: ResolvedValue,
        /// Which override
        source: Source,
    },
    /// No override; the registry default applies.
    Default(DefaultValue),
}

impl Resolution {
    /// Returns the winning source.
    #[must_use]
    pub const fn source(&self) -> Source {
        match self {
            Self::Override { source, .. } => *source,
            Self::Default(_) => Source::Default,
        }
    }
}

/// Applies flag > env > default precedence for one field at a time.
#[derive(Debug, Clone, Copy)]
pub struct SourceResolver<'a, E: ?Sized> {
    flags: &'a FlagOverrides,
    env: &'a E,
}

impl<'a, E: EnvSource + ?Sized> SourceResolver<'a, E> {
    /// Creates a resolver over the given flags and environment.
    pub const fn new(flags: &'a FlagOverrides, env: &'a E) -> Self {
        Self { flags, env }
    }

    /// Resolves a field.
    ///
    /// An environment variable set to the empty string is treated as unset.
    ///
    /// # Errors
    ///
    /// Returns a coercion error if the winning override cannot be interpreted
    /// as the field's kind.
    pub fn resolve(&self, field: FieldId) -> Result<Resolution, ConfigError> {
        if let Some(flag) = self.flags.get(field) {
            let value = match flag {
                FlagValue::Text(raw) => coerce(field, raw)?,
                FlagValue::Switch(b) => ResolvedValue::Boolean(*b),
            };
            tracing::trace!(%field, "resolved from flag");
            return Ok(Resolution::Override {
                value,
                source: Source::Flag,
            });
        }

        if let Some(name) = field.env_name() {
            match self.env.var(name) {
                Some(raw) if !raw.is_empty() => {
                    let value = coerce(field, &raw)?;
                    tracing::trace!(%field, env = name, "resolved from environment");
                    return Ok(Resolution::Override {
                        value,
                        source: Source::Env,
                    });
                }
                Some(_) => tracing::debug!(env = name, "ignoring blank environment variable"),
                None => {}
            }
        }

        Ok(Resolution::Default(default_for(field)))
    }
}
