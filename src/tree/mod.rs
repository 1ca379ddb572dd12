//! Value tree construction.
//!
//! [`TreeBuilder`] walks the fields a component needs, resolves each one
//! through the [`SourceResolver`], evaluates derived defaults, and assembles a
//! typed tree. Every required leaf is checked while it is read, so a tree that
//! comes out of the builder never has an empty string or a zero duration or
//! count where the template expects a value.
//!
//! # Derivation rules
//!
//! - Identity files default to `<home>/<host identifier><suffix>`, where the
//!   host identifier is the OS hostname, else `ZITI_NETWORK`, else `ziti`.
//! - Advertised addresses default to the OS hostname, else `localhost`.
//! - `SameAs` defaults copy another field's *resolved* value, so an override
//!   of the source field flows into the dependent one.
//! - Combined `host:port` overrides: an explicitly set separate part wins,
//!   then the part carried by the combined value, then the part's default.

mod address;
mod controller;
mod environment;
mod router;

#[cfg(test)]
mod controller_tests;

pub use address::{HostPort, PartialHostPort};
pub use controller::{
    ChannelListener, ChannelOptions, ControllerTree, EdgeApi, Enrollment, HealthChecks,
    IdentityPaths, WebBinding, WebBindPoint, WebOptions,
};
pub use environment::{EnvVarDescriptor, EnvironmentListing, OsTokens};
pub use router::{Forwarder, LinkListener, RouterEdge, RouterTree};

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serializer;

use crate::config::{
    ConfigError, DefaultValue, Derivation, EnvSource, FieldId, FileStem, FlagOverrides,
    Resolution, ResolvedValue, Source, SourceResolver, defaults, normalize_path,
};
use crate::host::HostInfo;

/// Component a config is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    /// The controller process.
    Controller,
    /// An edge router process.
    Router,
}

/// A built tree for one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueTree {
    /// Controller config values.
    Controller(ControllerTree),
    /// Router config values.
    Router(RouterTree),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Option<ResolvedValue>,
    source: Source,
}

/// Resolves fields on demand and assembles value trees.
///
/// Each resolution is memoized, so a field read twice during one build always
/// yields the same value. Create a fresh builder per generation run.
pub struct TreeBuilder<'a, E: ?Sized, H: ?Sized> {
    resolver: SourceResolver<'a, E>,
    host: &'a H,
    resolved: BTreeMap<FieldId, Entry>,
}

impl<'a, E, H> TreeBuilder<'a, E, H>
where
    E: EnvSource + ?Sized,
    H: HostInfo + ?Sized,
{
    /// Creates a builder over the given flags, environment and host.
    pub fn new(flags: &'a FlagOverrides, env: &'a E, host: &'a H) -> Self {
        Self {
            resolver: SourceResolver::new(flags, env),
            host,
            resolved: BTreeMap::new(),
        }
    }

    /// Builds the tree for a component.
    ///
    /// # Errors
    ///
    /// Returns the first coercion error or unfilled required field.
    pub fn build(&mut self, component: Component) -> Result<ValueTree, ConfigError> {
        match component {
            Component::Controller => self.controller().map(ValueTree::Controller),
            Component::Router => self.router().map(ValueTree::Router),
        }
    }

    /// Returns the resolved value of a field, evaluating its default if needed.
    ///
    /// `None` means the field is optional and nothing set it.
    ///
    /// # Errors
    ///
    /// Returns a coercion error, or a working-directory error while deriving
    /// the home directory.
    pub fn value(&mut self, field: FieldId) -> Result<Option<ResolvedValue>, ConfigError> {
        if let Some(entry) = self.resolved.get(&field) {
            return Ok(entry.value.clone());
        }

        let resolution = self.resolver.resolve(field)?;
        let source = resolution.source();
        let value = match resolution {
            Resolution::Override { value, .. } => Some(value),
            Resolution::Default(default) => self.evaluate(default)?,
        };

        tracing::debug!(%field, %source, value = ?value, "resolved");
        self.resolved.insert(
            field,
            Entry {
                value: value.clone(),
                source,
            },
        );
        Ok(value)
    }

    /// Returns the source that won for a field.
    ///
    /// # Errors
    ///
    /// Same as [`Self::value`].
    pub fn source(&mut self, field: FieldId) -> Result<Source, ConfigError> {
        self.value(field)?;
        Ok(self.resolved.get(&field).map_or(Source::Default, |e| e.source))
    }

    fn evaluate(&mut self, default: DefaultValue) -> Result<Option<ResolvedValue>, ConfigError> {
        Ok(match default {
            DefaultValue::Text(s) => Some(ResolvedValue::Text(s.to_string())),
            DefaultValue::Duration(d) => Some(ResolvedValue::Duration(d)),
            DefaultValue::Integer(n) => Some(ResolvedValue::Integer(n)),
            DefaultValue::Boolean(b) => Some(ResolvedValue::Boolean(b)),
            DefaultValue::Unset => None,
            DefaultValue::Derived(derivation) => self.derive(derivation)?,
        })
    }

    fn derive(&mut self, derivation: Derivation) -> Result<Option<ResolvedValue>, ConfigError> {
        let text = match derivation {
            Derivation::WorkingDirectory => {
                let dir = self
                    .host
                    .working_dir()
                    .map_err(ConfigError::WorkingDirectory)?;
                normalize_path(&dir.to_string_lossy())
            }
            Derivation::Hostname => self.advertised_hostname(),
            Derivation::HomeFile { stem, suffix } => {
                let stem = match stem {
                    FileStem::HostIdentifier => self.host_identifier()?,
                    FileStem::Field(field) => self.text(field)?,
                };
                self.home_path(&format!("{stem}{suffix}"))?
            }
            Derivation::HomePath(relative) => self.home_path(relative)?,
            Derivation::SameAs(field) => return self.value(field),
            Derivation::FirstSet(fields) => {
                for &field in fields {
                    if let Some(value) = self.value(field)? {
                        return Ok(Some(value));
                    }
                }
                return Ok(None);
            }
        };
        Ok(Some(ResolvedValue::Text(text)))
    }

    fn home_path(&mut self, relative: &str) -> Result<String, ConfigError> {
        let home = self.text(FieldId::Home)?;
        Ok(format!("{}/{relative}", home.trim_end_matches('/')))
    }

    fn advertised_hostname(&self) -> String {
        match self.host.hostname() {
            Ok(name) if !name.is_empty() => name,
            Ok(_) => defaults::ADVERTISED_HOST_FALLBACK.to_string(),
            Err(e) => {
                tracing::warn!(
                    "Unable to read hostname ({e}), using {}",
                    defaults::ADVERTISED_HOST_FALLBACK
                );
                defaults::ADVERTISED_HOST_FALLBACK.to_string()
            }
        }
    }

    /// Hostname, or the network name when the hostname is unavailable.
    ///
    /// # Errors
    ///
    /// Same as [`Self::value`].
    pub fn host_identifier(&mut self) -> Result<String, ConfigError> {
        match self.host.hostname() {
            Ok(name) if !name.is_empty() => return Ok(name),
            Ok(_) => tracing::warn!("Hostname is empty, falling back to network name"),
            Err(e) => tracing::warn!("Unable to read hostname ({e}), falling back to network name"),
        }
        Ok(self
            .optional_text(FieldId::NetworkName)?
            .unwrap_or_else(|| defaults::HOST_IDENTIFIER_FALLBACK.to_string()))
    }

    /// Reads a required text field.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] if the value is empty.
    pub fn text(&mut self, field: FieldId) -> Result<String, ConfigError> {
        match self.value(field)? {
            Some(ResolvedValue::Text(s)) if !s.trim().is_empty() => Ok(s),
            Some(ResolvedValue::Text(_)) | None => {
                Err(ConfigError::missing(field, "value must not be empty"))
            }
            Some(_) => Err(ConfigError::missing(field, "expected a text value")),
        }
    }

    /// Reads an optional text field; blank values count as absent.
    ///
    /// # Errors
    ///
    /// Same as [`Self::value`].
    pub fn optional_text(&mut self, field: FieldId) -> Result<Option<String>, ConfigError> {
        match self.value(field)? {
            Some(ResolvedValue::Text(s)) if !s.trim().is_empty() => Ok(Some(s)),
            Some(ResolvedValue::Text(_)) | None => Ok(None),
            Some(_) => Err(ConfigError::missing(field, "expected a text value")),
        }
    }

    /// Reads a required port.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] if the port is absent or zero.
    pub fn port(&mut self, field: FieldId) -> Result<u16, ConfigError> {
        match self.value(field)? {
            Some(ResolvedValue::Integer(n)) => u16::try_from(n)
                .ok()
                .filter(|p| *p != 0)
                .ok_or_else(|| ConfigError::missing(field, "port must be between 1 and 65535")),
            _ => Err(ConfigError::missing(field, "expected a port")),
        }
    }

    /// Reads a required, non-zero integer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] if the value is absent or zero.
    pub fn integer(&mut self, field: FieldId) -> Result<u32, ConfigError> {
        match self.value(field)? {
            Some(ResolvedValue::Integer(n)) if n != 0 => Ok(n),
            Some(ResolvedValue::Integer(_)) => {
                Err(ConfigError::missing(field, "value must not be zero"))
            }
            _ => Err(ConfigError::missing(field, "expected an integer")),
        }
    }

    /// Reads a required, non-zero duration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] if the value is absent or zero.
    pub fn duration(&mut self, field: FieldId) -> Result<Duration, ConfigError> {
        match self.value(field)? {
            Some(ResolvedValue::Duration(d)) if !d.is_zero() => Ok(d),
            Some(ResolvedValue::Duration(_)) => {
                Err(ConfigError::missing(field, "duration must not be zero"))
            }
            _ => Err(ConfigError::missing(field, "expected a duration")),
        }
    }

    /// Reads a switch.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] if the value is not a boolean.
    pub fn boolean(&mut self, field: FieldId) -> Result<bool, ConfigError> {
        match self.value(field)? {
            Some(ResolvedValue::Boolean(b)) => Ok(b),
            _ => Err(ConfigError::missing(field, "expected a boolean")),
        }
    }

    /// Reads a duration that is rendered in whole minutes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] if the duration is shorter
    /// than one minute.
    pub fn minutes(&mut self, field: FieldId) -> Result<Duration, ConfigError> {
        let duration = self.duration(field)?;
        if duration < Duration::from_secs(60) {
            return Err(ConfigError::missing(field, "duration must be at least 1m"));
        }
        Ok(duration)
    }

    /// Reads an address from separate host and port fields.
    ///
    /// # Errors
    ///
    /// Returns the first error from either part.
    pub fn address(&mut self, host: FieldId, port: FieldId) -> Result<HostPort, ConfigError> {
        Ok(HostPort::new(self.text(host)?, self.port(port)?))
    }

    /// Reads an address that may also be given as one combined override.
    ///
    /// For each part: an explicitly set separate field wins, then the part
    /// carried by an explicitly set combined value, then the separate field's
    /// default (which may itself back-fill from another field).
    ///
    /// # Errors
    ///
    /// Returns a parse error for a malformed combined value, or the first
    /// error from either part.
    pub fn composite_address(
        &mut self,
        combined: FieldId,
        host: FieldId,
        port: FieldId,
    ) -> Result<HostPort, ConfigError> {
        let parts = match self.optional_text(combined)? {
            Some(raw) => PartialHostPort::parse(combined, &raw)?,
            None => PartialHostPort::default(),
        };
        let combined_given = !parts.is_empty();

        let host_value = match parts.host {
            Some(h) if !self.source(host)?.is_explicit() => h,
            _ => self.text(host)?,
        };
        let port_value = match parts.port {
            Some(p) if !self.source(port)?.is_explicit() => p,
            _ => self.port(port)?,
        };

        if combined_given {
            tracing::debug!(
                %combined,
                address = %HostPort::new(host_value.clone(), port_value),
                "composed address from combined override"
            );
        }
        Ok(HostPort::new(host_value, port_value))
    }
}

/// Serializes a duration as whole milliseconds for template helpers.
fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::host::FixedHost;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn every_field_resolves_with_empty_environment() {
        let flags = FlagOverrides::new();
        let env = env(&[]);
        let host = FixedHost::new("node1", "/opt/ziti");
        let mut builder = TreeBuilder::new(&flags, &env, &host);

        for &field in FieldId::ALL {
            let value = builder.value(field).unwrap();
            let optional = matches!(
                field,
                FieldId::NetworkName | FieldId::WebListenerHostPort | FieldId::RouterIpOverride
            );
            assert_eq!(value.is_none(), optional, "{field}");
        }
    }

    #[test]
    fn same_as_follows_override_of_source_field() {
        let flags = FlagOverrides::new();
        let env = env(&[("ZITI_CTRL_WEB_ADVERTISED_PORT", "8443")]);
        let host = FixedHost::new("node1", "/opt/ziti");
        let mut builder = TreeBuilder::new(&flags, &env, &host);

        assert_eq!(builder.port(FieldId::WebInterfacePort).unwrap(), 8443);
        assert_eq!(builder.port(FieldId::EdgeApiPort).unwrap(), 8443);
        assert_eq!(
            builder.source(FieldId::WebInterfacePort).unwrap(),
            Source::Default
        );
    }

    #[test]
    fn resolution_is_memoized() {
        let flags = FlagOverrides::new();
        let env = env(&[]);
        let host = FixedHost::new("node1", "/opt/ziti");
        let mut builder = TreeBuilder::new(&flags, &env, &host);

        let first = builder.text(FieldId::CtrlIdentityCert).unwrap();
        let second = builder.text(FieldId::CtrlIdentityCert).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, "/opt/ziti/node1.cert");
    }

    #[test]
    fn home_trailing_slash_is_not_doubled() {
        let flags = FlagOverrides::new();
        let env = env(&[("ZITI_HOME", "/srv/ziti/")]);
        let host = FixedHost::new("node1", "/opt/ziti");
        let mut builder = TreeBuilder::new(&flags, &env, &host);

        assert_eq!(
            builder.text(FieldId::CtrlDatabase).unwrap(),
            "/srv/ziti/db/ctrl.db"
        );
    }

    #[test]
    fn host_identifier_falls_back_to_network_name() {
        let flags = FlagOverrides::new();
        let env = env(&[("ZITI_NETWORK", "mynet")]);
        let host = FixedHost::without_hostname("/opt/ziti");
        let mut builder = TreeBuilder::new(&flags, &env, &host);

        assert_eq!(
            builder.text(FieldId::CtrlIdentityKey).unwrap(),
            "/opt/ziti/mynet.key"
        );
    }

    #[test]
    fn host_identifier_last_resort() {
        let flags = FlagOverrides::new();
        let env = env(&[]);
        let host = FixedHost::without_hostname("/opt/ziti");
        let mut builder = TreeBuilder::new(&flags, &env, &host);

        assert_eq!(builder.host_identifier().unwrap(), "ziti");
        assert_eq!(
            builder.text(FieldId::WebAdvertisedAddress).unwrap(),
            "localhost"
        );
    }

    #[test]
    fn empty_flag_value_is_rejected() {
        let flags = FlagOverrides::new().with_text(FieldId::RouterName, "");
        let env = env(&[]);
        let host = FixedHost::new("node1", "/opt/ziti");
        let mut builder = TreeBuilder::new(&flags, &env, &host);

        let err = builder.text(FieldId::RouterName).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::MissingRequired {
                field: FieldId::RouterName,
                ..
            }
        ));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let flags = FlagOverrides::new().with_text(FieldId::EdgeRouterEnrollmentDuration, "0");
        let env = env(&[]);
        let host = FixedHost::new("node1", "/opt/ziti");
        let mut builder = TreeBuilder::new(&flags, &env, &host);

        assert!(builder.duration(FieldId::EdgeRouterEnrollmentDuration).is_err());
    }

    #[test]
    fn sub_minute_enrollment_is_rejected() {
        let flags = FlagOverrides::new().with_text(FieldId::EdgeRouterEnrollmentDuration, "20s");
        let env = env(&[]);
        let host = FixedHost::new("node1", "/opt/ziti");
        let mut builder = TreeBuilder::new(&flags, &env, &host);

        assert!(builder.duration(FieldId::EdgeRouterEnrollmentDuration).is_ok());
        assert!(builder.minutes(FieldId::EdgeRouterEnrollmentDuration).is_err());
    }
}
