//! Composite `host:port` addresses.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::config::{ConfigError, FieldId, parse_port};

/// A fully resolved network address.
///
/// Stored as separate parts so the host and port always agree with the
/// combined form produced by [`fmt::Display`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPort {
    /// Host name or IP address (IPv6 without brackets)
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl HostPort {
    /// Creates an address from its parts.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl Serialize for HostPort {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A `host:port` override where either part may be missing.
///
/// Accepted forms: `host:port`, `host`, `:port`, `[v6]:port`, `[v6]` and a
/// bare IPv6 address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialHostPort {
    /// Host part, if present
    pub host: Option<String>,
    /// Port part, if present
    pub port: Option<u16>,
}

impl PartialHostPort {
    /// Parses a combined override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] naming `field` when the port
    /// part is not a valid port or brackets are unbalanced.
    pub fn parse(field: FieldId, raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidAddress {
            field,
            value: raw.to_string(),
            reason,
        };
        let text = raw.trim();

        let (host, port) = if let Some(rest) = text.strip_prefix('[') {
            let (host, after) = rest
                .split_once(']')
                .ok_or_else(|| invalid("missing closing bracket".to_string()))?;
            match after {
                "" => (host, None),
                _ => {
                    let port = after
                        .strip_prefix(':')
                        .ok_or_else(|| invalid("expected ':' after ']'".to_string()))?;
                    (host, Some(port))
                }
            }
        } else {
            match text.matches(':').count() {
                0 => (text, None),
                1 => text
                    .split_once(':')
                    .map(|(h, p)| (h, Some(p)))
                    .unwrap_or((text, None)),
                // Bare IPv6 address without a port
                _ => (text, None),
            }
        };

        let port = match port.map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) => Some(parse_port(p).map_err(invalid)?),
            None => None,
        };
        let host = Some(host.trim())
            .filter(|h| !h.is_empty())
            .map(str::to_string);

        Ok(Self { host, port })
    }

    /// Returns true if neither part is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.host.is_none() && self.port.is_none()
    }
}
