//! Controller value tree.

use std::time::Duration;

use serde::Serialize;

use super::{HostPort, TreeBuilder, serialize_millis};
use crate::config::{ConfigError, EnvSource, FieldId};
use crate::host::HostInfo;

/// Name of the single web binding the controller exposes.
pub const WEB_BINDING_NAME: &str = "client-management";

/// APIs served on the controller's web binding.
pub const WEB_APIS: &[&str] = &["edge-management", "edge-client", "fabric"];

/// Certificate and key file locations for one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct IdentityPaths {
    /// Client certificate
    pub cert: String,
    /// Server certificate chain
    pub server_cert: String,
    /// Private key
    pub key: String,
    /// Trusted CA bundle
    pub ca: String,
}

/// Tuning for a control or management channel listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct ChannelOptions {
    /// Lower bound for buffered connect requests
    pub min_queued_connects: u32,
    /// Upper bound for buffered connect requests
    pub max_queued_connects: u32,
    /// Buffered connect requests
    pub default_queued_connects: u32,
    /// Lower bound for concurrent connects
    pub min_outstanding_connects: u32,
    /// Upper bound for concurrent connects
    pub max_outstanding_connects: u32,
    /// Concurrent connects
    pub default_outstanding_connects: u32,
    /// Lower bound for the connect timeout
    #[serde(serialize_with = "serialize_millis")]
    pub min_connect_timeout: Duration,
    /// Upper bound for the connect timeout
    #[serde(serialize_with = "serialize_millis")]
    pub max_connect_timeout: Duration,
    /// Connect timeout
    #[serde(serialize_with = "serialize_millis")]
    pub default_connect_timeout: Duration,
}

/// A channel listener and its options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct ChannelListener {
    /// Address the listener binds to
    pub address: HostPort,
    /// Connect tuning
    pub options: ChannelOptions,
}

/// Timings for the database health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct HealthChecks {
    /// Time between checks
    #[serde(serialize_with = "serialize_millis")]
    pub interval: Duration,
    /// Time a check may take before it fails
    #[serde(serialize_with = "serialize_millis")]
    pub timeout: Duration,
    /// Delay before the first check
    #[serde(serialize_with = "serialize_millis")]
    pub initial_delay: Duration,
}

/// Edge API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct EdgeApi {
    /// Advertised address of the API
    pub address: HostPort,
    /// Idle time before an API session expires
    #[serde(serialize_with = "serialize_millis")]
    pub session_timeout: Duration,
    /// Interval between session activity flushes
    #[serde(serialize_with = "serialize_millis")]
    pub activity_update_interval: Duration,
    /// Sessions updated per flush
    pub activity_update_batch_size: u32,
}

/// Enrollment signer and validity windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct Enrollment {
    /// Certificate that signs enrolled identities
    pub signing_cert: String,
    /// Key for `signing_cert`
    pub signing_key: String,
    /// Always at least one minute
    #[serde(serialize_with = "serialize_millis")]
    pub identity_duration: Duration,
    /// Always at least one minute
    #[serde(serialize_with = "serialize_millis")]
    pub router_duration: Duration,
}

/// One listener definition of a web binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct WebBindPoint {
    /// Where the listener binds
    pub interface: HostPort,
    /// Where clients reach it
    pub address: HostPort,
}

/// HTTP server options of a web binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct WebOptions {
    /// Keep-alive idle timeout
    #[serde(serialize_with = "serialize_millis")]
    pub idle_timeout: Duration,
    /// Time allowed to read a request
    #[serde(serialize_with = "serialize_millis")]
    pub read_timeout: Duration,
    /// Time allowed to write a response
    #[serde(serialize_with = "serialize_millis")]
    pub write_timeout: Duration,
    /// Oldest TLS version accepted, e.g. `TLS1.2`
    pub min_tls_version: String,
    /// Newest TLS version accepted
    pub max_tls_version: String,
}

/// A named web server with its bind points and the APIs it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct WebBinding {
    /// Binding name
    pub name: String,
    /// Listeners of the binding
    pub bind_points: Vec<WebBindPoint>,
    /// Server identity presented to clients
    pub identity: IdentityPaths,
    /// HTTP server options
    pub options: WebOptions,
    /// APIs served on every bind point
    pub apis: Vec<String>,
}

/// Fully resolved controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct ControllerTree {
    /// Home directory all derived paths live under
    pub home: String,
    /// Database file
    pub db: String,
    /// Controller identity files
    pub identity: IdentityPaths,
    /// Control plane listener
    pub ctrl: ChannelListener,
    /// Control plane address routers dial
    pub ctrl_advertised: HostPort,
    /// Management plane listener
    pub mgmt: ChannelListener,
    /// Database health check
    pub health_checks: HealthChecks,
    /// Edge API settings
    pub edge_api: EdgeApi,
    /// Enrollment settings
    pub enrollment: Enrollment,
    /// Web servers
    pub web: Vec<WebBinding>,
}

impl<E, H> TreeBuilder<'_, E, H>
where
    E: EnvSource + ?Sized,
    H: HostInfo + ?Sized,
{
    /// Builds the controller tree.
    ///
    /// # Errors
    ///
    /// Returns the first coercion or required-field error.
    pub fn controller(&mut self) -> Result<ControllerTree, ConfigError> {
        let tree = ControllerTree {
            home: self.text(FieldId::Home)?,
            db: self.text(FieldId::CtrlDatabase)?,
            identity: self.identity([
                FieldId::CtrlIdentityCert,
                FieldId::CtrlIdentityServerCert,
                FieldId::CtrlIdentityKey,
                FieldId::CtrlIdentityCa,
            ])?,
            ctrl: self.ctrl_listener()?,
            ctrl_advertised: self
                .address(FieldId::CtrlAdvertisedAddress, FieldId::CtrlAdvertisedPort)?,
            mgmt: self.mgmt_listener()?,
            health_checks: HealthChecks {
                interval: self.duration(FieldId::HealthCheckInterval)?,
                timeout: self.duration(FieldId::HealthCheckTimeout)?,
                initial_delay: self.duration(FieldId::HealthCheckInitialDelay)?,
            },
            edge_api: EdgeApi {
                address: self.address(FieldId::EdgeApiAddress, FieldId::EdgeApiPort)?,
                session_timeout: self.duration(FieldId::EdgeApiSessionTimeout)?,
                activity_update_interval: self.duration(FieldId::EdgeApiActivityUpdateInterval)?,
                activity_update_batch_size: self.integer(FieldId::EdgeApiActivityUpdateBatchSize)?,
            },
            enrollment: Enrollment {
                signing_cert: self.text(FieldId::SigningCert)?,
                signing_key: self.text(FieldId::SigningKey)?,
                identity_duration: self.minutes(FieldId::EdgeIdentityEnrollmentDuration)?,
                router_duration: self.minutes(FieldId::EdgeRouterEnrollmentDuration)?,
            },
            web: vec![self.web_binding()?],
        };

        tracing::debug!(
            ctrl = %tree.ctrl.address,
            web = %tree.edge_api.address,
            "built controller tree"
        );
        Ok(tree)
    }

    /// Reads `[cert, server_cert, key, ca]`.
    pub(super) fn identity(&mut self, fields: [FieldId; 4]) -> Result<IdentityPaths, ConfigError> {
        let [cert, server_cert, key, ca] = fields;
        Ok(IdentityPaths {
            cert: self.text(cert)?,
            server_cert: self.text(server_cert)?,
            key: self.text(key)?,
            ca: self.text(ca)?,
        })
    }

    fn ctrl_listener(&mut self) -> Result<ChannelListener, ConfigError> {
        Ok(ChannelListener {
            address: self.address(FieldId::CtrlListenerAddress, FieldId::CtrlListenerPort)?,
            options: self.channel_options([
                FieldId::CtrlMinQueuedConnects,
                FieldId::CtrlMaxQueuedConnects,
                FieldId::CtrlDefaultQueuedConnects,
                FieldId::CtrlMinOutstandingConnects,
                FieldId::CtrlMaxOutstandingConnects,
                FieldId::CtrlDefaultOutstandingConnects,
                FieldId::CtrlMinConnectTimeout,
                FieldId::CtrlMaxConnectTimeout,
                FieldId::CtrlDefaultConnectTimeout,
            ])?,
        })
    }

    fn mgmt_listener(&mut self) -> Result<ChannelListener, ConfigError> {
        Ok(ChannelListener {
            address: self.address(FieldId::MgmtListenerAddress, FieldId::MgmtListenerPort)?,
            options: self.channel_options([
                FieldId::MgmtMinQueuedConnects,
                FieldId::MgmtMaxQueuedConnects,
                FieldId::MgmtDefaultQueuedConnects,
                FieldId::MgmtMinOutstandingConnects,
                FieldId::MgmtMaxOutstandingConnects,
                FieldId::MgmtDefaultOutstandingConnects,
                FieldId::MgmtMinConnectTimeout,
                FieldId::MgmtMaxConnectTimeout,
                FieldId::MgmtDefaultConnectTimeout,
            ])?,
        })
    }

    /// Reads channel options in declaration order of [`ChannelOptions`].
    fn channel_options(&mut self, fields: [FieldId; 9]) -> Result<ChannelOptions, ConfigError> {
        let [min_q, max_q, default_q, min_o, max_o, default_o, min_t, max_t, default_t] = fields;
        Ok(ChannelOptions {
            min_queued_connects: self.integer(min_q)?,
            max_queued_connects: self.integer(max_q)?,
            default_queued_connects: self.integer(default_q)?,
            min_outstanding_connects: self.integer(min_o)?,
            max_outstanding_connects: self.integer(max_o)?,
            default_outstanding_connects: self.integer(default_o)?,
            min_connect_timeout: self.duration(min_t)?,
            max_connect_timeout: self.duration(max_t)?,
            default_connect_timeout: self.duration(default_t)?,
        })
    }

    fn web_binding(&mut self) -> Result<WebBinding, ConfigError> {
        let bind_point = WebBindPoint {
            interface: self.composite_address(
                FieldId::WebListenerHostPort,
                FieldId::WebInterfaceAddress,
                FieldId::WebInterfacePort,
            )?,
            address: self.address(FieldId::WebAdvertisedAddress, FieldId::WebAdvertisedPort)?,
        };

        Ok(WebBinding {
            name: WEB_BINDING_NAME.to_string(),
            bind_points: vec![bind_point],
            identity: self.identity([
                FieldId::WebIdentityCert,
                FieldId::WebIdentityServerCert,
                FieldId::WebIdentityKey,
                FieldId::WebIdentityCa,
            ])?,
            options: WebOptions {
                idle_timeout: self.duration(FieldId::WebIdleTimeout)?,
                read_timeout: self.duration(FieldId::WebReadTimeout)?,
                write_timeout: self.duration(FieldId::WebWriteTimeout)?,
                min_tls_version: self.text(FieldId::WebMinTlsVersion)?,
                max_tls_version: self.text(FieldId::WebMaxTlsVersion)?,
            },
            apis: WEB_APIS.iter().map(ToString::to_string).collect(),
        })
    }
}
