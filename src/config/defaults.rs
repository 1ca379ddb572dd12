//! Default values for configuration fields.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase,
//! plus [`default_for`], the total lookup used by the source resolver.

use std::time::Duration;

use super::field::FieldId;

/// Default control plane listener address.
pub const CTRL_LISTENER_ADDRESS: &str = "0.0.0.0";

/// Default control plane listener port.
pub const CTRL_LISTENER_PORT: u32 = 6262;

/// Default management plane listener address.
pub const MGMT_LISTENER_ADDRESS: &str = "127.0.0.1";

/// Default management plane listener port.
pub const MGMT_LISTENER_PORT: u32 = 10000;

/// Default web listener interface address.
pub const WEB_INTERFACE_ADDRESS: &str = "0.0.0.0";

/// Default web advertised port.
pub const WEB_ADVERTISED_PORT: u32 = 1280;

/// Default edge router port.
pub const ROUTER_EDGE_PORT: u32 = 3022;

/// Default router link listener port.
pub const ROUTER_LINK_LISTENER_PORT: u32 = 10080;

/// Default enrollment duration in minutes for identities and routers.
pub const ENROLLMENT_DURATION_MINUTES: u64 = 180;

/// Default minimum TLS version accepted by the web listener.
pub const MIN_TLS_VERSION: &str = "TLS1.2";

/// Default maximum TLS version accepted by the web listener.
pub const MAX_TLS_VERSION: &str = "TLS1.3";

/// Host identifier used when neither the hostname nor a network name is known.
pub const HOST_IDENTIFIER_FALLBACK: &str = "ziti";

/// Advertised host used when the hostname cannot be read.
pub const ADVERTISED_HOST_FALLBACK: &str = "localhost";

/// Controller database path relative to the home directory.
pub const CTRL_DATABASE_PATH: &str = "db/ctrl.db";

/// Default enrollment duration.
#[must_use]
pub const fn enrollment_duration() -> Duration {
    Duration::from_secs(ENROLLMENT_DURATION_MINUTES * 60)
}

/// Default value of a field.
///
/// Most defaults are static; some depend on the host or on another field and
/// are expressed as a [`Derivation`] that the tree builder evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// Static text.
    Text(&'static str),
    /// Static duration.
    Duration(Duration),
    /// Static integer.
    Integer(u32),
    /// Static switch.
    Boolean(bool),
    /// Computed from the host or another field.
    Derived(Derivation),
    /// Optional field with no default.
    Unset,
}

/// Rule for a default that is computed rather than fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    /// The process working directory.
    WorkingDirectory,
    /// The OS hostname, or [`ADVERTISED_HOST_FALLBACK`].
    Hostname,
    /// `<home>/<stem><suffix>`.
    HomeFile {
        /// Where the file name stem comes from
        stem: FileStem,
        /// Suffix appended to the stem
        suffix: &'static str,
    },
    /// A fixed path under the home directory.
    HomePath(&'static str),
    /// The resolved value of another field.
    SameAs(FieldId),
    /// The first of these fields that has a value.
    FirstSet(&'static [FieldId]),
}

/// Source of a derived file name stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStem {
    /// The hostname, or the network name when the hostname is unavailable.
    HostIdentifier,
    /// The resolved value of a field.
    Field(FieldId),
}

const fn host_file(suffix: &'static str) -> DefaultValue {
    DefaultValue::Derived(Derivation::HomeFile {
        stem: FileStem::HostIdentifier,
        suffix,
    })
}

const fn router_file(suffix: &'static str) -> DefaultValue {
    DefaultValue::Derived(Derivation::HomeFile {
        stem: FileStem::Field(FieldId::RouterName),
        suffix,
    })
}

const fn same_as(field: FieldId) -> DefaultValue {
    DefaultValue::Derived(Derivation::SameAs(field))
}

const fn millis(ms: u64) -> DefaultValue {
    DefaultValue::Duration(Duration::from_millis(ms))
}

const fn secs(s: u64) -> DefaultValue {
    DefaultValue::Duration(Duration::from_secs(s))
}

const fn mins(m: u64) -> DefaultValue {
    DefaultValue::Duration(Duration::from_secs(m * 60))
}

/// Returns the default for a field.
///
/// Total over [`FieldId`]: every field has an entry, even if it is
/// [`DefaultValue::Unset`].
#[must_use]
#[allow(clippy::too_many_lines)] // flat lookup table
pub const fn default_for(field: FieldId) -> DefaultValue {
    use DefaultValue::{Boolean, Derived, Integer, Text, Unset};

    match field {
        FieldId::Home => Derived(Derivation::WorkingDirectory),
        FieldId::NetworkName | FieldId::WebListenerHostPort | FieldId::RouterIpOverride => Unset,

        FieldId::CtrlIdentityCert => host_file(".cert"),
        FieldId::CtrlIdentityServerCert => host_file(".server.chain.cert"),
        FieldId::CtrlIdentityKey => host_file(".key"),
        FieldId::CtrlIdentityCa => host_file(".ca"),
        FieldId::CtrlDatabase => Derived(Derivation::HomePath(CTRL_DATABASE_PATH)),

        FieldId::CtrlListenerAddress => Text(CTRL_LISTENER_ADDRESS),
        FieldId::CtrlListenerPort => Integer(CTRL_LISTENER_PORT),
        FieldId::CtrlAdvertisedAddress
        | FieldId::WebAdvertisedAddress
        | FieldId::RouterName => Derived(Derivation::Hostname),
        FieldId::CtrlAdvertisedPort => same_as(FieldId::CtrlListenerPort),

        FieldId::MgmtListenerAddress => Text(MGMT_LISTENER_ADDRESS),
        FieldId::MgmtListenerPort => Integer(MGMT_LISTENER_PORT),

        FieldId::CtrlMinQueuedConnects
        | FieldId::MgmtMinQueuedConnects
        | FieldId::CtrlMinOutstandingConnects
        | FieldId::MgmtMinOutstandingConnects => Integer(1),
        FieldId::CtrlMaxQueuedConnects | FieldId::MgmtMaxQueuedConnects => Integer(5000),
        FieldId::CtrlDefaultQueuedConnects | FieldId::MgmtDefaultQueuedConnects => Integer(1000),
        FieldId::CtrlMaxOutstandingConnects | FieldId::MgmtMaxOutstandingConnects => {
            Integer(1000)
        }
        FieldId::CtrlDefaultOutstandingConnects | FieldId::MgmtDefaultOutstandingConnects => {
            Integer(16)
        }
        FieldId::CtrlMinConnectTimeout | FieldId::MgmtMinConnectTimeout => millis(30),
        FieldId::CtrlMaxConnectTimeout | FieldId::MgmtMaxConnectTimeout => millis(60_000),
        FieldId::CtrlDefaultConnectTimeout | FieldId::MgmtDefaultConnectTimeout => millis(5000),

        FieldId::HealthCheckInterval => secs(30),
        FieldId::HealthCheckTimeout | FieldId::HealthCheckInitialDelay => secs(15),

        FieldId::EdgeApiAddress => same_as(FieldId::WebAdvertisedAddress),
        FieldId::EdgeApiPort => same_as(FieldId::WebAdvertisedPort),
        FieldId::EdgeApiActivityUpdateInterval => secs(90),
        FieldId::EdgeApiActivityUpdateBatchSize => Integer(250),
        FieldId::EdgeApiSessionTimeout => mins(30),

        FieldId::SigningCert => host_file(".signing.cert"),
        FieldId::SigningKey => host_file(".signing.key"),
        FieldId::EdgeIdentityEnrollmentDuration | FieldId::EdgeRouterEnrollmentDuration => {
            DefaultValue::Duration(enrollment_duration())
        }

        FieldId::WebInterfaceAddress => Text(WEB_INTERFACE_ADDRESS),
        FieldId::WebInterfacePort => same_as(FieldId::WebAdvertisedPort),
        FieldId::WebAdvertisedPort => Integer(WEB_ADVERTISED_PORT),
        FieldId::WebIdentityCert => same_as(FieldId::CtrlIdentityCert),
        FieldId::WebIdentityServerCert => same_as(FieldId::CtrlIdentityServerCert),
        FieldId::WebIdentityKey => same_as(FieldId::CtrlIdentityKey),
        FieldId::WebIdentityCa => same_as(FieldId::CtrlIdentityCa),
        FieldId::WebIdleTimeout | FieldId::WebReadTimeout => millis(5000),
        FieldId::WebWriteTimeout => millis(100_000),
        FieldId::WebMinTlsVersion => Text(MIN_TLS_VERSION),
        FieldId::WebMaxTlsVersion => Text(MAX_TLS_VERSION),

        FieldId::RouterEdgePort => Integer(ROUTER_EDGE_PORT),
        FieldId::RouterListenerBindPort => same_as(FieldId::RouterEdgePort),
        FieldId::RouterIdentityCert => router_file(".cert"),
        FieldId::RouterIdentityServerCert => router_file(".server.chain.cert"),
        FieldId::RouterIdentityKey => router_file(".key"),
        FieldId::RouterIdentityCa => router_file(".cas"),
        FieldId::RouterAdvertisedHost => Derived(Derivation::FirstSet(&[
            FieldId::RouterIpOverride,
            FieldId::RouterName,
        ])),
        FieldId::RouterFabricOnly => Boolean(false),
        FieldId::RouterLinkListenerPort => Integer(ROUTER_LINK_LISTENER_PORT),
        FieldId::RouterConnectTimeout => millis(1000),
        FieldId::RouterGetSessionTimeout => secs(60),
        FieldId::RouterLatencyProbeInterval => secs(10),
        FieldId::RouterXgressDialQueueLength | FieldId::RouterLinkDialQueueLength => {
            Integer(1000)
        }
        FieldId::RouterXgressDialWorkerCount => Integer(128),
        FieldId::RouterLinkDialWorkerCount => Integer(32),
    }
}
