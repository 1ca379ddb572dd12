//! Catalog of every configurable setting.
//!
//! Each [`FieldId`] knows its stable dotted key, the environment variable and
//! CLI flag that may override it, a human description, and the [`FieldKind`]
//! that decides how raw override text is coerced.

use std::fmt;

/// Declared type of a field, used to coerce raw override text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, used verbatim.
    Text,
    /// Filesystem path; `~` is expanded and separators normalized to `/`.
    Path,
    /// TCP port in `1..=65535`.
    Port,
    /// Non-negative integer.
    Integer,
    /// Duration; a bare number means minutes.
    Duration,
    /// Boolean switch.
    Boolean,
}

/// Identifier of one configurable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    // Shared
    Home,
    NetworkName,

    // Controller identity and storage
    CtrlIdentityCert,
    CtrlIdentityServerCert,
    CtrlIdentityKey,
    CtrlIdentityCa,
    CtrlDatabase,

    // Controller control plane
    CtrlListenerAddress,
    CtrlListenerPort,
    CtrlAdvertisedAddress,
    CtrlAdvertisedPort,
    CtrlMinQueuedConnects,
    CtrlMaxQueuedConnects,
    CtrlDefaultQueuedConnects,
    CtrlMinOutstandingConnects,
    CtrlMaxOutstandingConnects,
    CtrlDefaultOutstandingConnects,
    CtrlMinConnectTimeout,
    CtrlMaxConnectTimeout,
    CtrlDefaultConnectTimeout,

    // Controller management plane
    MgmtListenerAddress,
    MgmtListenerPort,
    MgmtMinQueuedConnects,
    MgmtMaxQueuedConnects,
    MgmtDefaultQueuedConnects,
    MgmtMinOutstandingConnects,
    MgmtMaxOutstandingConnects,
    MgmtDefaultOutstandingConnects,
    MgmtMinConnectTimeout,
    MgmtMaxConnectTimeout,
    MgmtDefaultConnectTimeout,

    // Health checks
    HealthCheckInterval,
    HealthCheckTimeout,
    HealthCheckInitialDelay,

    // Edge API
    EdgeApiAddress,
    EdgeApiPort,
    EdgeApiActivityUpdateInterval,
    EdgeApiActivityUpdateBatchSize,
    EdgeApiSessionTimeout,

    // Enrollment
    SigningCert,
    SigningKey,
    EdgeIdentityEnrollmentDuration,
    EdgeRouterEnrollmentDuration,

    // Web bindings
    WebInterfaceAddress,
    WebInterfacePort,
    WebListenerHostPort,
    WebAdvertisedAddress,
    WebAdvertisedPort,
    WebIdentityCert,
    WebIdentityServerCert,
    WebIdentityKey,
    WebIdentityCa,
    WebIdleTimeout,
    WebReadTimeout,
    WebWriteTimeout,
    WebMinTlsVersion,
    WebMaxTlsVersion,

    // Router
    RouterName,
    RouterEdgePort,
    RouterListenerBindPort,
    RouterIdentityCert,
    RouterIdentityServerCert,
    RouterIdentityKey,
    RouterIdentityCa,
    RouterIpOverride,
    RouterAdvertisedHost,
    RouterFabricOnly,
    RouterLinkListenerPort,
    RouterConnectTimeout,
    RouterGetSessionTimeout,
    RouterLatencyProbeInterval,
    RouterXgressDialQueueLength,
    RouterXgressDialWorkerCount,
    RouterLinkDialQueueLength,
    RouterLinkDialWorkerCount,
}

/// Static description of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Stable dotted identifier, e.g. `controller.ctrl.listener.port`.
    pub key: &'static str,
    /// Environment variable that overrides the field, if any.
    pub env: Option<&'static str>,
    /// CLI flag (without leading dashes) that overrides the field, if any.
    pub flag: Option<&'static str>,
    /// Human description shown in the environment listing.
    pub description: &'static str,
    /// Declared type.
    pub kind: FieldKind,
}

const fn spec(
    key: &'static str,
    env: Option<&'static str>,
    description: &'static str,
    kind: FieldKind,
) -> FieldSpec {
    FieldSpec {
        key,
        env,
        flag: None,
        description,
        kind,
    }
}

const fn internal(key: &'static str, kind: FieldKind) -> FieldSpec {
    spec(key, None, "", kind)
}

impl FieldSpec {
    const fn with_flag(mut self, flag: &'static str) -> Self {
        self.flag = Some(flag);
        self
    }
}

impl FieldId {
    /// Every field in the catalog, in declaration order.
    pub const ALL: &'static [Self] = &[
        Self::Home,
        Self::NetworkName,
        Self::CtrlIdentityCert,
        Self::CtrlIdentityServerCert,
        Self::CtrlIdentityKey,
        Self::CtrlIdentityCa,
        Self::CtrlDatabase,
        Self::CtrlListenerAddress,
        Self::CtrlListenerPort,
        Self::CtrlAdvertisedAddress,
        Self::CtrlAdvertisedPort,
        Self::CtrlMinQueuedConnects,
        Self::CtrlMaxQueuedConnects,
        Self::CtrlDefaultQueuedConnects,
        Self::CtrlMinOutstandingConnects,
        Self::CtrlMaxOutstandingConnects,
        Self::CtrlDefaultOutstandingConnects,
        Self::CtrlMinConnectTimeout,
        Self::CtrlMaxConnectTimeout,
        Self::CtrlDefaultConnectTimeout,
        Self::MgmtListenerAddress,
        Self::MgmtListenerPort,
        Self::MgmtMinQueuedConnects,
        Self::MgmtMaxQueuedConnects,
        Self::MgmtDefaultQueuedConnects,
        Self::MgmtMinOutstandingConnects,
        Self::MgmtMaxOutstandingConnects,
        Self::MgmtDefaultOutstandingConnects,
        Self::MgmtMinConnectTimeout,
        Self::MgmtMaxConnectTimeout,
        Self::MgmtDefaultConnectTimeout,
        Self::HealthCheckInterval,
        Self::HealthCheckTimeout,
        Self::HealthCheckInitialDelay,
        Self::EdgeApiAddress,
        Self::EdgeApiPort,
        Self::EdgeApiActivityUpdateInterval,
        Self::EdgeApiActivityUpdateBatchSize,
        Self::EdgeApiSessionTimeout,
        Self::SigningCert,
        Self::SigningKey,
        Self::EdgeIdentityEnrollmentDuration,
        Self::EdgeRouterEnrollmentDuration,
        Self::WebInterfaceAddress,
        Self::WebInterfacePort,
        Self::WebListenerHostPort,
        Self::WebAdvertisedAddress,
        Self::WebAdvertisedPort,
        Self::WebIdentityCert,
        Self::WebIdentityServerCert,
        Self::WebIdentityKey,
        Self::WebIdentityCa,
        Self::WebIdleTimeout,
        Self::WebReadTimeout,
        Self::WebWriteTimeout,
        Self::WebMinTlsVersion,
        Self::WebMaxTlsVersion,
        Self::RouterName,
        Self::RouterEdgePort,
        Self::RouterListenerBindPort,
        Self::RouterIdentityCert,
        Self::RouterIdentityServerCert,
        Self::RouterIdentityKey,
        Self::RouterIdentityCa,
        Self::RouterIpOverride,
        Self::RouterAdvertisedHost,
        Self::RouterFabricOnly,
        Self::RouterLinkListenerPort,
        Self::RouterConnectTimeout,
        Self::RouterGetSessionTimeout,
        Self::RouterLatencyProbeInterval,
        Self::RouterXgressDialQueueLength,
        Self::RouterXgressDialWorkerCount,
        Self::RouterLinkDialQueueLength,
        Self::RouterLinkDialWorkerCount,
    ];

    /// Returns the static description of this field.
    #[must_use]
    #[allow(clippy::too_many_lines)] // flat lookup table
    pub const fn spec(self) -> FieldSpec {
        use FieldKind::{Boolean, Duration, Integer, Path, Port, Text};

        match self {
            Self::Home => spec(
                "ziti.home",
                Some("ZITI_HOME"),
                "Root home directory for Ziti related files",
                Path,
            ),
            Self::NetworkName => spec(
                "ziti.network",
                Some("ZITI_NETWORK"),
                "Network name used for file names when the hostname is unavailable",
                Text,
            ),

            Self::CtrlIdentityCert => spec(
                "controller.identity.cert",
                Some("ZITI_PKI_CTRL_CERT"),
                "Path to Controller's identity certificate",
                Path,
            ),
            Self::CtrlIdentityServerCert => spec(
                "controller.identity.serverCert",
                Some("ZITI_PKI_CTRL_SERVER_CERT"),
                "Path to Controller's server certificate chain",
                Path,
            ),
            Self::CtrlIdentityKey => spec(
                "controller.identity.key",
                Some("ZITI_PKI_CTRL_KEY"),
                "Path to Controller's identity private key",
                Path,
            ),
            Self::CtrlIdentityCa => spec(
                "controller.identity.ca",
                Some("ZITI_PKI_CTRL_CA"),
                "Path to Controller's identity CA bundle",
                Path,
            ),
            Self::CtrlDatabase => internal("controller.db", Path),

            Self::CtrlListenerAddress => spec(
                "controller.ctrl.listener.address",
                Some("ZITI_CTRL_LISTENER_ADDRESS"),
                "The address of the controller's control plane listener",
                Text,
            ),
            Self::CtrlListenerPort => spec(
                "controller.ctrl.listener.port",
                Some("ZITI_CTRL_LISTENER_PORT"),
                "The port of the controller's control plane listener",
                Port,
            ),
            Self::CtrlAdvertisedAddress => spec(
                "controller.ctrl.advertised.address",
                Some("ZITI_CTRL_ADVERTISED_ADDRESS"),
                "The address routers use to reach the controller's control plane",
                Text,
            ),
            Self::CtrlAdvertisedPort => spec(
                "controller.ctrl.advertised.port",
                Some("ZITI_CTRL_ADVERTISED_PORT"),
                "The port routers use to reach the controller's control plane",
                Port,
            ),
            Self::CtrlMinQueuedConnects => {
                internal("controller.ctrl.options.minQueuedConnects", Integer)
            }
            Self::CtrlMaxQueuedConnects => {
                internal("controller.ctrl.options.maxQueuedConnects", Integer)
            }
            Self::CtrlDefaultQueuedConnects => {
                internal("controller.ctrl.options.defaultQueuedConnects", Integer)
            }
            Self::CtrlMinOutstandingConnects => {
                internal("controller.ctrl.options.minOutstandingConnects", Integer)
            }
            Self::CtrlMaxOutstandingConnects => {
                internal("controller.ctrl.options.maxOutstandingConnects", Integer)
            }
            Self::CtrlDefaultOutstandingConnects => {
                internal("controller.ctrl.options.defaultOutstandingConnects", Integer)
            }
            Self::CtrlMinConnectTimeout => {
                internal("controller.ctrl.options.minConnectTimeout", Duration)
            }
            Self::CtrlMaxConnectTimeout => {
                internal("controller.ctrl.options.maxConnectTimeout", Duration)
            }
            Self::CtrlDefaultConnectTimeout => {
                internal("controller.ctrl.options.defaultConnectTimeout", Duration)
            }

            Self::MgmtListenerAddress => spec(
                "controller.mgmt.listener.address",
                Some("ZITI_CTRL_MGMT_ADDRESS"),
                "The address of the controller's management plane listener",
                Text,
            ),
            Self::MgmtListenerPort => spec(
                "controller.mgmt.listener.port",
                Some("ZITI_CTRL_MGMT_PORT"),
                "The port of the controller's management plane listener",
                Port,
            ),
            Self::MgmtMinQueuedConnects => {
                internal("controller.mgmt.options.minQueuedConnects", Integer)
            }
            Self::MgmtMaxQueuedConnects => {
                internal("controller.mgmt.options.maxQueuedConnects", Integer)
            }
            Self::MgmtDefaultQueuedConnects => {
                internal("controller.mgmt.options.defaultQueuedConnects", Integer)
            }
            Self::MgmtMinOutstandingConnects => {
                internal("controller.mgmt.options.minOutstandingConnects", Integer)
            }
            Self::MgmtMaxOutstandingConnects => {
                internal("controller.mgmt.options.maxOutstandingConnects", Integer)
            }
            Self::MgmtDefaultOutstandingConnects => {
                internal("controller.mgmt.options.defaultOutstandingConnects", Integer)
            }
            Self::MgmtMinConnectTimeout => {
                internal("controller.mgmt.options.minConnectTimeout", Duration)
            }
            Self::MgmtMaxConnectTimeout => {
                internal("controller.mgmt.options.maxConnectTimeout", Duration)
            }
            Self::MgmtDefaultConnectTimeout => {
                internal("controller.mgmt.options.defaultConnectTimeout", Duration)
            }

            Self::HealthCheckInterval => {
                internal("controller.healthChecks.boltCheck.interval", Duration)
            }
            Self::HealthCheckTimeout => {
                internal("controller.healthChecks.boltCheck.timeout", Duration)
            }
            Self::HealthCheckInitialDelay => {
                internal("controller.healthChecks.boltCheck.initialDelay", Duration)
            }

            Self::EdgeApiAddress => spec(
                "controller.edge.api.address",
                Some("ZITI_CTRL_EDGE_API_ADDRESS"),
                "The advertised address of the controller's edge API",
                Text,
            ),
            Self::EdgeApiPort => spec(
                "controller.edge.api.port",
                Some("ZITI_CTRL_EDGE_API_PORT"),
                "The advertised port of the controller's edge API",
                Port,
            ),
            Self::EdgeApiActivityUpdateInterval => {
                internal("controller.edge.api.activityUpdateInterval", Duration)
            }
            Self::EdgeApiActivityUpdateBatchSize => {
                internal("controller.edge.api.activityUpdateBatchSize", Integer)
            }
            Self::EdgeApiSessionTimeout => {
                internal("controller.edge.api.sessionTimeout", Duration)
            }

            Self::SigningCert => spec(
                "controller.edge.enrollment.signingCert.cert",
                Some("ZITI_PKI_SIGNER_CERT"),
                "Path to the controller's enrollment signing certificate",
                Path,
            ),
            Self::SigningKey => spec(
                "controller.edge.enrollment.signingCert.key",
                Some("ZITI_PKI_SIGNER_KEY"),
                "Path to the controller's enrollment signing key",
                Path,
            ),
            Self::EdgeIdentityEnrollmentDuration => spec(
                "controller.edge.enrollment.edgeIdentity.duration",
                Some("ZITI_EDGE_IDENTITY_ENROLLMENT_DURATION"),
                "The identity enrollment duration in minutes",
                Duration,
            )
            .with_flag("identityEnrollmentDuration"),
            Self::EdgeRouterEnrollmentDuration => spec(
                "controller.edge.enrollment.edgeRouter.duration",
                Some("ZITI_EDGE_ROUTER_ENROLLMENT_DURATION"),
                "The router enrollment duration in minutes",
                Duration,
            )
            .with_flag("routerEnrollmentDuration"),

            Self::WebInterfaceAddress => spec(
                "controller.web.bindPoint.interface.address",
                Some("ZITI_CTRL_WEB_INTERFACE_ADDRESS"),
                "The interface address the controller's web listener binds to",
                Text,
            ),
            Self::WebInterfacePort => spec(
                "controller.web.bindPoint.interface.port",
                Some("ZITI_CTRL_WEB_INTERFACE_PORT"),
                "The interface port the controller's web listener binds to",
                Port,
            ),
            Self::WebListenerHostPort => spec(
                "controller.web.bindPoint.interface",
                Some("ZITI_CTRL_EDGE_LISTENER_HOST_PORT"),
                "The combined host:port the controller's web listener binds to",
                Text,
            ),
            Self::WebAdvertisedAddress => spec(
                "controller.web.bindPoint.address.address",
                Some("ZITI_CTRL_WEB_ADVERTISED_ADDRESS"),
                "The address clients use to reach the controller's web listener",
                Text,
            ),
            Self::WebAdvertisedPort => spec(
                "controller.web.bindPoint.address.port",
                Some("ZITI_CTRL_WEB_ADVERTISED_PORT"),
                "The port clients use to reach the controller's web listener",
                Port,
            ),
            Self::WebIdentityCert => spec(
                "controller.web.identity.cert",
                Some("ZITI_PKI_EDGE_CERT"),
                "Path to the web listener's identity certificate",
                Path,
            ),
            Self::WebIdentityServerCert => spec(
                "controller.web.identity.serverCert",
                Some("ZITI_PKI_EDGE_SERVER_CERT"),
                "Path to the web listener's server certificate chain",
                Path,
            ),
            Self::WebIdentityKey => spec(
                "controller.web.identity.key",
                Some("ZITI_PKI_EDGE_KEY"),
                "Path to the web listener's identity private key",
                Path,
            ),
            Self::WebIdentityCa => spec(
                "controller.web.identity.ca",
                Some("ZITI_PKI_EDGE_CA"),
                "Path to the web listener's identity CA bundle",
                Path,
            ),
            Self::WebIdleTimeout => internal("controller.web.options.idleTimeout", Duration),
            Self::WebReadTimeout => internal("controller.web.options.readTimeout", Duration),
            Self::WebWriteTimeout => internal("controller.web.options.writeTimeout", Duration),
            Self::WebMinTlsVersion => spec(
                "controller.web.options.minTLSVersion",
                Some("ZITI_CTRL_WEB_MIN_TLS_VERSION"),
                "The minimum TLS version accepted by the web listener",
                Text,
            ),
            Self::WebMaxTlsVersion => spec(
                "controller.web.options.maxTLSVersion",
                Some("ZITI_CTRL_WEB_MAX_TLS_VERSION"),
                "The maximum TLS version accepted by the web listener",
                Text,
            ),

            Self::RouterName => spec(
                "router.name",
                Some("ZITI_EDGE_ROUTER_NAME"),
                "The name of the edge router",
                Text,
            )
            .with_flag("routerName"),
            Self::RouterEdgePort => spec(
                "router.edge.port",
                Some("ZITI_EDGE_ROUTER_PORT"),
                "The advertised port of the edge router",
                Port,
            ),
            Self::RouterListenerBindPort => spec(
                "router.edge.listenerBindPort",
                Some("ZITI_EDGE_ROUTER_LISTENER_BIND_PORT"),
                "The port the edge router's edge listener binds to",
                Port,
            ),
            Self::RouterIdentityCert => spec(
                "router.identity.cert",
                Some("ZITI_ROUTER_IDENTITY_CERT"),
                "Path to the router's identity certificate",
                Path,
            ),
            Self::RouterIdentityServerCert => spec(
                "router.identity.serverCert",
                Some("ZITI_ROUTER_IDENTITY_SERVER_CERT"),
                "Path to the router's server certificate chain",
                Path,
            ),
            Self::RouterIdentityKey => spec(
                "router.identity.key",
                Some("ZITI_ROUTER_IDENTITY_KEY"),
                "Path to the router's identity private key",
                Path,
            ),
            Self::RouterIdentityCa => spec(
                "router.identity.ca",
                Some("ZITI_ROUTER_IDENTITY_CA"),
                "Path to the router's identity CA bundle",
                Path,
            ),
            Self::RouterIpOverride => spec(
                "router.edge.ipOverride",
                Some("ZITI_EDGE_ROUTER_IP_OVERRIDE"),
                "An additional IP address placed in the router's certificate SANs",
                Text,
            ),
            Self::RouterAdvertisedHost => spec(
                "router.edge.advertisedHost",
                Some("ZITI_EDGE_ROUTER_ADVERTISED_HOST"),
                "The host the edge router advertises to clients",
                Text,
            ),
            Self::RouterFabricOnly => internal("router.fabricOnly", Boolean).with_flag("fabric"),
            Self::RouterLinkListenerPort => internal("router.link.listener.port", Port),
            Self::RouterConnectTimeout => internal("router.edge.options.connectTimeout", Duration),
            Self::RouterGetSessionTimeout => {
                internal("router.edge.options.getSessionTimeout", Duration)
            }
            Self::RouterLatencyProbeInterval => {
                internal("router.forwarder.latencyProbeInterval", Duration)
            }
            Self::RouterXgressDialQueueLength => {
                internal("router.forwarder.xgressDialQueueLength", Integer)
            }
            Self::RouterXgressDialWorkerCount => {
                internal("router.forwarder.xgressDialWorkerCount", Integer)
            }
            Self::RouterLinkDialQueueLength => {
                internal("router.forwarder.linkDialQueueLength", Integer)
            }
            Self::RouterLinkDialWorkerCount => {
                internal("router.forwarder.linkDialWorkerCount", Integer)
            }
        }
    }

    /// Stable dotted key of the field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        self.spec().key
    }

    /// Environment variable that overrides the field, if any.
    #[must_use]
    pub const fn env_name(self) -> Option<&'static str> {
        self.spec().env
    }

    /// CLI flag that overrides the field, if any.
    #[must_use]
    pub const fn flag_name(self) -> Option<&'static str> {
        self.spec().flag
    }

    /// Human description of the field.
    #[must_use]
    pub const fn description(self) -> &'static str {
        self.spec().description
    }

    /// Declared type of the field.
    #[must_use]
    pub const fn kind(self) -> FieldKind {
        self.spec().kind
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn keys_are_unique() {
        let keys: HashSet<_> = FieldId::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(keys.len(), FieldId::ALL.len());
    }

    #[test]
    fn env_names_are_unique() {
        let names: Vec<_> = FieldId::ALL.iter().filter_map(|f| f.env_name()).collect();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn every_env_field_has_a_description() {
        for field in FieldId::ALL.iter().filter(|f| f.env_name().is_some()) {
            assert!(!field.description().is_empty(), "{field} has no description");
        }
    }

    #[test]
    fn enrollment_durations_have_flags() {
        assert_eq!(
            FieldId::EdgeIdentityEnrollmentDuration.flag_name(),
            Some("identityEnrollmentDuration")
        );
        assert_eq!(
            FieldId::EdgeRouterEnrollmentDuration.flag_name(),
            Some("routerEnrollmentDuration")
        );
    }

    #[test]
    fn display_uses_key() {
        assert_eq!(
            FieldId::CtrlListenerPort.to_string(),
            "controller.ctrl.listener.port"
        );
    }
}
