//! Router value tree.

use std::time::Duration;

use serde::Serialize;

use super::{HostPort, IdentityPaths, TreeBuilder, serialize_millis};
use crate::config::{ConfigError, EnvSource, FieldId};
use crate::host::HostInfo;

/// Interface every router listener binds to.
pub const ROUTER_BIND_ADDRESS: &str = "0.0.0.0";

/// Edge listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct RouterEdge {
    /// Host name placed in the CSR SANs
    pub hostname: String,
    /// Where the edge listener binds
    pub bind: HostPort,
    /// What the router advertises to SDK clients
    pub advertise: HostPort,
    /// Extra IP placed in the CSR SANs
    pub ip_override: Option<String>,
    /// Time an SDK client has to finish connecting
    #[serde(serialize_with = "serialize_millis")]
    pub connect_timeout: Duration,
    /// Time allowed for a session lookup at the controller
    #[serde(serialize_with = "serialize_millis")]
    pub get_session_timeout: Duration,
}

/// Router-to-router link listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct LinkListener {
    /// Where the link listener binds
    pub bind: HostPort,
    /// What other routers dial
    pub advertise: HostPort,
}

/// Forwarder tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct Forwarder {
    /// Interval between link latency probes
    #[serde(serialize_with = "serialize_millis")]
    pub latency_probe_interval: Duration,
    /// Pending xgress dials allowed before new ones are rejected
    pub xgress_dial_queue_length: u32,
    /// Workers servicing xgress dials
    pub xgress_dial_worker_count: u32,
    /// Pending link dials allowed before new ones are rejected
    pub link_dial_queue_length: u32,
    /// Workers servicing link dials
    pub link_dial_worker_count: u32,
}

/// Fully resolved router configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct RouterTree {
    /// Router name, also the stem of its identity files
    pub name: String,
    /// Router identity files
    pub identity: IdentityPaths,
    /// Controller control plane endpoint
    pub ctrl_endpoint: HostPort,
    /// Link listener for router-to-router traffic
    pub link: LinkListener,
    /// Edge listener, unused when `fabric_only` is set
    pub edge: RouterEdge,
    /// No edge listener when set
    pub fabric_only: bool,
    /// Forwarder tuning
    pub forwarder: Forwarder,
}

impl<E, H> TreeBuilder<'_, E, H>
where
    E: EnvSource + ?Sized,
    H: HostInfo + ?Sized,
{
    /// Builds the router tree.
    ///
    /// # Errors
    ///
    /// Returns the first coercion or required-field error.
    pub fn router(&mut self) -> Result<RouterTree, ConfigError> {
        let name = self.text(FieldId::RouterName)?;
        let advertised_host = self.text(FieldId::RouterAdvertisedHost)?;
        let link_port = self.port(FieldId::RouterLinkListenerPort)?;

        let tree = RouterTree {
            identity: self.identity([
                FieldId::RouterIdentityCert,
                FieldId::RouterIdentityServerCert,
                FieldId::RouterIdentityKey,
                FieldId::RouterIdentityCa,
            ])?,
            ctrl_endpoint: self
                .address(FieldId::CtrlAdvertisedAddress, FieldId::CtrlAdvertisedPort)?,
            link: LinkListener {
                bind: HostPort::new(ROUTER_BIND_ADDRESS, link_port),
                advertise: HostPort::new(advertised_host.clone(), link_port),
            },
            edge: RouterEdge {
                hostname: name.clone(),
                bind: HostPort::new(
                    ROUTER_BIND_ADDRESS,
                    self.port(FieldId::RouterListenerBindPort)?,
                ),
                advertise: HostPort::new(advertised_host, self.port(FieldId::RouterEdgePort)?),
                ip_override: self.optional_text(FieldId::RouterIpOverride)?,
                connect_timeout: self.duration(FieldId::RouterConnectTimeout)?,
                get_session_timeout: self.duration(FieldId::RouterGetSessionTimeout)?,
            },
            fabric_only: self.boolean(FieldId::RouterFabricOnly)?,
            forwarder: Forwarder {
                latency_probe_interval: self.duration(FieldId::RouterLatencyProbeInterval)?,
                xgress_dial_queue_length: self.integer(FieldId::RouterXgressDialQueueLength)?,
                xgress_dial_worker_count: self.integer(FieldId::RouterXgressDialWorkerCount)?,
                link_dial_queue_length: self.integer(FieldId::RouterLinkDialQueueLength)?,
                link_dial_worker_count: self.integer(FieldId::RouterLinkDialWorkerCount)?,
            },
            name,
        };

        tracing::debug!(
            name = %tree.name,
            ctrl = %tree.ctrl_endpoint,
            fabric_only = tree.fabric_only,
            "built router tree"
        );
        Ok(tree)
    }
}
