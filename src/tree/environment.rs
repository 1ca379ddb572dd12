//! Environment variable listing projected from the built trees.

use serde::Serialize;

use super::{ControllerTree, RouterTree};
use crate::config::{FieldId, whole_minutes};

/// One documented environment variable and the value it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvVarDescriptor {
    /// Variable name, e.g. `ZITI_HOME`
    pub name: &'static str,
    /// Comment line rendered above the variable
    pub description: &'static str,
    /// Resolved value as it is exported
    pub value: String,
}

impl EnvVarDescriptor {
    fn new(field: FieldId, value: impl Into<String>) -> Self {
        Self {
            name: field.env_name().unwrap_or_else(|| field.key()),
            description: field.description(),
            value: value.into(),
        }
    }
}

/// Shell syntax for the listing's comments and assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OsTokens {
    /// Starts a comment line, `#` or `rem`
    pub comment_prefix: &'static str,
    /// Precedes an assignment, `export` or `SET`
    pub var_declare: &'static str,
}

impl OsTokens {
    /// `#` comments and `export` assignments.
    #[must_use]
    pub const fn posix() -> Self {
        Self {
            comment_prefix: "#",
            var_declare: "export",
        }
    }

    /// `rem` comments and `SET` assignments.
    #[must_use]
    pub const fn windows() -> Self {
        Self {
            comment_prefix: "rem",
            var_declare: "SET",
        }
    }

    /// Tokens for the platform this binary was built for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::windows()
        } else {
            Self::posix()
        }
    }
}

/// Ordered list of every user-facing environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentListing {
    /// Variables in listing order
    pub vars: Vec<EnvVarDescriptor>,
}

impl EnvironmentListing {
    /// Projects the listing from both component trees.
    ///
    /// Durations are listed as whole minutes and an unset router IP override
    /// as an empty value.
    #[must_use]
    pub fn from_trees(controller: &ControllerTree, router: &RouterTree) -> Self {
        use FieldId as F;

        let c = controller;
        let web = c.web.first();
        let bind_point = web.and_then(|w| w.bind_points.first());
        let minutes = |d| whole_minutes(d).to_string();

        let mut vars = vec![
            EnvVarDescriptor::new(F::Home, &c.home),
            EnvVarDescriptor::new(F::CtrlIdentityCert, &c.identity.cert),
            EnvVarDescriptor::new(F::CtrlIdentityServerCert, &c.identity.server_cert),
            EnvVarDescriptor::new(F::CtrlIdentityKey, &c.identity.key),
            EnvVarDescriptor::new(F::CtrlIdentityCa, &c.identity.ca),
            EnvVarDescriptor::new(F::CtrlListenerAddress, &c.ctrl.address.host),
            EnvVarDescriptor::new(F::CtrlListenerPort, c.ctrl.address.port.to_string()),
            EnvVarDescriptor::new(F::MgmtListenerAddress, &c.mgmt.address.host),
            EnvVarDescriptor::new(F::MgmtListenerPort, c.mgmt.address.port.to_string()),
            EnvVarDescriptor::new(F::EdgeApiAddress, &c.edge_api.address.host),
            EnvVarDescriptor::new(F::EdgeApiPort, c.edge_api.address.port.to_string()),
            EnvVarDescriptor::new(F::SigningCert, &c.enrollment.signing_cert),
            EnvVarDescriptor::new(F::SigningKey, &c.enrollment.signing_key),
            EnvVarDescriptor::new(
                F::EdgeIdentityEnrollmentDuration,
                minutes(c.enrollment.identity_duration),
            ),
            EnvVarDescriptor::new(
                F::EdgeRouterEnrollmentDuration,
                minutes(c.enrollment.router_duration),
            ),
        ];

        if let Some(bp) = bind_point {
            vars.extend([
                EnvVarDescriptor::new(F::WebInterfaceAddress, &bp.interface.host),
                EnvVarDescriptor::new(F::WebInterfacePort, bp.interface.port.to_string()),
                EnvVarDescriptor::new(F::WebAdvertisedAddress, &bp.address.host),
                EnvVarDescriptor::new(F::WebAdvertisedPort, bp.address.port.to_string()),
            ]);
        }
        if let Some(w) = web {
            vars.extend([
                EnvVarDescriptor::new(F::WebIdentityCert, &w.identity.cert),
                EnvVarDescriptor::new(F::WebIdentityServerCert, &w.identity.server_cert),
                EnvVarDescriptor::new(F::WebIdentityKey, &w.identity.key),
                EnvVarDescriptor::new(F::WebIdentityCa, &w.identity.ca),
            ]);
        }

        let r = router;
        vars.extend([
            EnvVarDescriptor::new(F::RouterName, &r.edge.hostname),
            EnvVarDescriptor::new(F::RouterEdgePort, r.edge.advertise.port.to_string()),
            EnvVarDescriptor::new(F::RouterListenerBindPort, r.edge.bind.port.to_string()),
            EnvVarDescriptor::new(F::RouterIdentityCert, &r.identity.cert),
            EnvVarDescriptor::new(F::RouterIdentityServerCert, &r.identity.server_cert),
            EnvVarDescriptor::new(F::RouterIdentityKey, &r.identity.key),
            EnvVarDescriptor::new(F::RouterIdentityCa, &r.identity.ca),
            EnvVarDescriptor::new(
                F::RouterIpOverride,
                r.edge.ip_override.clone().unwrap_or_default(),
            ),
            EnvVarDescriptor::new(F::RouterAdvertisedHost, &r.edge.advertise.host),
        ]);

        Self { vars }
    }

    /// Looks up a descriptor by variable name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EnvVarDescriptor> {
        self.vars.iter().find(|v| v.name == name)
    }
}
