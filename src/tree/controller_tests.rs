//! Tests for the controller tree.

use std::collections::HashMap;
use std::time::Duration;

use super::{Component, ControllerTree, HostPort, TreeBuilder, ValueTree};
use crate::config::{ConfigError, FieldId, FlagOverrides};
use crate::host::FixedHost;

const HOSTNAME: &str = "ctrl-host";
const WORKDIR: &str = "/opt/ziti";

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn build_with(flags: &FlagOverrides, pairs: &[(&str, &str)]) -> Result<ControllerTree, ConfigError> {
    let env = env(pairs);
    let host = FixedHost::new(HOSTNAME, WORKDIR);
    match TreeBuilder::new(flags, &env, &host).build(Component::Controller)? {
        ValueTree::Controller(tree) => Ok(tree),
        ValueTree::Router(_) => panic!("expected a controller tree"),
    }
}

fn build(pairs: &[(&str, &str)]) -> ControllerTree {
    build_with(&FlagOverrides::new(), pairs).unwrap()
}

mod defaults {
    use super::*;

    #[test]
    fn identity_paths_use_home_and_hostname() {
        let tree = build(&[]);

        assert_eq!(tree.identity.cert, "/opt/ziti/ctrl-host.cert");
        assert_eq!(tree.identity.server_cert, "/opt/ziti/ctrl-host.server.chain.cert");
        assert_eq!(tree.identity.key, "/opt/ziti/ctrl-host.key");
        assert_eq!(tree.identity.ca, "/opt/ziti/ctrl-host.ca");
        assert_eq!(tree.db, "/opt/ziti/db/ctrl.db");
    }

    #[test]
    fn listeners() {
        let tree = build(&[]);

        assert_eq!(tree.ctrl.address, HostPort::new("0.0.0.0", 6262));
        assert_eq!(tree.mgmt.address, HostPort::new("127.0.0.1", 10000));
        assert_eq!(tree.ctrl_advertised, HostPort::new(HOSTNAME, 6262));
    }

    #[test]
    fn channel_options() {
        let options = build(&[]).ctrl.options;

        assert_eq!(options.min_queued_connects, 1);
        assert_eq!(options.max_queued_connects, 5000);
        assert_eq!(options.default_queued_connects, 1000);
        assert_eq!(options.min_outstanding_connects, 1);
        assert_eq!(options.max_outstanding_connects, 1000);
        assert_eq!(options.default_outstanding_connects, 16);
        assert_eq!(options.min_connect_timeout, Duration::from_millis(30));
        assert_eq!(options.max_connect_timeout, Duration::from_millis(60_000));
        assert_eq!(options.default_connect_timeout, Duration::from_millis(5000));
    }

    #[test]
    fn timings() {
        let tree = build(&[]);

        assert_eq!(tree.health_checks.interval, Duration::from_secs(30));
        assert_eq!(tree.health_checks.timeout, Duration::from_secs(15));
        assert_eq!(tree.health_checks.initial_delay, Duration::from_secs(15));
        assert_eq!(tree.edge_api.session_timeout, Duration::from_secs(30 * 60));
        assert_eq!(tree.edge_api.activity_update_interval, Duration::from_secs(90));
        assert_eq!(tree.edge_api.activity_update_batch_size, 250);
        assert_eq!(tree.enrollment.identity_duration, Duration::from_secs(180 * 60));
        assert_eq!(tree.enrollment.router_duration, Duration::from_secs(180 * 60));
    }

    #[test]
    fn web_binding() {
        let tree = build(&[]);
        let web = &tree.web[0];

        assert_eq!(tree.web.len(), 1);
        assert_eq!(web.name, "client-management");
        assert_eq!(web.bind_points[0].interface, HostPort::new("0.0.0.0", 1280));
        assert_eq!(web.bind_points[0].address, HostPort::new(HOSTNAME, 1280));
        assert_eq!(web.identity, tree.identity);
        assert_eq!(web.options.min_tls_version, "TLS1.2");
        assert_eq!(web.options.max_tls_version, "TLS1.3");
        assert_eq!(web.apis, ["edge-management", "edge-client", "fabric"]);
        assert_eq!(tree.edge_api.address, web.bind_points[0].address);
    }
}

mod overrides {
    use super::*;

    #[test]
    fn custom_cert_path() {
        let tree = build(&[("ZITI_PKI_CTRL_CERT", "/var/test/custom/path")]);

        assert_eq!(tree.identity.cert, "/var/test/custom/path");
        assert_eq!(tree.web[0].identity.cert, "/var/test/custom/path");
    }

    #[test]
    fn blank_cert_env_uses_default() {
        let tree = build(&[("ZITI_PKI_CTRL_CERT", ""), ("ZITI_CTRL_WEB_ADVERTISED_ADDRESS", "")]);

        assert_eq!(tree.identity.cert, "/opt/ziti/ctrl-host.cert");
        assert_eq!(tree.web[0].bind_points[0].address.host, HOSTNAME);
    }

    #[test]
    fn web_advertised_address_flows_to_edge_api() {
        let tree = build(&[("ZITI_CTRL_WEB_ADVERTISED_ADDRESS", "123.456.7.8")]);

        assert_eq!(tree.web[0].bind_points[0].address.host, "123.456.7.8");
        assert_eq!(tree.edge_api.address.host, "123.456.7.8");
    }

    #[test]
    fn ctrl_advertised_port_follows_listener_port() {
        let tree = build(&[("ZITI_CTRL_LISTENER_PORT", "7000")]);

        assert_eq!(tree.ctrl.address.port, 7000);
        assert_eq!(tree.ctrl_advertised.port, 7000);
    }

    #[test]
    fn enrollment_flags_beat_env() {
        let flags = FlagOverrides::new()
            .with_text(FieldId::EdgeRouterEnrollmentDuration, "30m")
            .with_text(FieldId::EdgeIdentityEnrollmentDuration, "1h");
        let tree = build_with(
            &flags,
            &[
                ("ZITI_EDGE_ROUTER_ENROLLMENT_DURATION", "5"),
                ("ZITI_EDGE_IDENTITY_ENROLLMENT_DURATION", "5"),
            ],
        )
        .unwrap();

        assert_eq!(tree.enrollment.router_duration, Duration::from_secs(30 * 60));
        assert_eq!(tree.enrollment.identity_duration, Duration::from_secs(60 * 60));
    }

    #[test]
    fn enrollment_env_bare_numbers_are_minutes() {
        let tree = build(&[
            ("ZITI_EDGE_ROUTER_ENROLLMENT_DURATION", "120"),
            ("ZITI_EDGE_IDENTITY_ENROLLMENT_DURATION", "60"),
        ]);

        assert_eq!(tree.enrollment.router_duration, Duration::from_secs(120 * 60));
        assert_eq!(tree.enrollment.identity_duration, Duration::from_secs(60 * 60));
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = build_with(&FlagOverrides::new(), &[("ZITI_CTRL_MGMT_PORT", "abc")]).unwrap_err();

        assert_eq!(err.field(), Some(FieldId::MgmtListenerPort));
    }
}

mod web_listener {
    use super::*;

    fn interface(pairs: &[(&str, &str)]) -> HostPort {
        build(pairs).web[0].bind_points[0].interface.clone()
    }

    #[test]
    fn interface_port_back_fills_from_advertised_port() {
        assert_eq!(
            interface(&[("ZITI_CTRL_WEB_ADVERTISED_PORT", "1234")]),
            HostPort::new("0.0.0.0", 1234)
        );
    }

    #[test]
    fn combined_value_beats_advertised_port() {
        assert_eq!(
            interface(&[
                ("ZITI_CTRL_WEB_ADVERTISED_PORT", "1234"),
                ("ZITI_CTRL_EDGE_LISTENER_HOST_PORT", "0.0.0.0:4321"),
            ]),
            HostPort::new("0.0.0.0", 4321)
        );
    }

    #[test]
    fn explicit_parts_beat_combined_value() {
        assert_eq!(
            interface(&[
                ("ZITI_CTRL_EDGE_LISTENER_HOST_PORT", "10.0.0.1:4321"),
                ("ZITI_CTRL_WEB_INTERFACE_PORT", "9999"),
            ]),
            HostPort::new("10.0.0.1", 9999)
        );
        assert_eq!(
            interface(&[
                ("ZITI_CTRL_EDGE_LISTENER_HOST_PORT", "10.0.0.1:4321"),
                ("ZITI_CTRL_WEB_INTERFACE_ADDRESS", "192.168.1.1"),
            ]),
            HostPort::new("192.168.1.1", 4321)
        );
    }

    #[test]
    fn combined_host_only() {
        assert_eq!(
            interface(&[("ZITI_CTRL_EDGE_LISTENER_HOST_PORT", "10.0.0.1")]),
            HostPort::new("10.0.0.1", 1280)
        );
    }

    #[test]
    fn combined_port_only() {
        assert_eq!(
            interface(&[("ZITI_CTRL_EDGE_LISTENER_HOST_PORT", ":8443")]),
            HostPort::new("0.0.0.0", 8443)
        );
    }

    #[test]
    fn malformed_combined_value() {
        let err = build_with(
            &FlagOverrides::new(),
            &[("ZITI_CTRL_EDGE_LISTENER_HOST_PORT", "host:notaport")],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidAddress {
                field: FieldId::WebListenerHostPort,
                ..
            }
        ));
    }
}

mod required {
    use super::*;

    #[test]
    fn no_empty_leaves() {
        let tree = build(&[]);
        let texts = [
            &tree.home,
            &tree.db,
            &tree.identity.cert,
            &tree.identity.server_cert,
            &tree.identity.key,
            &tree.identity.ca,
            &tree.ctrl.address.host,
            &tree.mgmt.address.host,
            &tree.edge_api.address.host,
            &tree.enrollment.signing_cert,
            &tree.enrollment.signing_key,
            &tree.web[0].options.min_tls_version,
            &tree.web[0].options.max_tls_version,
        ];

        for text in texts {
            assert!(!text.is_empty());
        }
        assert!(!tree.enrollment.identity_duration.is_zero());
        assert!(!tree.enrollment.router_duration.is_zero());
    }

    #[test]
    fn zero_enrollment_fails_whole_build() {
        let flags = FlagOverrides::new().with_text(FieldId::EdgeIdentityEnrollmentDuration, "0m");

        let err = build_with(&flags, &[]).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::MissingRequired {
                field: FieldId::EdgeIdentityEnrollmentDuration,
                ..
            }
        ));
    }

    #[test]
    fn zero_batch_size_fails() {
        // No env var for the batch size
        let flags = FlagOverrides::new().with_text(FieldId::EdgeApiActivityUpdateBatchSize, "0");

        let err = build_with(&flags, &[]).unwrap_err();

        assert_eq!(err.field(), Some(FieldId::EdgeApiActivityUpdateBatchSize));
    }
}
