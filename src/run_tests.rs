//! Tests for the run module.

use std::collections::HashMap;

use super::*;
use ziti_config_gen::config::Cli;
use ziti_config_gen::host::FixedHost;

fn host() -> FixedHost {
    FixedHost::new("node1", "/home/ziti")
}

fn command(args: &[&str]) -> Command {
    let argv = std::iter::once("ziti-config-gen").chain(args.iter().copied());
    Cli::parse_from_iter(argv).command
}

mod request_mapping {
    use super::*;

    #[test]
    fn subcommands_map_to_requests() {
        assert_eq!(request_for(&command(&["controller"])), Request::Controller);
        assert_eq!(request_for(&command(&["router", "--fabric"])), Request::Router);
        assert_eq!(request_for(&command(&["env"])), Request::Environment);
    }
}

mod rendering {
    use super::*;

    #[test]
    fn router_name_flag_reaches_document() {
        let env: HashMap<String, String> = HashMap::new();

        let document = render(&command(&["router", "--routerName", "blue"]), &env, &host()).unwrap();

        assert!(document.contains("/home/ziti/blue.cert"));
    }

    #[test]
    fn flag_beats_environment() {
        let env = HashMap::from([(
            "ZITI_EDGE_ROUTER_ENROLLMENT_DURATION".to_string(),
            "5m".to_string(),
        )]);

        let document = render(
            &command(&["controller", "--routerEnrollmentDuration", "2h"]),
            &env,
            &host(),
        )
        .unwrap();

        assert!(document.contains("duration: 120m"));
        assert!(!document.contains("duration: 5m"));
    }
}

mod writing {
    use super::*;

    #[test]
    fn writes_to_requested_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ctrl.yaml");
        let env: HashMap<String, String> = HashMap::new();

        let destination = execute(
            &command(&["controller", "-o", path.to_str().unwrap()]),
            &env,
            &host(),
        )
        .unwrap();

        assert!(!destination.is_stdout());
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("v: 3"));
    }

    #[test]
    fn missing_directory_is_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("router.yaml");
        let env: HashMap<String, String> = HashMap::new();

        let err = execute(
            &command(&["router", "--output", path.to_str().unwrap()]),
            &env,
            &host(),
        )
        .unwrap_err();

        assert!(err.is_output_error());
        assert!(!path.exists());
    }

    #[test]
    fn render_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ctrl.yaml");
        let env = HashMap::from([("ZITI_CTRL_LISTENER_PORT".to_string(), "99999".to_string())]);

        let err = execute(
            &command(&["controller", "-o", path.to_str().unwrap()]),
            &env,
            &host(),
        )
        .unwrap_err();

        assert!(!err.is_output_error());
        assert!(!path.exists());
    }
}
