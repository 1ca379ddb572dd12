//! Tests for CLI argument parsing.

use super::cli::{Cli, Command};
use super::field::FieldId;
use super::source::FlagValue;

mod parsing {
    use super::*;

    #[test]
    fn controller_defaults_to_stdout() {
        let cli = Cli::parse_from_iter(["ziti-config-gen", "controller"]);

        assert!(matches!(cli.command, Command::Controller(_)));
        assert_eq!(cli.command.output(), "stdout");
        assert!(!cli.verbose);
    }

    #[test]
    fn controller_enrollment_flags() {
        let cli = Cli::parse_from_iter([
            "ziti-config-gen",
            "controller",
            "--routerEnrollmentDuration",
            "30m",
            "--identityEnrollmentDuration",
            "1h",
        ]);

        let Command::Controller(args) = &cli.command else {
            panic!("expected controller command");
        };
        assert_eq!(args.router_enrollment_duration.as_deref(), Some("30m"));
        assert_eq!(args.identity_enrollment_duration.as_deref(), Some("1h"));
    }

    #[test]
    fn output_short_and_long() {
        let short = Cli::parse_from_iter(["ziti-config-gen", "controller", "-o", "ctrl.yaml"]);
        let long = Cli::parse_from_iter(["ziti-config-gen", "router", "--output", "edge.yaml"]);

        assert_eq!(short.command.output(), "ctrl.yaml");
        assert_eq!(long.command.output(), "edge.yaml");
    }

    #[test]
    fn router_flags() {
        let cli = Cli::parse_from_iter([
            "ziti-config-gen",
            "router",
            "--routerName",
            "blue",
            "--fabric",
        ]);

        let Command::Router(args) = &cli.command else {
            panic!("expected router command");
        };
        assert_eq!(args.router_name.as_deref(), Some("blue"));
        assert!(args.fabric);
    }

    #[test]
    fn environment_alias() {
        let full = Cli::parse_from_iter(["ziti-config-gen", "environment"]);
        let alias = Cli::parse_from_iter(["ziti-config-gen", "env", "-o", "STDOUT"]);

        assert!(matches!(full.command, Command::Environment(_)));
        assert!(matches!(alias.command, Command::Environment(_)));
        assert_eq!(alias.command.output(), "STDOUT");
    }

    #[test]
    fn verbose_is_global() {
        let before = Cli::parse_from_iter(["ziti-config-gen", "-v", "controller"]);
        let after = Cli::parse_from_iter(["ziti-config-gen", "router", "--verbose"]);

        assert!(before.verbose);
        assert!(after.verbose);
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from_iter(["ziti-config-gen"]).is_err());
    }

    #[test]
    fn router_flags_rejected_on_controller() {
        assert!(Cli::try_parse_from_iter(["ziti-config-gen", "controller", "--fabric"]).is_err());
    }
}

mod overrides {
    use super::*;

    #[test]
    fn unset_flags_are_absent() {
        let cli = Cli::parse_from_iter(["ziti-config-gen", "controller"]);

        assert!(cli.command.overrides().is_empty());
    }

    #[test]
    fn controller_flags_map_to_fields() {
        let cli = Cli::parse_from_iter([
            "ziti-config-gen",
            "controller",
            "--identityEnrollmentDuration",
            "1h",
        ]);

        let flags = cli.command.overrides();

        assert_eq!(flags.len(), 1);
        assert_eq!(
            flags.get(FieldId::EdgeIdentityEnrollmentDuration),
            Some(&FlagValue::Text("1h".to_string()))
        );
        assert_eq!(flags.get(FieldId::EdgeRouterEnrollmentDuration), None);
    }

    #[test]
    fn explicit_empty_flag_is_kept() {
        let cli = Cli::parse_from_iter(["ziti-config-gen", "router", "--routerName", ""]);

        assert_eq!(
            cli.command.overrides().get(FieldId::RouterName),
            Some(&FlagValue::Text(String::new()))
        );
    }

    #[test]
    fn fabric_switch_only_when_given() {
        let with = Cli::parse_from_iter(["ziti-config-gen", "router", "--fabric"]);
        let without = Cli::parse_from_iter(["ziti-config-gen", "router"]);

        assert_eq!(
            with.command.overrides().get(FieldId::RouterFabricOnly),
            Some(&FlagValue::Switch(true))
        );
        assert_eq!(without.command.overrides().get(FieldId::RouterFabricOnly), None);
    }

    #[test]
    fn flag_names_match_catalog() {
        use clap::CommandFactory;

        let command = Cli::command();
        let flags: Vec<String> = command
            .get_subcommands()
            .flat_map(clap::Command::get_arguments)
            .filter_map(|arg| arg.get_long().map(str::to_string))
            .collect();

        for field in FieldId::ALL {
            if let Some(flag) = field.flag_name() {
                assert!(flags.iter().any(|f| f == flag), "--{flag} is not a CLI flag");
            }
        }
    }
}
