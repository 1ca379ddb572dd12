//! Tests for value coercion and duration formatting.

use std::time::Duration;

use super::field::FieldId;
use super::value::{
    ResolvedValue, coerce, format_millis, format_minutes, format_seconds, normalize_path,
    parse_bool, parse_duration, parse_port, whole_minutes,
};
use super::ConfigError;

mod durations {
    use super::*;

    #[test]
    fn bare_number_is_minutes() {
        assert_eq!(parse_duration("120").unwrap(), Duration::from_secs(120 * 60));
        assert_eq!(parse_duration("5").unwrap(), Duration::from_secs(5 * 60));
    }

    #[test]
    fn decimal_bare_number_is_minutes() {
        assert_eq!(parse_duration("1.5").unwrap(), Duration::from_secs(90));
    }

    #[test]
    fn unit_strings() {
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("30m").unwrap(), Duration::from_secs(1800));
        assert_eq!(parse_duration("45s").unwrap(), Duration::from_secs(45));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("250us").unwrap(), Duration::from_micros(250));
        assert_eq!(parse_duration("10ns").unwrap(), Duration::from_nanos(10));
    }

    #[test]
    fn compound_strings() {
        assert_eq!(
            parse_duration("1h30m").unwrap(),
            Duration::from_secs(90 * 60)
        );
        assert_eq!(
            parse_duration("2m30s").unwrap(),
            Duration::from_secs(150)
        );
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(90 * 60));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(parse_duration(" 30m ").unwrap(), Duration::from_secs(1800));
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "soon", "1x", "h", "1h30", "-5m", "-5", "1..5m", "inf"] {
            assert!(parse_duration(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(parse_duration("2562047h").is_ok());
        assert!(parse_duration("2562048h").is_err());
        assert!(parse_duration("18446744073709551615s").is_err());
    }

    #[test]
    fn out_of_range_names_field() {
        let err = coerce(FieldId::EdgeIdentityEnrollmentDuration, "18446744073709551615s")
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidDuration {
                field: FieldId::EdgeIdentityEnrollmentDuration,
                ..
            }
        ));
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn whole_minutes_saturates() {
        assert_eq!(whole_minutes(Duration::MAX), u64::MAX / 60);
    }

    #[test]
    fn formats_minutes() {
        assert_eq!(format_minutes(Duration::from_secs(3600)), "60m");
        assert_eq!(format_minutes(Duration::from_secs(1800)), "30m");
        assert_eq!(format_minutes(Duration::from_secs(120 * 60)), "120m");
    }

    #[test]
    fn formats_minutes_rounding() {
        assert_eq!(format_minutes(Duration::from_secs(89)), "1m");
        assert_eq!(format_minutes(Duration::from_secs(90)), "2m");
    }

    #[test]
    fn formats_seconds_and_millis() {
        assert_eq!(format_seconds(Duration::from_secs(30)), "30s");
        assert_eq!(format_millis(Duration::from_secs(5)), "5000ms");
    }

    #[test]
    fn one_hour_normalizes_to_sixty_minutes() {
        let value = coerce(FieldId::EdgeIdentityEnrollmentDuration, "1h").unwrap();

        assert_eq!(value, ResolvedValue::Duration(Duration::from_secs(60 * 60)));
        assert_eq!(value.to_string(), "60m");
    }
}

mod coercion {
    use super::*;

    #[test]
    fn text_is_verbatim() {
        assert_eq!(
            coerce(FieldId::CtrlListenerAddress, " 10.0.0.1").unwrap(),
            ResolvedValue::Text(" 10.0.0.1".to_string())
        );
    }

    #[test]
    fn path_backslashes_become_slashes() {
        assert_eq!(
            coerce(FieldId::CtrlIdentityCert, r"C:\ziti\pki\ctrl.cert").unwrap(),
            ResolvedValue::Text("C:/ziti/pki/ctrl.cert".to_string())
        );
    }

    #[test]
    fn path_tilde_expands_to_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let expected = format!("{}/pki/ctrl.cert", home.display()).replace('\\', "/");

        assert_eq!(normalize_path("~/pki/ctrl.cert"), expected);
    }

    #[test]
    fn tilde_inside_name_is_kept() {
        assert_eq!(normalize_path("~user/file"), "~user/file");
        assert_eq!(normalize_path("/var/a~b"), "/var/a~b");
    }

    #[test]
    fn port_range() {
        assert_eq!(parse_port("1280").unwrap(), 1280);
        assert!(parse_port("0").is_err());
        assert!(parse_port("65536").is_err());
        assert!(parse_port("http").is_err());
    }

    #[test]
    fn integer_rejects_negative() {
        let err = coerce(FieldId::EdgeApiActivityUpdateBatchSize, "-1").unwrap_err();

        assert!(matches!(err, ConfigError::InvalidInteger { .. }));
    }

    #[test]
    fn booleans() {
        for truthy in ["true", "TRUE", "1", "yes", "on"] {
            assert_eq!(parse_bool(truthy), Some(true), "{truthy}");
        }
        for falsy in ["false", "0", "no", "Off"] {
            assert_eq!(parse_bool(falsy), Some(false), "{falsy}");
        }
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn invalid_boolean_error() {
        let err = coerce(FieldId::RouterFabricOnly, "maybe").unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidBoolean {
                field: FieldId::RouterFabricOnly,
                ..
            }
        ));
    }

    #[test]
    fn accessors() {
        assert_eq!(ResolvedValue::Text("a".into()).as_text(), Some("a"));
        assert_eq!(ResolvedValue::Integer(3).as_integer(), Some(3));
        assert_eq!(ResolvedValue::Boolean(true).as_boolean(), Some(true));
        assert_eq!(
            ResolvedValue::Duration(Duration::from_secs(1)).as_duration(),
            Some(Duration::from_secs(1))
        );
        assert_eq!(ResolvedValue::Integer(3).as_text(), None);
    }
}
