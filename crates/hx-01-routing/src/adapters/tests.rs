//! Tests for config and time adapters

use super::*;
use crate::domain::{ConfigError, NsSelectorKind, RoutingConfig, RtSelectorKind};
use crate::ports::{ConfigProvider, TimeSource};

#[test]
fn test_static_provider_defaults() {
    let provider = StaticConfigProvider::new();
    assert_eq!(provider.routing_config(), RoutingConfig::default());
}

#[test]
fn test_static_provider_with_config() {
    let provider = StaticConfigProvider::new().with_config(RoutingConfig::for_testing());
    assert_eq!(provider.routing_config(), RoutingConfig::for_testing());
}

#[test]
fn test_system_time_source_is_monotonic_enough() {
    let source = SystemTimeSource::new();
    let first = source.now();
    let second = source.now();
    assert!(second >= first);
    // Later than 2020-01-01 in milliseconds.
    assert!(first.as_millis() > 1_577_836_800_000);
}

#[cfg(feature = "toml-config")]
mod toml_provider {
    use super::*;
    use hx_identifier::Metric;

    #[test]
    fn test_toml_empty_file_gives_defaults() {
        let provider = TomlConfigProvider::parse("").unwrap();
        assert_eq!(provider.routing_config(), RoutingConfig::default());
    }

    #[test]
    fn test_toml_overrides_sections() {
        let content = r#"
            [routing]
            dimensions = 2
            digits_count = 8
            ns_size = 6
            metric = "chebyshev"
            use_secure_routing = true
            recently_processed_retention_ms = 250

            [selectors]
            ns = "balanced-orthants"
            rt = "distance"

            [liveness]
            threshold = 0.1

            [secure]
            seed = 9
        "#;
        let config = TomlConfigProvider::parse(content).unwrap().routing_config();

        assert_eq!(config.dimensions, 2);
        assert_eq!(config.digits_count, 8);
        assert_eq!(config.ns_size, 6);
        assert_eq!(config.metric, Metric::Chebyshev);
        assert!(config.use_secure_routing);
        assert_eq!(config.recently_processed_retention_ms, 250);
        assert_eq!(config.ns_selector, NsSelectorKind::BalancedOrthants);
        assert_eq!(config.rt_selector, RtSelectorKind::Distance);
        assert_eq!(config.liveness.threshold, 0.1);
        assert_eq!(config.liveness.initial, 0.5);
        assert_eq!(config.secure.seed, Some(9));
        assert_eq!(config.secure.mask_refresh_interval, 16);
        assert_eq!(config.routing_table_slot_size, 2);
    }

    #[test]
    fn test_toml_rejects_unknown_metric() {
        let err = TomlConfigProvider::parse("[routing]\nmetric = \"taxicab\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_rejects_unknown_selector() {
        let err = TomlConfigProvider::parse("[selectors]\nrt = \"orthants\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_rejects_invalid_config() {
        let err = TomlConfigProvider::parse("[routing]\nns_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroCapacity { .. }));
    }

    #[test]
    fn test_toml_rejects_malformed_input() {
        let err = TomlConfigProvider::parse("[routing\ndimensions = 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_load_missing_file() {
        let err = TomlConfigProvider::load("/nonexistent/hx-routing.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
