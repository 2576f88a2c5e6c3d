use crate::domain::RoutingConfig;
use crate::ports::ConfigProvider;

// ============================================================================
// StaticConfigProvider - In-memory config for testing/development
// ============================================================================

/// Static configuration provider.
///
/// Useful for testing and embedding. For deployments, use `TomlConfigProvider`.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    config: RoutingConfig,
}

impl StaticConfigProvider {
    /// Create with the default routing config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with the specified routing config.
    #[must_use]
    pub fn with_config(mut self, config: RoutingConfig) -> Self {
        self.config = config;
        self
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn routing_config(&self) -> RoutingConfig {
        self.config.clone()
    }
}

// ============================================================================
// TomlConfigProvider - Config file loading (requires "toml-config" feature)
// ============================================================================

#[cfg(feature = "toml-config")]
mod toml_config {
    use super::*;
    use crate::domain::{
        ConfigError, EvennessConfig, LivenessConfig, NsSelectorKind, RtSelectorKind, SecureConfig,
    };
    use hx_identifier::Metric;
    use serde::Deserialize;
    use std::fs;
    use std::path::Path;

    /// Configuration file structure.
    #[derive(Debug, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    struct ConfigFile {
        #[serde(default)]
        routing: RoutingSection,
        #[serde(default)]
        selectors: SelectorsSection,
        #[serde(default)]
        liveness: LivenessSection,
        #[serde(default)]
        evenness: EvennessSection,
        #[serde(default)]
        secure: SecureSection,
    }

    #[derive(Debug, Deserialize, Default)]
    struct RoutingSection {
        dimensions: Option<usize>,
        digits_count: Option<usize>,
        ns_size: Option<usize>,
        routing_table_slot_size: Option<usize>,
        use_ns: Option<bool>,
        use_rt1: Option<bool>,
        use_rt2: Option<bool>,
        use_secure_routing: Option<bool>,
        metric: Option<String>,
        exclude_rt2_scope_from_rt1: Option<bool>,
        update_network_address_when_different: Option<bool>,
        recently_processed_retention_ms: Option<u64>,
        recently_processed_capacity: Option<usize>,
    }

    #[derive(Debug, Deserialize, Default)]
    struct SelectorsSection {
        ns: Option<String>,
        rt: Option<String>,
    }

    #[derive(Debug, Deserialize, Default)]
    struct LivenessSection {
        initial: Option<f64>,
        max: Option<f64>,
        threshold: Option<f64>,
        boost: Option<f64>,
        decay: Option<f64>,
        cache_size: Option<usize>,
    }

    #[derive(Debug, Deserialize, Default)]
    struct EvennessSection {
        w1: Option<f64>,
        k1: Option<f64>,
        w2: Option<f64>,
        k2: Option<f64>,
    }

    #[derive(Debug, Deserialize, Default)]
    struct SecureSection {
        mask_refresh_interval: Option<u64>,
        seed: Option<u64>,
    }

    /// TOML-based configuration provider.
    ///
    /// Every key is optional; missing keys take the `RoutingConfig` default.
    /// The parsed config is validated before it is accepted.
    ///
    /// # Config File Format
    ///
    /// ```toml
    /// [routing]
    /// dimensions = 4
    /// digits_count = 32
    /// ns_size = 16
    /// routing_table_slot_size = 2
    /// use_secure_routing = false
    /// metric = "manhattan"
    /// exclude_rt2_scope_from_rt1 = false
    /// update_network_address_when_different = true
    /// recently_processed_retention_ms = 0
    ///
    /// [selectors]
    /// ns = "balanced-orthants"
    /// rt = "simple"
    ///
    /// [liveness]
    /// initial = 0.5
    /// threshold = 0.2
    ///
    /// [evenness]
    /// w1 = -1.0
    /// w2 = 1.0
    ///
    /// [secure]
    /// mask_refresh_interval = 16
    /// ```
    #[derive(Debug, Clone)]
    pub struct TomlConfigProvider {
        config: RoutingConfig,
    }

    impl TomlConfigProvider {
        /// Load configuration from a TOML file.
        ///
        /// # Errors
        ///
        /// Returns error if the file cannot be read, parsed or validated.
        pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
            let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
                path: path.as_ref().display().to_string(),
                error: e.to_string(),
            })?;

            Self::parse(&content)
        }

        /// Parse configuration from a TOML string.
        pub fn parse(content: &str) -> Result<Self, ConfigError> {
            let file: ConfigFile =
                toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
            let defaults = RoutingConfig::default();

            let rc = file.routing;
            let metric = match rc.metric {
                Some(name) => name.parse::<Metric>().map_err(ConfigError::Parse)?,
                None => defaults.metric,
            };
            let ns_selector = match file.selectors.ns {
                Some(name) => name.parse::<NsSelectorKind>()?,
                None => defaults.ns_selector,
            };
            let rt_selector = match file.selectors.rt {
                Some(name) => name.parse::<RtSelectorKind>()?,
                None => defaults.rt_selector,
            };

            let lc = file.liveness;
            let ld = LivenessConfig::default();
            let liveness = LivenessConfig {
                initial: lc.initial.unwrap_or(ld.initial),
                max: lc.max.unwrap_or(ld.max),
                threshold: lc.threshold.unwrap_or(ld.threshold),
                boost: lc.boost.unwrap_or(ld.boost),
                decay: lc.decay.unwrap_or(ld.decay),
                cache_size: lc.cache_size.unwrap_or(ld.cache_size),
            };

            let ec = file.evenness;
            let ed = EvennessConfig::default();
            let evenness = EvennessConfig {
                w1: ec.w1.unwrap_or(ed.w1),
                k1: ec.k1.unwrap_or(ed.k1),
                w2: ec.w2.unwrap_or(ed.w2),
                k2: ec.k2.unwrap_or(ed.k2),
            };

            let sc = file.secure;
            let secure = SecureConfig {
                mask_refresh_interval: sc
                    .mask_refresh_interval
                    .unwrap_or(defaults.secure.mask_refresh_interval),
                seed: sc.seed,
            };

            let config = RoutingConfig {
                dimensions: rc.dimensions.unwrap_or(defaults.dimensions),
                digits_count: rc.digits_count.unwrap_or(defaults.digits_count),
                ns_size: rc.ns_size.unwrap_or(defaults.ns_size),
                routing_table_slot_size: rc
                    .routing_table_slot_size
                    .unwrap_or(defaults.routing_table_slot_size),
                use_ns: rc.use_ns.unwrap_or(defaults.use_ns),
                use_rt1: rc.use_rt1.unwrap_or(defaults.use_rt1),
                use_rt2: rc.use_rt2.unwrap_or(defaults.use_rt2),
                use_secure_routing: rc.use_secure_routing.unwrap_or(defaults.use_secure_routing),
                metric,
                exclude_rt2_scope_from_rt1: rc
                    .exclude_rt2_scope_from_rt1
                    .unwrap_or(defaults.exclude_rt2_scope_from_rt1),
                update_network_address_when_different: rc
                    .update_network_address_when_different
                    .unwrap_or(defaults.update_network_address_when_different),
                recently_processed_retention_ms: rc
                    .recently_processed_retention_ms
                    .unwrap_or(defaults.recently_processed_retention_ms),
                recently_processed_capacity: rc
                    .recently_processed_capacity
                    .unwrap_or(defaults.recently_processed_capacity),
                ns_selector,
                rt_selector,
                liveness,
                evenness,
                secure,
            };
            config.validate()?;

            Ok(Self { config })
        }

        /// The parsed configuration.
        pub fn config(&self) -> &RoutingConfig {
            &self.config
        }
    }

    impl ConfigProvider for TomlConfigProvider {
        fn routing_config(&self) -> RoutingConfig {
            self.config.clone()
        }
    }
}

#[cfg(feature = "toml-config")]
pub use toml_config::TomlConfigProvider;
