//! Value objects for overlay routing: sub-table identities, selector choices
//! and the routing configuration.

use std::fmt;
use std::str::FromStr;

use hx_identifier::{Metric, Shape, MAX_ORTHANT_DIMENSIONS};

use super::errors::ConfigError;

/// Widest digit the routing tables can index (`digit_as_int`).
pub const MAX_ROUTING_DIMENSIONS: usize = 63;

/// One of the five sub-tables, in lock order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SubTableKind {
    /// Neighborhood set.
    Ns,
    /// Primary routing table, `[level][digit value]`.
    Rt1,
    /// Secondary routing table, `[level][dimension]`.
    Rt2,
    /// Secure copy of RT1.
    SecRt1,
    /// Secure copy of RT2.
    SecRt2,
}

impl SubTableKind {
    /// All sub-tables in the fixed lock order.
    pub const ALL: [SubTableKind; 5] = [
        SubTableKind::Ns,
        SubTableKind::Rt1,
        SubTableKind::Rt2,
        SubTableKind::SecRt1,
        SubTableKind::SecRt2,
    ];

    /// Position in the lock order.
    pub fn lock_rank(self) -> usize {
        self as usize
    }

    /// True for SecRT1 and SecRT2.
    pub fn is_secure(self) -> bool {
        matches!(self, SubTableKind::SecRt1 | SubTableKind::SecRt2)
    }
}

impl fmt::Display for SubTableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubTableKind::Ns => "NS",
            SubTableKind::Rt1 => "RT1",
            SubTableKind::Rt2 => "RT2",
            SubTableKind::SecRt1 => "SecRT1",
            SubTableKind::SecRt2 => "SecRT2",
        };
        f.write_str(name)
    }
}

/// Admission policy for the neighborhood set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NsSelectorKind {
    /// First come, first served.
    Simple,
    /// Keep the closest peers.
    #[default]
    Distance,
    /// Keep the closest peers, balanced over orthants.
    BalancedOrthants,
    /// Keep the closest peers, balanced over the two semirings.
    BalancedRing,
    /// Optimize mean pairwise spread against mean distance to self.
    AvgDistEvenness,
    /// Prefer live peers.
    Liveness,
}

impl FromStr for NsSelectorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "simple" => Ok(Self::Simple),
            "distance" => Ok(Self::Distance),
            "balancedorthants" => Ok(Self::BalancedOrthants),
            "balancedring" => Ok(Self::BalancedRing),
            "avgdistevenness" => Ok(Self::AvgDistEvenness),
            "liveness" | "lns" => Ok(Self::Liveness),
            _ => Err(ConfigError::Parse(format!("unknown NS selector: {s}"))),
        }
    }
}

/// Admission policy for RT1 and RT2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RtSelectorKind {
    /// First come, first served.
    #[default]
    Simple,
    /// Keep the closest peers per slot.
    Distance,
    /// Prefer live peers.
    Liveness,
}

impl FromStr for RtSelectorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "distance" => Ok(Self::Distance),
            "liveness" | "lns" => Ok(Self::Liveness),
            _ => Err(ConfigError::Parse(format!("unknown RT selector: {s}"))),
        }
    }
}

/// Liveness score tunables, shared by the LNS selector and the keep-alive hooks.
///
/// Scores live in `[0, max]`. A received pong moves the score a `boost`
/// fraction of the way toward `max`; a missed pong multiplies it by `decay`.
#[derive(Debug, Clone, PartialEq)]
pub struct LivenessConfig {
    /// Score given to a peer never seen before (default: 0.5)
    pub initial: f64,
    /// Upper bound of the score (default: 1.0)
    pub max: f64,
    /// Members at or below this score may be replaced (default: 0.2)
    pub threshold: f64,
    /// Fraction of the gap to `max` recovered per pong (default: 0.5)
    pub boost: f64,
    /// Multiplier applied per missed pong (default: 0.5)
    pub decay: f64,
    /// Evicted peers whose score is remembered (default: 1024)
    pub cache_size: usize,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            initial: 0.5,
            max: 1.0,
            threshold: 0.2,
            boost: 0.5,
            decay: 0.5,
            cache_size: 1024,
        }
    }
}

impl LivenessConfig {
    /// Score after a received pong.
    pub fn boosted(&self, score: f64) -> f64 {
        (score + (self.max - score) * self.boost).clamp(0.0, self.max)
    }

    /// Score after a missed pong.
    pub fn decayed(&self, score: f64) -> f64 {
        (score * self.decay).clamp(0.0, self.max)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let unit = |name: &'static str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(ConfigError::InvalidTunable {
                    name,
                    reason: format!("{v} is outside [0, 1]"),
                })
            }
        };
        if !(self.max.is_finite() && self.max > 0.0) {
            return Err(ConfigError::InvalidTunable {
                name: "liveness.max",
                reason: format!("{} is not a positive number", self.max),
            });
        }
        for (name, v) in [
            ("liveness.initial", self.initial),
            ("liveness.threshold", self.threshold),
        ] {
            if !(0.0..=self.max).contains(&v) {
                return Err(ConfigError::InvalidTunable {
                    name,
                    reason: format!("{v} is outside [0, {}]", self.max),
                });
            }
        }
        unit("liveness.boost", self.boost)?;
        unit("liveness.decay", self.decay)?;
        if self.cache_size == 0 {
            return Err(ConfigError::ZeroCapacity {
                field: "liveness.cache_size",
            });
        }
        Ok(())
    }
}

/// Weights of the evenness objective
/// `w1 · meanPairwise^k1 + w2 · meanToSelf^k2`, which the selector minimizes.
///
/// The default rewards spread between members (`w1 < 0`) and penalizes
/// distance from the local node (`w2 > 0`).
#[derive(Debug, Clone, PartialEq)]
pub struct EvennessConfig {
    /// Weight of the mean pairwise member distance (default: -1.0)
    pub w1: f64,
    /// Exponent of the mean pairwise member distance (default: 1.0)
    pub k1: f64,
    /// Weight of the mean distance to self (default: 1.0)
    pub w2: f64,
    /// Exponent of the mean distance to self (default: 1.0)
    pub k2: f64,
}

impl Default for EvennessConfig {
    fn default() -> Self {
        Self {
            w1: -1.0,
            k1: 1.0,
            w2: 1.0,
            k2: 1.0,
        }
    }
}

impl EvennessConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, v) in [("evenness.w1", self.w1), ("evenness.w2", self.w2)] {
            if !v.is_finite() {
                return Err(ConfigError::InvalidTunable {
                    name,
                    reason: format!("{v} is not finite"),
                });
            }
        }
        for (name, v) in [("evenness.k1", self.k1), ("evenness.k2", self.k2)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(ConfigError::InvalidTunable {
                    name,
                    reason: format!("{v} is not a positive exponent"),
                });
            }
        }
        Ok(())
    }
}

/// Secure selector tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecureConfig {
    /// Admissions between mask refreshes (default: 16)
    pub mask_refresh_interval: u64,
    /// Fixed seed for the mask generator; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SecureConfig {
    fn default() -> Self {
        Self {
            mask_refresh_interval: 16,
            seed: None,
        }
    }
}

/// Configuration consumed by the routing table and placement engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingConfig {
    /// Bits per digit (default: 4)
    pub dimensions: usize,
    /// Digits per identifier (default: 32)
    pub digits_count: usize,
    /// Neighborhood set capacity (default: 16)
    pub ns_size: usize,
    /// Capacity of every RT1/RT2 slot (default: 2)
    pub routing_table_slot_size: usize,
    /// Fill the neighborhood set (default: true)
    pub use_ns: bool,
    /// Fill RT1 (default: true)
    pub use_rt1: bool,
    /// Fill RT2 (default: true)
    pub use_rt2: bool,
    /// Also fill SecRT1/SecRT2 with the secure selector (default: false)
    pub use_secure_routing: bool,
    /// Distance metric (default: Manhattan)
    pub metric: Metric,
    /// Keep peers covered by RT2 at a lower level out of RT1 (default: false)
    pub exclude_rt2_scope_from_rt1: bool,
    /// Rewrite stored addresses when a known peer moves (default: true)
    pub update_network_address_when_different: bool,
    /// Skip peers placed within this many milliseconds; 0 disables (default: 0)
    pub recently_processed_retention_ms: u64,
    /// Bound of the recently-processed cache (default: 4096)
    pub recently_processed_capacity: usize,
    /// NS admission policy (default: Distance)
    pub ns_selector: NsSelectorKind,
    /// RT1/RT2 admission policy (default: Simple)
    pub rt_selector: RtSelectorKind,
    /// Liveness tunables
    pub liveness: LivenessConfig,
    /// Evenness objective tunables
    pub evenness: EvennessConfig,
    /// Secure selector tunables
    pub secure: SecureConfig,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            dimensions: 4,
            digits_count: 32,
            ns_size: 16,
            routing_table_slot_size: 2,
            use_ns: true,
            use_rt1: true,
            use_rt2: true,
            use_secure_routing: false,
            metric: Metric::Manhattan,
            exclude_rt2_scope_from_rt1: false,
            update_network_address_when_different: true,
            recently_processed_retention_ms: 0,
            recently_processed_capacity: 4096,
            ns_selector: NsSelectorKind::Distance,
            rt_selector: RtSelectorKind::Simple,
            liveness: LivenessConfig::default(),
            evenness: EvennessConfig::default(),
            secure: SecureConfig::default(),
        }
    }
}

impl RoutingConfig {
    /// Create a config suitable for testing (small space, small tables)
    pub fn for_testing() -> Self {
        Self {
            dimensions: 2,
            digits_count: 4,
            ns_size: 4,
            routing_table_slot_size: 2,
            recently_processed_capacity: 64,
            secure: SecureConfig {
                mask_refresh_interval: 4,
                seed: Some(7),
            },
            ..Self::default()
        }
    }

    /// Identifier shape every peer must have.
    pub fn shape(&self) -> Result<Shape, ConfigError> {
        Ok(Shape::new(self.dimensions, self.digits_count)?)
    }

    /// True when any of RT1, RT2 or the secure tables are filled.
    pub fn uses_routing_tables(&self) -> bool {
        self.use_rt1 || self.use_rt2 || self.use_secure_routing
    }

    /// Check every field; selectors rely on this having passed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shape()?;
        if self.ns_size == 0 {
            return Err(ConfigError::ZeroCapacity { field: "ns_size" });
        }
        if self.routing_table_slot_size == 0 {
            return Err(ConfigError::ZeroCapacity {
                field: "routing_table_slot_size",
            });
        }
        if self.recently_processed_retention_ms > 0 && self.recently_processed_capacity == 0 {
            return Err(ConfigError::ZeroCapacity {
                field: "recently_processed_capacity",
            });
        }
        if self.uses_routing_tables() && self.dimensions > MAX_ROUTING_DIMENSIONS {
            return Err(ConfigError::TooManyDimensions {
                feature: "RT1/RT2 placement",
                dimensions: self.dimensions,
                max: MAX_ROUTING_DIMENSIONS,
            });
        }
        if self.use_ns
            && self.ns_selector == NsSelectorKind::BalancedOrthants
            && self.dimensions > MAX_ORTHANT_DIMENSIONS
        {
            return Err(ConfigError::TooManyDimensions {
                feature: "balanced orthant selector",
                dimensions: self.dimensions,
                max: MAX_ORTHANT_DIMENSIONS,
            });
        }
        if self.use_secure_routing && self.secure.mask_refresh_interval == 0 {
            return Err(ConfigError::ZeroCapacity {
                field: "secure.mask_refresh_interval",
            });
        }
        self.liveness.validate()?;
        self.evenness.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_config_defaults() {
        let config = RoutingConfig::default();
        assert_eq!(config.dimensions, 4);
        assert_eq!(config.digits_count, 32);
        assert_eq!(config.ns_size, 16);
        assert_eq!(config.routing_table_slot_size, 2);
        assert_eq!(config.metric, Metric::Manhattan);
        assert!(!config.use_secure_routing);
        assert!(config.validate().is_ok());
        assert!(RoutingConfig::for_testing().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_capacities() {
        let config = RoutingConfig {
            ns_size: 0,
            ..RoutingConfig::for_testing()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroCapacity { field: "ns_size" })
        );

        let config = RoutingConfig {
            routing_table_slot_size: 0,
            ..RoutingConfig::for_testing()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_wide_digits_for_routing_tables() {
        let wide = RoutingConfig {
            dimensions: 64,
            digits_count: 2,
            ..RoutingConfig::for_testing()
        };
        assert!(matches!(
            wide.validate(),
            Err(ConfigError::TooManyDimensions { .. })
        ));

        let ns_only = RoutingConfig {
            use_rt1: false,
            use_rt2: false,
            ..wide
        };
        assert!(ns_only.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_shape_and_tunables() {
        let config = RoutingConfig {
            dimensions: 0,
            ..RoutingConfig::for_testing()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Shape(_))));

        let mut config = RoutingConfig::for_testing();
        config.liveness.decay = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTunable {
                name: "liveness.decay",
                ..
            })
        ));

        let mut config = RoutingConfig::for_testing();
        config.evenness.k2 = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_liveness_boost_and_decay() {
        let liveness = LivenessConfig::default();
        assert_eq!(liveness.boosted(0.5), 0.75);
        assert_eq!(liveness.decayed(0.5), 0.25);
        assert_eq!(liveness.boosted(1.0), 1.0);
        assert_eq!(liveness.decayed(0.0), 0.0);
    }

    #[test]
    fn test_selector_kinds_parse() {
        assert_eq!(
            "balanced_orthants".parse::<NsSelectorKind>().unwrap(),
            NsSelectorKind::BalancedOrthants
        );
        assert_eq!(
            "AvgDistEvenness".parse::<NsSelectorKind>().unwrap(),
            NsSelectorKind::AvgDistEvenness
        );
        assert_eq!(
            "lns".parse::<RtSelectorKind>().unwrap(),
            RtSelectorKind::Liveness
        );
        assert!("secure".parse::<RtSelectorKind>().is_err());
    }

    #[test]
    fn test_sub_table_kinds_are_in_lock_order() {
        let ranks: Vec<_> = SubTableKind::ALL.iter().map(|k| k.lock_rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
        assert!(SubTableKind::SecRt2.is_secure());
        assert!(!SubTableKind::Rt1.is_secure());
        assert_eq!(SubTableKind::SecRt1.to_string(), "SecRT1");
    }
}
