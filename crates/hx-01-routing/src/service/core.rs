use crate::domain::{
    NodeRecord, PlacementEngine, PlacementStats, RoutingConfig, RoutingError, RoutingTable,
    Timestamp,
};
use crate::ports::{ConfigProvider, TimeSource};

/// Overlay routing service implementing the driving port.
///
/// # Example
///
/// ```rust,ignore
/// use hx_01_routing::service::RoutingService;
/// use hx_01_routing::ports::OverlayRoutingApi;
///
/// let local = NodeRecord::new(local_id, "10.0.0.1:7000".parse()?);
/// let service = RoutingService::new(local, RoutingConfig::default(), Box::new(SystemTimeSource))?;
///
/// service.notify(peer_id, peer_addr);
/// let stats = service.get_stats();
/// ```
pub struct RoutingService {
    /// The placement engine and its routing table (domain layer)
    pub(crate) engine: PlacementEngine,
    /// Time source stamping notifies
    pub(crate) time_source: Box<dyn TimeSource>,
}

impl RoutingService {
    /// Create a new routing service.
    ///
    /// # Arguments
    ///
    /// * `local` - Our own identity and address
    /// * `config` - Routing configuration
    /// * `time_source` - Provider for current time
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid or `local` does not have the
    /// configured identifier shape.
    pub fn new(
        local: NodeRecord,
        config: RoutingConfig,
        time_source: Box<dyn TimeSource>,
    ) -> Result<Self, RoutingError> {
        Ok(Self {
            engine: PlacementEngine::new(local, config)?,
            time_source,
        })
    }

    /// Create a service configured by `provider`.
    pub fn from_provider(
        local: NodeRecord,
        provider: &dyn ConfigProvider,
        time_source: Box<dyn TimeSource>,
    ) -> Result<Self, RoutingError> {
        Self::new(local, provider.routing_config(), time_source)
    }

    /// Get the current timestamp from the time source.
    pub(crate) fn now(&self) -> Timestamp {
        self.time_source.now()
    }

    /// The placement engine.
    pub fn engine(&self) -> &PlacementEngine {
        &self.engine
    }

    /// The routing table (for lock handles and metadata access).
    pub fn routing_table(&self) -> &RoutingTable {
        self.engine.table()
    }

    /// Placement counters.
    pub fn placement_stats(&self) -> PlacementStats {
        self.engine.stats()
    }
}
