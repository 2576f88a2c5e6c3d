//! Routing table statistics.

/// Occupancy of one sub-table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubTableStats {
    /// Stored entries
    pub entries: usize,
    /// Slots holding at least one entry
    pub occupied_slots: usize,
}

/// Occupancy of all five sub-tables, taken under one whole-table read lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoutingTableStats {
    /// Neighborhood set
    pub ns: SubTableStats,
    /// Primary routing table
    pub rt1: SubTableStats,
    /// Secondary routing table
    pub rt2: SubTableStats,
    /// Secure primary routing table
    pub sec_rt1: SubTableStats,
    /// Secure secondary routing table
    pub sec_rt2: SubTableStats,
}

impl RoutingTableStats {
    /// Entries across all sub-tables (a peer may be counted more than once).
    pub fn total_entries(&self) -> usize {
        [self.ns, self.rt1, self.rt2, self.sec_rt1, self.sec_rt2]
            .iter()
            .map(|s| s.entries)
            .sum()
    }
}
