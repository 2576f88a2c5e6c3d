//! Core domain entities for overlay routing.

use std::fmt;
use std::net::SocketAddr;

use hx_identifier::Identifier;

/// A peer as seen by the placement engine: identity, address and the
/// identifier hash used as the routing-table map key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    id: Identifier,
    addr: SocketAddr,
    hash: u64,
}

impl NodeRecord {
    /// Build a record, computing the identifier hash once.
    pub fn new(id: Identifier, addr: SocketAddr) -> Self {
        let hash = id.calculate_hash();
        Self { id, addr, hash }
    }

    /// Peer identifier.
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// Peer network address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Identifier hash (map key; collisions are possible).
    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub(crate) fn set_addr(&mut self, addr: SocketAddr) {
        self.addr = addr;
    }

    #[cfg(test)]
    pub(crate) fn with_hash(id: Identifier, addr: SocketAddr, hash: u64) -> Self {
        Self { id, addr, hash }
    }
}

impl fmt::Display for NodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.addr)
    }
}

/// Milliseconds since the Unix epoch.
///
/// Values are clamped to `MAX_REASONABLE` so sorting and window arithmetic
/// cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Year 9999 in milliseconds.
    pub const MAX_REASONABLE: u64 = 253_402_300_799_000;

    /// Create a new timestamp, clamping to `MAX_REASONABLE`.
    pub const fn new(millis: u64) -> Self {
        if millis > Self::MAX_REASONABLE {
            Self(Self::MAX_REASONABLE)
        } else {
            Self(millis)
        }
    }

    /// Underlying milliseconds value.
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Add milliseconds (saturating at `MAX_REASONABLE`).
    pub fn add_millis(&self, millis: u64) -> Self {
        Self(self.0.saturating_add(millis).min(Self::MAX_REASONABLE))
    }

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn millis_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}
