//! Burn Registry - append-only record of consumed identifiers
//!
//! Holds client fingerprints and seeds alike. Nothing is ever removed; the
//! in-memory registry lives as long as the process.

use dashmap::DashSet;

/// Set of burned identifiers. Implementations must be safe to share across
/// request handlers.
pub trait BurnRegistry: Send + Sync {
    /// Mark an identifier burned. Returns `true` if it was not burned before;
    /// burning again is a no-op.
    fn record(&self, identifier: &str) -> bool;

    fn is_burned(&self, identifier: &str) -> bool;

    /// Number of burned identifiers
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime registry backed by a sharded concurrent set
#[derive(Debug, Default)]
pub struct MemoryBurnRegistry {
    burned: DashSet<String>,
}

impl MemoryBurnRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BurnRegistry for MemoryBurnRegistry {
    fn record(&self, identifier: &str) -> bool {
        self.burned.insert(identifier.to_string())
    }

    fn is_burned(&self, identifier: &str) -> bool {
        self.burned.contains(identifier)
    }

    fn len(&self) -> usize {
        self.burned.len()
    }
}
