//! Seed - the opaque determinism key of one universe
//!
//! Server-minted seeds come from the OS random source and are plain hex.
//! Locally synthesized fallback seeds carry a `local-` prefix so the two seed
//! spaces never mix.

mod rng;

pub use rng::{fold_seed, SeededRng};

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Random bytes behind a minted seed
const SEED_BYTES: usize = 16;
/// Marker prefix of client-synthesized seeds
const LOCAL_PREFIX: &str = "local-";

/// An issued seed. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(String);

impl Seed {
    /// Mint a fresh seed from the OS random source (16 bytes, hex encoded).
    pub fn mint() -> Self {
        let mut bytes = [0u8; SEED_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Synthesize an ephemeral seed for the degraded, transport-less path.
    ///
    /// These never enter the session state machine.
    pub fn local() -> Self {
        Self(format!("{}{}", LOCAL_PREFIX, Uuid::new_v4().simple()))
    }

    /// Whether this seed was synthesized locally rather than issued
    pub fn is_local(&self) -> bool {
        self.0.starts_with(LOCAL_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Open the draw stream for this seed
    pub fn rng(&self) -> SeededRng {
        SeededRng::new(&self.0)
    }
}

impl From<&str> for Seed {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Seed {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Seed {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
