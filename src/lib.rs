//! Universe - one-time generative universes
//!
//! A seed string deterministically unfolds into a universe's DNA (palette,
//! geometry, physics, post-processing, audio). Sessions hand each visitor one
//! seed and burn it when they leave, so no universe is ever shown twice.

pub mod config;
pub mod dna;
pub mod fragments;
pub mod seed;
pub mod session;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::{BurnPolicy, ConfigError, EngineConfig};
pub use dna::{generate, UniverseDna};
pub use fragments::{Fragment, FragmentLayout};
pub use seed::{Seed, SeededRng};
pub use session::{
    BurnRegistry, ClientId, SessionError, SessionManager, SessionResponse, SessionStore,
};
