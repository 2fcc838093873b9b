//! Sessions - one universe per visitor, burned on exit
//!
//! - `ClientId`: low-precision fingerprint sessions are keyed by
//! - `SessionStore`: identifier -> record, atomic per identifier
//! - `BurnRegistry`: append-only set of burned clients and seeds
//! - `SessionManager`: the UNSEEN -> ACTIVE -> BURNED state machine

mod fingerprint;
mod manager;
mod registry;
mod store;

pub use fingerprint::ClientId;
pub use manager::{
    BurnAck, SeedMinter, SessionError, SessionManager, SessionResponse, SessionState, SessionStats,
};
pub use registry::{BurnRegistry, MemoryBurnRegistry};
pub use store::{MemorySessionStore, SessionRecord, SessionStore};
