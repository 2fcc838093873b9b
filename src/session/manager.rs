//! SessionManager - issues each universe once and burns it afterwards
//!
//! Per client identifier the lifecycle is UNSEEN -> ACTIVE -> BURNED. What a
//! burn retires is the configured `BurnPolicy`: the client itself, or only the
//! universe it was shown.

use super::fingerprint::ClientId;
use super::registry::{BurnRegistry, MemoryBurnRegistry};
use super::store::{MemorySessionStore, SessionRecord, SessionStore};
use crate::config::{BurnPolicy, EngineConfig};
use crate::seed::Seed;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Answer to an issue-session request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub burned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<Seed>,
    /// Milliseconds since the epoch on the wire
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub birth: Option<DateTime<Utc>>,
}

impl SessionResponse {
    pub fn burned() -> Self {
        Self { burned: true, seed: None, birth: None }
    }

    pub fn active(seed: Seed, birth: DateTime<Utc>) -> Self {
        Self { burned: false, seed: Some(seed), birth: Some(birth) }
    }
}

/// Acknowledgement of a burn signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnAck {
    pub burned: bool,
}

/// Where a client identifier stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unseen,
    Active(Seed),
    Burned,
}

/// Counters for logs and the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub policy: BurnPolicy,
    pub sessions: usize,
    pub live: usize,
    pub burned_identifiers: usize,
}

/// Source of fresh seeds
pub type SeedMinter = Arc<dyn Fn() -> Seed + Send + Sync>;

/// Session errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No unburned seed after {attempts} mint attempts")]
    SeedExhausted { attempts: u32 },
}

/// The session state machine over pluggable storage
pub struct SessionManager {
    config: EngineConfig,
    store: Arc<dyn SessionStore>,
    registry: Arc<dyn BurnRegistry>,
    minter: SeedMinter,
}

impl SessionManager {
    /// Manager over process-lifetime, in-memory storage
    pub fn new(config: EngineConfig) -> Self {
        Self::with_backends(
            config,
            Arc::new(MemorySessionStore::new()),
            Arc::new(MemoryBurnRegistry::new()),
        )
    }

    pub fn with_backends(
        config: EngineConfig,
        store: Arc<dyn SessionStore>,
        registry: Arc<dyn BurnRegistry>,
    ) -> Self {
        let minter: SeedMinter = Arc::new(Seed::mint);
        Self { config, store, registry, minter }
    }

    /// Replace the seed source (OS randomness by default)
    pub fn with_minter(mut self, minter: SeedMinter) -> Self {
        self.minter = minter;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn policy(&self) -> BurnPolicy {
        self.config.burn_policy
    }

    /// Derive the client identifier from request headers, honouring the
    /// fingerprint configuration
    pub fn client_id(&self, user_agent: &str, accept_language: &str) -> ClientId {
        if self.config.fingerprint_language {
            ClientId::from_headers(user_agent, accept_language)
        } else {
            ClientId::from_user_agent(user_agent)
        }
    }

    /// Issue (or re-serve) the session of a client.
    ///
    /// Idempotent while the session is active; concurrent first requests for
    /// the same client all receive the one seed that got stored. Fails only
    /// when no unburned seed could be minted.
    pub fn issue(&self, client: &ClientId) -> Result<SessionResponse, SessionError> {
        let id = client.as_str();
        if self.policy() == BurnPolicy::Client && self.registry.is_burned(id) {
            debug!("Client {} is burned", client);
            return Ok(SessionResponse::burned());
        }

        match self.store.get(id) {
            Some(record) => {
                if let Some(response) = Self::live_response(&record) {
                    debug!("Re-serving active session for {}", client);
                    return Ok(response);
                }
                if self.policy() == BurnPolicy::Client {
                    return Ok(SessionResponse::burned());
                }
            }
            None => {
                let record = self.store.set_if_absent(id, SessionRecord::active(self.mint()?));
                if let Some(response) = Self::live_response(&record) {
                    info!("Issued universe to {}", client);
                    return Ok(response);
                }
                if self.policy() == BurnPolicy::Client {
                    return Ok(SessionResponse::burned());
                }
            }
        }

        // Universe policy, burned record: retire it for a fresh seed
        let record = self.store.reissue(id, SessionRecord::active(self.mint()?));
        Ok(match Self::live_response(&record) {
            Some(response) => {
                info!("Issued fresh universe to returning client {}", client);
                response
            }
            None => SessionResponse::burned(),
        })
    }

    /// Burn on exit. Safe to repeat, safe to never arrive.
    pub fn burn(&self, client: &ClientId) -> BurnAck {
        let id = client.as_str();
        let newly_burned = match self.policy() {
            BurnPolicy::Client => self.registry.record(id),
            BurnPolicy::Universe => false,
        };
        let record = self.store.mark_burned(id);
        let seed_newly_burned = match &record.seed {
            Some(seed) => self.registry.record(seed.as_str()),
            None => false,
        };
        if newly_burned || seed_newly_burned {
            info!("Burned {} under {} policy", client, self.policy().name());
        } else {
            debug!("Burn for {} was a no-op", client);
        }
        BurnAck { burned: true }
    }

    pub fn state(&self, client: &ClientId) -> SessionState {
        let id = client.as_str();
        if self.policy() == BurnPolicy::Client && self.registry.is_burned(id) {
            return SessionState::Burned;
        }
        match self.store.get(id) {
            None => SessionState::Unseen,
            Some(record) => match record.live_seed() {
                Some(seed) => SessionState::Active(seed.clone()),
                None => SessionState::Burned,
            },
        }
    }

    /// Whether a seed has been shown and retired
    pub fn is_seed_burned(&self, seed: &Seed) -> bool {
        self.registry.is_burned(seed.as_str())
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            policy: self.policy(),
            sessions: self.store.len(),
            live: self.store.live_count(),
            burned_identifiers: self.registry.len(),
        }
    }

    fn live_response(record: &SessionRecord) -> Option<SessionResponse> {
        record
            .live_seed()
            .map(|seed| SessionResponse::active(seed.clone(), record.birth))
    }

    /// Mint a seed that has never been burned
    fn mint(&self) -> Result<Seed, SessionError> {
        let attempts = self.config.max_mint_attempts.max(1);
        for _ in 0..attempts {
            let seed = (self.minter)();
            if !self.registry.is_burned(seed.as_str()) {
                return Ok(seed);
            }
            warn!("Minted seed collided with a burned one, retrying");
        }
        Err(SessionError::SeedExhausted { attempts })
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;

    fn client(name: &str) -> ClientId {
        ClientId::new(name)
    }

    #[test]
    fn test_first_issue_is_active() {
        let mgr = SessionManager::default();
        let resp = mgr.issue(&client("a")).unwrap();
        assert!(!resp.burned);
        assert!(resp.seed.is_some());
        assert!(resp.birth.is_some());
        assert_eq!(mgr.state(&client("a")), SessionState::Active(resp.seed.unwrap()));
        assert_eq!(mgr.state(&client("b")), SessionState::Unseen);
    }

    #[test]
    fn test_repeat_issue_is_idempotent() {
        let mgr = SessionManager::default();
        let first = mgr.issue(&client("a")).unwrap();
        for _ in 0..5 {
            assert_eq!(mgr.issue(&client("a")).unwrap(), first);
        }
        assert_eq!(mgr.stats().sessions, 1);
    }

    #[test]
    fn test_clients_get_distinct_seeds() {
        let mgr = SessionManager::default();
        let a = mgr.issue(&client("a")).unwrap().seed;
        let b = mgr.issue(&client("b")).unwrap().seed;
        assert_ne!(a, b);
    }

    #[test]
    fn test_burned_client_is_terminal() {
        let mgr = SessionManager::default();
        let seed = mgr.issue(&client("a")).unwrap().seed.unwrap();
        assert_eq!(mgr.burn(&client("a")), BurnAck { burned: true });
        for _ in 0..10 {
            assert_eq!(mgr.issue(&client("a")).unwrap(), SessionResponse::burned());
        }
        assert_eq!(mgr.state(&client("a")), SessionState::Burned);
        assert!(mgr.is_seed_burned(&seed));
    }

    #[test]
    fn test_burn_is_idempotent() {
        let mgr = SessionManager::default();
        mgr.issue(&client("a")).unwrap();
        for _ in 0..5 {
            assert!(mgr.burn(&client("a")).burned);
        }
        let stats = mgr.stats();
        // the fingerprint and its seed
        assert_eq!(stats.burned_identifiers, 2);
        assert_eq!(stats.live, 0);
    }

    #[test]
    fn test_burn_before_issue() {
        let mgr = SessionManager::default();
        mgr.burn(&client("early"));
        assert!(mgr.issue(&client("early")).unwrap().burned);
        assert_eq!(mgr.stats().live, 0);
    }

    #[test]
    fn test_universe_policy_reissues_fresh_seed() {
        let mgr = SessionManager::new(EngineConfig::multiverse());
        let first = mgr.issue(&client("a")).unwrap().seed.unwrap();
        mgr.burn(&client("a"));
        assert_eq!(mgr.state(&client("a")), SessionState::Burned);

        let second = mgr.issue(&client("a")).unwrap();
        assert!(!second.burned);
        let second = second.seed.unwrap();
        assert_ne!(first, second);
        assert!(mgr.is_seed_burned(&first));
        assert!(!mgr.is_seed_burned(&second));
        assert_eq!(mgr.issue(&client("a")).unwrap().seed, Some(second));
    }

    #[test]
    fn test_universe_policy_burn_unseen() {
        let mgr = SessionManager::new(EngineConfig::multiverse());
        mgr.burn(&client("ghost"));
        assert_eq!(mgr.stats().burned_identifiers, 0);
        assert!(!mgr.issue(&client("ghost")).unwrap().burned);
    }

    #[test]
    fn test_concurrent_first_issue_mints_once() {
        let mgr = Arc::new(SessionManager::default());
        let threads = 16;
        let barrier = Arc::new(Barrier::new(threads));
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let mgr = mgr.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    mgr.issue(&ClientId::new("racer")).unwrap()
                })
            })
            .collect();
        let seeds: HashSet<Seed> = handles
            .into_iter()
            .map(|h| h.join().unwrap().seed.unwrap())
            .collect();
        assert_eq!(seeds.len(), 1);
        assert_eq!(mgr.stats().sessions, 1);
        let stored = mgr.state(&client("racer"));
        assert_eq!(stored, SessionState::Active(seeds.into_iter().next().unwrap()));
    }

    #[test]
    fn test_concurrent_reissue_after_burn() {
        let mgr = Arc::new(SessionManager::new(EngineConfig::multiverse()));
        let old = mgr.issue(&client("c")).unwrap().seed.unwrap();
        mgr.burn(&client("c"));
        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let mgr = mgr.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    mgr.issue(&ClientId::new("c")).unwrap().seed.unwrap()
                })
            })
            .collect();
        let seeds: HashSet<Seed> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(seeds.len(), 1);
        assert!(!seeds.contains(&old));
    }

    #[test]
    fn test_response_wire_format() {
        let burned = serde_json::to_value(SessionResponse::burned()).unwrap();
        assert_eq!(burned, serde_json::json!({ "burned": true }));

        let birth = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let active = SessionResponse::active(Seed::from("abc"), birth);
        let json = serde_json::to_value(&active).unwrap();
        assert_eq!(json["seed"], "abc");
        assert_eq!(json["birth"], 1_700_000_000_000i64);
        let back: SessionResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, active);
    }

    #[test]
    fn test_fingerprint_config() {
        let plain = SessionManager::default();
        assert_eq!(plain.client_id("ua", "en"), plain.client_id("ua", "fr"));
        let strict = SessionManager::new(EngineConfig {
            fingerprint_language: true,
            ..EngineConfig::default()
        });
        assert_ne!(strict.client_id("ua", "en"), strict.client_id("ua", "fr"));
    }

    #[test]
    fn test_custom_backends_are_shared() {
        let store: Arc<MemorySessionStore> = Arc::new(MemorySessionStore::new());
        let registry: Arc<MemoryBurnRegistry> = Arc::new(MemoryBurnRegistry::new());
        let a = SessionManager::with_backends(
            EngineConfig::default(),
            store.clone(),
            registry.clone(),
        );
        let b = SessionManager::with_backends(
            EngineConfig::default(),
            store.clone(),
            registry.clone(),
        );
        let seed = a.issue(&client("shared")).unwrap().seed;
        assert_eq!(b.issue(&client("shared")).unwrap().seed, seed);
        b.burn(&client("shared"));
        assert!(a.issue(&client("shared")).unwrap().burned);
        assert_eq!(store.len(), 1);
    }

    /// Minter that replays `seeds` in order, then repeats the last one
    fn scripted(seeds: &[&str]) -> SeedMinter {
        let seeds: Vec<Seed> = seeds.iter().map(|s| Seed::from(*s)).collect();
        let next = AtomicUsize::new(0);
        Arc::new(move || {
            let i = next.fetch_add(1, Ordering::SeqCst).min(seeds.len() - 1);
            seeds[i].clone()
        })
    }

    #[test]
    fn test_mint_skips_burned_seed() {
        let registry = Arc::new(MemoryBurnRegistry::new());
        registry.record("spent");
        let mgr = SessionManager::with_backends(
            EngineConfig::multiverse(),
            Arc::new(MemorySessionStore::new()),
            registry,
        )
        .with_minter(scripted(&["spent", "spent", "fresh"]));

        let resp = mgr.issue(&client("a")).unwrap();
        assert_eq!(resp.seed, Some(Seed::from("fresh")));
        assert!(!mgr.is_seed_burned(&Seed::from("fresh")));
    }

    #[test]
    fn test_reissue_never_returns_burned_seed() {
        let mgr = SessionManager::new(EngineConfig::multiverse())
            .with_minter(scripted(&["first", "first", "second"]));
        assert_eq!(mgr.issue(&client("a")).unwrap().seed, Some(Seed::from("first")));
        mgr.burn(&client("a"));
        let resp = mgr.issue(&client("a")).unwrap();
        assert_eq!(resp.seed, Some(Seed::from("second")));
    }

    #[test]
    fn test_mint_exhaustion_is_an_error() {
        let registry = Arc::new(MemoryBurnRegistry::new());
        registry.record("spent");
        let config = EngineConfig { max_mint_attempts: 3, ..EngineConfig::default() };
        let mgr = SessionManager::with_backends(
            config,
            Arc::new(MemorySessionStore::new()),
            registry,
        )
        .with_minter(scripted(&["spent"]));

        let err = mgr.issue(&client("a")).unwrap_err();
        assert!(matches!(err, SessionError::SeedExhausted { attempts: 3 }));
        assert_eq!(mgr.state(&client("a")), SessionState::Unseen);
    }
}
