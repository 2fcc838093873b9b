//! Engine configuration
//!
//! Defaults suit a single-process deployment. A JSON file (path from
//! `UNIVERSE_CONFIG`) and the `UNIVERSE_BURN_POLICY` variable override them.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

pub const CONFIG_ENV: &str = "UNIVERSE_CONFIG";
pub const BURN_POLICY_ENV: &str = "UNIVERSE_BURN_POLICY";

/// What an exit signal burns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BurnPolicy {
    /// The client itself: it never receives another universe
    #[default]
    Client,
    /// Only the universe: the client gets a fresh seed next time, the burned
    /// seed is never issued again
    Universe,
}

impl BurnPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            BurnPolicy::Client => "client",
            BurnPolicy::Universe => "universe",
        }
    }
}

impl FromStr for BurnPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client" => Ok(BurnPolicy::Client),
            "universe" | "seed" => Ok(BurnPolicy::Universe),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Configuration of the session engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub burn_policy: BurnPolicy,
    /// Mix accept-language into client fingerprints, not only the user agent
    pub fingerprint_language: bool,
    /// Upper bound on attempts to mint a seed that was never burned
    pub max_mint_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            burn_policy: BurnPolicy::Client,
            fingerprint_language: false,
            max_mint_attempts: 8,
        }
    }
}

impl EngineConfig {
    /// Multiverse mode: burns retire universes, not visitors
    pub fn multiverse() -> Self {
        Self {
            burn_policy: BurnPolicy::Universe,
            ..Self::default()
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Defaults, then the file named by `UNIVERSE_CONFIG`, then
    /// `UNIVERSE_BURN_POLICY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_json_file(path)?,
            Err(_) => Self::default(),
        };
        if let Ok(policy) = std::env::var(BURN_POLICY_ENV) {
            config.burn_policy = policy.parse()?;
        }
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown burn policy: {0} (expected 'client' or 'universe')")]
    UnknownPolicy(String),
}
