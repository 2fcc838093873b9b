//! Client identifiers - the low-precision keys sessions are tracked under

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex characters kept from the header digest
const FINGERPRINT_LEN: usize = 16;

/// Identifier of a visiting client. Collisions between clients that share
/// request metadata are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Wrap an externally derived identifier as-is
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Fingerprint from the user agent header alone
    pub fn from_user_agent(user_agent: &str) -> Self {
        Self::digest(&[user_agent])
    }

    /// Fingerprint from user agent and accept-language headers
    pub fn from_headers(user_agent: &str, accept_language: &str) -> Self {
        Self::digest(&[user_agent, accept_language])
    }

    fn digest(parts: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(part.as_bytes());
        }
        let mut hex = hex::encode(hasher.finalize());
        hex.truncate(FINGERPRINT_LEN);
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
