//! Trust material shared with the signature verifier

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use verify_core::PublicKey;

/// Who is expected to have signed an assertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignerRole {
    /// An identity provider in the federation
    Idp,
    /// The hub itself
    Hub,
}

impl std::fmt::Display for SignerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignerRole::Idp => write!(f, "idp"),
            SignerRole::Hub => write!(f, "hub"),
        }
    }
}

impl std::str::FromStr for SignerRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idp" => Ok(SignerRole::Idp),
            "hub" => Ok(SignerRole::Hub),
            _ => Err(format!("Unknown signer role: {}", s)),
        }
    }
}

/// An immutable set of trusted signing keys
///
/// Built once, then shared behind an `Arc`. Updating trust means building a
/// new value and swapping the whole snapshot.
#[derive(Debug, Clone)]
pub struct TrustMaterial {
    keys: HashMap<SignerRole, HashMap<String, PublicKey>>,
    loaded_at: DateTime<Utc>,
}

impl TrustMaterial {
    /// Empty trust material
    pub fn new() -> Self {
        Self {
            keys: HashMap::new(),
            loaded_at: Utc::now(),
        }
    }

    /// Add a trusted key for a role
    pub fn with_key(mut self, role: SignerRole, key: PublicKey) -> Self {
        self.keys
            .entry(role)
            .or_default()
            .insert(key.kid().to_string(), key);
        self
    }

    /// Look up a key by role and key id
    pub fn key(&self, role: SignerRole, kid: &str) -> Option<&PublicKey> {
        self.keys.get(&role).and_then(|keys| keys.get(kid))
    }

    /// Number of keys trusted for a role
    pub fn key_count(&self, role: SignerRole) -> usize {
        self.keys.get(&role).map_or(0, HashMap::len)
    }

    /// Key ids trusted for a role
    pub fn key_ids(&self, role: SignerRole) -> Vec<String> {
        self.keys
            .get(&role)
            .map(|keys| keys.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// When this snapshot was built
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

impl Default for TrustMaterial {
    fn default() -> Self {
        Self::new()
    }
}

/// Source of the current trust snapshot
///
/// Implementations must hand out a complete snapshot; a refresh in progress
/// is never visible to a caller.
pub trait TrustSource: Send + Sync {
    fn snapshot(&self) -> Arc<TrustMaterial>;
}

impl<T: TrustSource + ?Sized> TrustSource for Arc<T> {
    fn snapshot(&self) -> Arc<TrustMaterial> {
        (**self).snapshot()
    }
}

/// Fixed trust material that never changes
pub struct StaticTrust(Arc<TrustMaterial>);

impl StaticTrust {
    pub fn new(material: TrustMaterial) -> Self {
        Self(Arc::new(material))
    }
}

impl TrustSource for StaticTrust {
    fn snapshot(&self) -> Arc<TrustMaterial> {
        Arc::clone(&self.0)
    }
}
