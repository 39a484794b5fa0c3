//! Trust Registry
//!
//! Holds the current trust snapshot for signature verification:
//! - Identity provider signing keys
//! - Hub signing keys
//!
//! Readers get an `Arc` to an immutable snapshot. A refresh builds a new
//! snapshot and swaps it in whole.

use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

use verify_bridge::{SignerRole, TrustMaterial, TrustSource};
use verify_core::PublicKey;

/// Thread-safe holder of the current trust snapshot
pub struct TrustRegistry {
    current: RwLock<Arc<TrustMaterial>>,
}

impl TrustRegistry {
    /// Create a registry serving `material`
    pub fn new(material: TrustMaterial) -> Self {
        info!(
            idp_keys = material.key_count(SignerRole::Idp),
            hub_keys = material.key_count(SignerRole::Hub),
            "Trust registry initialized"
        );
        Self {
            current: RwLock::new(Arc::new(material)),
        }
    }

    /// Create a registry that trusts nothing
    pub fn empty() -> Self {
        Self::new(TrustMaterial::new())
    }

    /// Swap in a new trust snapshot
    ///
    /// Callers holding the previous snapshot keep using it until they finish.
    pub fn replace(&self, material: TrustMaterial) {
        let idp_keys = material.key_count(SignerRole::Idp);
        let hub_keys = material.key_count(SignerRole::Hub);
        let next = Arc::new(material);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next;
        info!(idp_keys, hub_keys, "Trust material replaced");
    }

    /// Add one key on top of the current snapshot
    pub fn trust_key(&self, role: SignerRole, key: PublicKey) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let kid = key.kid().to_string();
        let next = (**current).clone().with_key(role, key);
        *current = Arc::new(next);
        info!(kid = %kid, role = %role, "Registered trusted key");
    }

    /// Check if a key is trusted for a role
    pub fn is_trusted(&self, role: SignerRole, kid: &str) -> bool {
        self.snapshot().key(role, kid).is_some()
    }

    /// List trusted key ids for a role
    pub fn list_kids(&self, role: SignerRole) -> Vec<String> {
        self.snapshot().key_ids(role)
    }
}

impl TrustSource for TrustRegistry {
    fn snapshot(&self) -> Arc<TrustMaterial> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verify_core::KeyPair;

    #[test]
    fn test_registry_creation() {
        let idp = KeyPair::generate("idp-1");
        let registry = TrustRegistry::new(TrustMaterial::new().with_key(SignerRole::Idp, idp.public_key()));

        assert!(registry.is_trusted(SignerRole::Idp, "idp-1"));
        assert!(!registry.is_trusted(SignerRole::Hub, "idp-1"));
    }

    #[test]
    fn test_trust_key() {
        let registry = TrustRegistry::empty();
        let kp1 = KeyPair::generate("idp-1");
        let kp2 = KeyPair::generate("idp-2");

        registry.trust_key(SignerRole::Idp, kp1.public_key());
        registry.trust_key(SignerRole::Idp, kp2.public_key());

        let kids = registry.list_kids(SignerRole::Idp);
        assert_eq!(kids.len(), 2);
        assert!(kids.contains(&"idp-1".to_string()));
        assert!(kids.contains(&"idp-2".to_string()));
    }

    #[test]
    fn test_replace_does_not_disturb_held_snapshot() {
        let old_key = KeyPair::generate("idp-old");
        let new_key = KeyPair::generate("idp-new");
        let registry = TrustRegistry::new(TrustMaterial::new().with_key(SignerRole::Idp, old_key.public_key()));

        let held = registry.snapshot();
        registry.replace(TrustMaterial::new().with_key(SignerRole::Idp, new_key.public_key()));

        assert!(held.key(SignerRole::Idp, "idp-old").is_some());
        assert!(held.key(SignerRole::Idp, "idp-new").is_none());
        assert!(!registry.is_trusted(SignerRole::Idp, "idp-old"));
        assert!(registry.is_trusted(SignerRole::Idp, "idp-new"));
    }

    #[test]
    fn test_shared_registry_is_a_trust_source() {
        let registry = Arc::new(TrustRegistry::empty());
        let shared: Arc<TrustRegistry> = Arc::clone(&registry);

        registry.trust_key(SignerRole::Hub, KeyPair::generate("hub-1").public_key());
        assert_eq!(shared.snapshot().key_count(SignerRole::Hub), 1);
    }
}
