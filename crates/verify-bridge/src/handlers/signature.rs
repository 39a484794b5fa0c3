//! Trust-store Signature Verifier
//!
//! Verifies assertion signatures against the current trust snapshot.

use tracing::debug;

use verify_core::{Assertion, CoreError};

use crate::bridge::SignatureVerifier;
use crate::error::SignatureError;
use crate::types::{SignerRole, TrustSource};

/// Verifies Ed25519 assertion signatures with keys from a `TrustSource`
///
/// One snapshot is taken per call, so a concurrent trust refresh either
/// applies to the whole verification or not at all.
pub struct TrustStoreSignatureVerifier<S> {
    trust: S,
}

impl<S: TrustSource> TrustStoreSignatureVerifier<S> {
    /// Create a new verifier over a trust source
    pub fn new(trust: S) -> Self {
        Self { trust }
    }
}

impl<S: TrustSource> SignatureVerifier for TrustStoreSignatureVerifier<S> {
    fn verify(&self, assertion: &Assertion, role: SignerRole) -> Result<(), SignatureError> {
        let signature = assertion
            .signature
            .as_ref()
            .ok_or(SignatureError::MissingSignature)?;

        let snapshot = self.trust.snapshot();
        if snapshot.key_count(role) == 0 {
            return Err(SignatureError::NoTrustedKeys(role));
        }

        let key = snapshot
            .key(role, &signature.key_id)
            .ok_or_else(|| SignatureError::UnknownSigningKey {
                role,
                key_id: signature.key_id.clone(),
            })?;

        debug!(
            assertion_id = assertion.id_or_empty(),
            key_id = %signature.key_id,
            role = %role,
            "Verifying assertion signature"
        );

        key.verify_assertion(assertion).map_err(|e| match e {
            CoreError::MissingSignature => SignatureError::MissingSignature,
            other => SignatureError::Invalid(other.to_string()),
        })
    }

    fn description(&self) -> &str {
        "trust-store Ed25519 verifier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{StaticTrust, TrustMaterial};
    use verify_core::{AssertionBuilder, KeyPair, Subject};

    fn assertion() -> Assertion {
        AssertionBuilder::new()
            .id("assertion-1")
            .issuer("idp-1")
            .subject(Subject::new("pid-abc"))
            .build()
    }

    fn verifier_trusting(key_pair: &KeyPair, role: SignerRole) -> TrustStoreSignatureVerifier<StaticTrust> {
        TrustStoreSignatureVerifier::new(StaticTrust::new(
            TrustMaterial::new().with_key(role, key_pair.public_key()),
        ))
    }

    #[test]
    fn test_trusted_signature_verifies() {
        let idp = KeyPair::generate("idp-key");
        let verifier = verifier_trusting(&idp, SignerRole::Idp);
        let signed = idp.sign(assertion()).unwrap();

        assert_eq!(verifier.verify(&signed, SignerRole::Idp), Ok(()));
    }

    #[test]
    fn test_unsigned_assertion() {
        let idp = KeyPair::generate("idp-key");
        let verifier = verifier_trusting(&idp, SignerRole::Idp);

        assert_eq!(
            verifier.verify(&assertion(), SignerRole::Idp),
            Err(SignatureError::MissingSignature)
        );
    }

    #[test]
    fn test_key_trusted_for_other_role_is_rejected() {
        let hub = KeyPair::generate("hub-key");
        let idp = KeyPair::generate("idp-key");
        let verifier = TrustStoreSignatureVerifier::new(StaticTrust::new(
            TrustMaterial::new()
                .with_key(SignerRole::Hub, hub.public_key())
                .with_key(SignerRole::Idp, idp.public_key()),
        ));
        let signed_by_hub = hub.sign(assertion()).unwrap();

        assert!(matches!(
            verifier.verify(&signed_by_hub, SignerRole::Idp),
            Err(SignatureError::UnknownSigningKey { role: SignerRole::Idp, .. })
        ));
    }

    #[test]
    fn test_no_keys_for_role() {
        let hub = KeyPair::generate("hub-key");
        let verifier = verifier_trusting(&hub, SignerRole::Hub);
        let signed = hub.sign(assertion()).unwrap();

        assert_eq!(
            verifier.verify(&signed, SignerRole::Idp),
            Err(SignatureError::NoTrustedKeys(SignerRole::Idp))
        );
    }

    #[test]
    fn test_tampered_assertion_fails() {
        let idp = KeyPair::generate("idp-key");
        let verifier = verifier_trusting(&idp, SignerRole::Idp);
        let mut signed = idp.sign(assertion()).unwrap();
        signed.subject = Some(Subject::new("pid-xyz"));

        assert!(matches!(
            verifier.verify(&signed, SignerRole::Idp),
            Err(SignatureError::Invalid(_))
        ));
    }

    #[test]
    fn test_impostor_key_with_trusted_kid_fails() {
        let idp = KeyPair::generate("idp-key");
        let impostor = KeyPair::generate("idp-key");
        let verifier = verifier_trusting(&idp, SignerRole::Idp);
        let forged = impostor.sign(assertion()).unwrap();

        assert!(matches!(
            verifier.verify(&forged, SignerRole::Idp),
            Err(SignatureError::Invalid(_))
        ));
    }
}
