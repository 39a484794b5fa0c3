//! Ed25519 signing of assertions
//!
//! A signature covers `Assertion::signing_input()`, which is every field of
//! the assertion except the signature itself. The signature carries the id
//! of the key that produced it so that a verifier can pick the right trust
//! anchor.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

use crate::assertion::{Assertion, AssertionSignature};
use crate::error::{CoreError, Result};

/// Ed25519 key pair used by an identity provider or the hub
#[derive(Clone)]
pub struct KeyPair {
    kid: String,
    signing_key: SigningKey,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("kid", &self.kid)
            .field("signing_key", &"[redacted]")
            .finish()
    }
}

impl KeyPair {
    /// Generate a new random key pair
    pub fn generate(kid: impl Into<String>) -> Self {
        Self {
            kid: kid.into(),
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Create a key pair from raw secret key bytes
    pub fn from_bytes(kid: impl Into<String>, bytes: &[u8; 32]) -> Self {
        Self {
            kid: kid.into(),
            signing_key: SigningKey::from_bytes(bytes),
        }
    }

    /// Get the key identifier
    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// Get the public half
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            kid: self.kid.clone(),
            verifying_key: self.signing_key.verifying_key(),
        }
    }

    /// Sign an assertion, replacing any existing signature
    pub fn sign(&self, mut assertion: Assertion) -> Result<Assertion> {
        let input = assertion.signing_input()?;
        let signature = self.signing_key.sign(&input);
        assertion.signature = Some(AssertionSignature {
            key_id: self.kid.clone(),
            value: signature.to_bytes().to_vec(),
        });
        Ok(assertion)
    }
}

/// Ed25519 public key used to verify assertion signatures
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    kid: String,
    verifying_key: VerifyingKey,
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicKey").field("kid", &self.kid).finish()
    }
}

impl PublicKey {
    /// Create from raw public key bytes
    pub fn from_bytes(kid: impl Into<String>, bytes: &[u8; 32]) -> Result<Self> {
        let verifying_key =
            VerifyingKey::from_bytes(bytes).map_err(|e| CoreError::InvalidKey(e.to_string()))?;
        Ok(Self {
            kid: kid.into(),
            verifying_key,
        })
    }

    /// Create from a byte slice that must be exactly 32 bytes long
    pub fn from_slice(kid: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| {
            CoreError::InvalidKey(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Self::from_bytes(kid, &bytes)
    }

    /// Get the key identifier
    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// Raw public key bytes
    pub fn to_bytes(&self) -> [u8; 32] {
        self.verifying_key.to_bytes()
    }

    /// Verify the signature attached to an assertion
    pub fn verify_assertion(&self, assertion: &Assertion) -> Result<()> {
        let attached = assertion
            .signature
            .as_ref()
            .ok_or(CoreError::MissingSignature)?;

        if attached.key_id != self.kid {
            return Err(CoreError::KeyIdMismatch {
                expected: self.kid.clone(),
                actual: attached.key_id.clone(),
            });
        }

        let signature = Signature::from_slice(&attached.value)?;
        let input = assertion.signing_input()?;
        self.verifying_key.verify(&input, &signature)?;
        Ok(())
    }
}
