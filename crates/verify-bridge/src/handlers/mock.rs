//! Mock Collaborators
//!
//! For testing purposes - accept or reject without real key material, and
//! count how often they were called.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use verify_core::{Assertion, IdentityDataset};

use crate::bridge::{IdentityDatasetUnmarshaller, SignatureVerifier};
use crate::error::{AttributeStatementError, SignatureError};
use crate::types::SignerRole;

/// Mock signature verifier
///
/// Clones share the call counter, so a test can keep one handle after
/// moving another into the engine.
#[derive(Debug, Clone)]
pub struct MockSignatureVerifier {
    rejection: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl MockSignatureVerifier {
    /// Verifier that accepts every assertion
    pub fn accepting() -> Self {
        Self {
            rejection: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Verifier that rejects every assertion with `reason`
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            rejection: Some(reason.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `verify` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SignatureVerifier for MockSignatureVerifier {
    fn verify(&self, _assertion: &Assertion, _role: SignerRole) -> Result<(), SignatureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.rejection {
            Some(reason) => Err(SignatureError::Rejected(reason.clone())),
            None => Ok(()),
        }
    }

    fn description(&self) -> &str {
        "mock signature verifier"
    }
}

/// Wraps an unmarshaller and counts calls to it
#[derive(Debug, Clone)]
pub struct CountingUnmarshaller<U> {
    inner: U,
    calls: Arc<AtomicUsize>,
}

impl<U: IdentityDatasetUnmarshaller> CountingUnmarshaller<U> {
    pub fn new(inner: U) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `unmarshal` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<U: IdentityDatasetUnmarshaller> IdentityDatasetUnmarshaller for CountingUnmarshaller<U> {
    fn unmarshal(&self, assertion: &Assertion) -> Result<IdentityDataset, AttributeStatementError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.unmarshal(assertion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::MatchingDatasetUnmarshaller;
    use verify_core::AssertionBuilder;

    #[test]
    fn test_accepting_verifier() {
        let verifier = MockSignatureVerifier::accepting();
        let assertion = AssertionBuilder::new().build();

        assert!(verifier.verify(&assertion, SignerRole::Idp).is_ok());
        assert_eq!(verifier.calls(), 1);
    }

    #[test]
    fn test_rejecting_verifier() {
        let verifier = MockSignatureVerifier::rejecting("test error");
        let assertion = AssertionBuilder::new().build();

        match verifier.verify(&assertion, SignerRole::Hub) {
            Err(SignatureError::Rejected(msg)) => assert_eq!(msg, "test error"),
            other => panic!("Expected Rejected error, got {:?}", other),
        }
    }

    #[test]
    fn test_clones_share_counter() {
        let verifier = MockSignatureVerifier::accepting();
        let handle = verifier.clone();
        let assertion = AssertionBuilder::new().build();

        verifier.verify(&assertion, SignerRole::Idp).unwrap();
        verifier.verify(&assertion, SignerRole::Idp).unwrap();
        assert_eq!(handle.calls(), 2);
    }

    #[test]
    fn test_counting_unmarshaller_counts_failures_too() {
        let counting = CountingUnmarshaller::new(MatchingDatasetUnmarshaller::new());
        let handle = counting.clone();

        assert!(counting.unmarshal(&AssertionBuilder::new().build()).is_err());
        assert_eq!(handle.calls(), 1);
    }
}
