//! Validation capabilities the engine calls into

use std::sync::{Arc, OnceLock};
use tracing::info;

use verify_core::{Assertion, IdentityDataset, Subject};

use crate::error::{AttributeStatementError, BridgeError, Result, SignatureError, SubjectError};
use crate::handlers::{BearerSubjectValidator, MatchingDatasetStatementValidator, MatchingDatasetUnmarshaller};
use crate::types::SignerRole;

/// Verifies the signature on a single assertion
pub trait SignatureVerifier: Send + Sync {
    /// Verify `assertion` was signed by a trusted key for `role`
    fn verify(&self, assertion: &Assertion, role: SignerRole) -> std::result::Result<(), SignatureError>;

    /// Get a description of this verifier (for logging)
    fn description(&self) -> &str {
        "signature verifier"
    }
}

/// Validates the subject and its confirmation against the request id
pub trait SubjectValidator: Send + Sync {
    fn validate(
        &self,
        subject: Option<&Subject>,
        expected_in_response_to: &str,
    ) -> std::result::Result<(), SubjectError>;
}

/// Schema-level check of an assertion's attribute statement
pub trait AttributeStatementValidator: Send + Sync {
    fn validate(&self, assertion: &Assertion) -> std::result::Result<(), AttributeStatementError>;
}

/// Extracts the matching dataset from an identity assertion
pub trait IdentityDatasetUnmarshaller: Send + Sync {
    fn unmarshal(&self, assertion: &Assertion) -> std::result::Result<IdentityDataset, AttributeStatementError>;
}

static BOOTSTRAP: OnceLock<()> = OnceLock::new();

/// Proof that process-wide capability initialization has run
#[derive(Debug, Clone, Copy)]
pub struct CapabilitiesReady {
    _private: (),
}

/// Initialize the validation capabilities
///
/// Call once at process start. Repeated calls are cheap and return the same
/// token.
pub fn bootstrap() -> CapabilitiesReady {
    BOOTSTRAP.get_or_init(|| {
        info!(
            version = verify_core::version(),
            "Assertion validation capabilities initialized"
        );
    });
    CapabilitiesReady { _private: () }
}

/// The collaborators one engine instance validates with
#[derive(Clone)]
pub struct ValidationCapabilities {
    pub signature: Arc<dyn SignatureVerifier>,
    pub subject: Arc<dyn SubjectValidator>,
    pub attributes: Arc<dyn AttributeStatementValidator>,
    pub unmarshaller: Arc<dyn IdentityDatasetUnmarshaller>,
}

/// Builder for `ValidationCapabilities`
///
/// The signature verifier is mandatory. The other collaborators default to
/// `BearerSubjectValidator`, `MatchingDatasetStatementValidator` and
/// `MatchingDatasetUnmarshaller`.
pub struct CapabilitiesBuilder {
    _ready: CapabilitiesReady,
    signature: Option<Arc<dyn SignatureVerifier>>,
    subject: Option<Arc<dyn SubjectValidator>>,
    attributes: Option<Arc<dyn AttributeStatementValidator>>,
    unmarshaller: Option<Arc<dyn IdentityDatasetUnmarshaller>>,
}

impl CapabilitiesBuilder {
    /// Create a new builder
    pub fn new(ready: CapabilitiesReady) -> Self {
        Self {
            _ready: ready,
            signature: None,
            subject: None,
            attributes: None,
            unmarshaller: None,
        }
    }

    pub fn with_signature_verifier<V: SignatureVerifier + 'static>(mut self, verifier: V) -> Self {
        info!(description = verifier.description(), "Registered signature verifier");
        self.signature = Some(Arc::new(verifier));
        self
    }

    pub fn with_subject_validator<V: SubjectValidator + 'static>(mut self, validator: V) -> Self {
        self.subject = Some(Arc::new(validator));
        self
    }

    pub fn with_attribute_validator<V: AttributeStatementValidator + 'static>(
        mut self,
        validator: V,
    ) -> Self {
        self.attributes = Some(Arc::new(validator));
        self
    }

    pub fn with_unmarshaller<U: IdentityDatasetUnmarshaller + 'static>(mut self, unmarshaller: U) -> Self {
        self.unmarshaller = Some(Arc::new(unmarshaller));
        self
    }

    /// Build the capability bundle
    pub fn build(self) -> Result<ValidationCapabilities> {
        let signature = self
            .signature
            .ok_or(BridgeError::MissingCapability("signature verifier"))?;

        Ok(ValidationCapabilities {
            signature,
            subject: self
                .subject
                .unwrap_or_else(|| Arc::new(BearerSubjectValidator::new())),
            attributes: self
                .attributes
                .unwrap_or_else(|| Arc::new(MatchingDatasetStatementValidator::new())),
            unmarshaller: self
                .unmarshaller
                .unwrap_or_else(|| Arc::new(MatchingDatasetUnmarshaller::new())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::MockSignatureVerifier;

    #[test]
    fn test_bootstrap_is_idempotent() {
        let _first = bootstrap();
        let _second = bootstrap();
        assert!(BOOTSTRAP.get().is_some());
    }

    #[test]
    fn test_builder_requires_signature_verifier() {
        let result = CapabilitiesBuilder::new(bootstrap()).build();
        assert!(matches!(
            result,
            Err(BridgeError::MissingCapability("signature verifier"))
        ));
    }

    #[test]
    fn test_builder_fills_defaults() {
        let capabilities = CapabilitiesBuilder::new(bootstrap())
            .with_signature_verifier(MockSignatureVerifier::accepting())
            .build()
            .unwrap();

        let assertion = verify_core::AssertionBuilder::new().build();
        assert!(capabilities
            .signature
            .verify(&assertion, SignerRole::Idp)
            .is_ok());
        assert_eq!(
            capabilities.subject.validate(None, "req-1"),
            Err(SubjectError::MissingSubject)
        );
    }
}
