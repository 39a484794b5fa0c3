//! Engine error types

use serde::Serialize;
use thiserror::Error;

use verify_bridge::{AttributeStatementError, BridgeError, SignatureError, SubjectError};
use verify_core::{AssuranceLevel, UnsupportedAssuranceLevel};

/// Broad class of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCategory {
    /// A required field is absent or has an illegal value
    Malformed,
    /// Signature or subject confirmation did not hold
    Security,
    /// Attribute statement does not match the expected schema
    Schema,
    /// Wrong number of assertions or statements
    Cardinality,
    /// The two assertions disagree with each other
    Consistency,
    /// Well-formed but not acceptable to this relying party
    Policy,
}

/// Why a hub response was rejected
///
/// Messages carry identifiers only, never key material or attribute values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("Exactly one authn assertion is expected, found {0}")]
    ExactlyOneAuthnAssertionExpected(usize),

    #[error("Exactly one matching dataset assertion is expected, found {0}")]
    ExactlyOneIdentityAssertionExpected(usize),

    #[error("Assertion IssueInstant is missing")]
    MissingIssueInstant,

    #[error("Assertion Id is missing or blank")]
    MissingId,

    #[error("Assertion with id {assertion_id} has missing or blank Issuer")]
    MissingIssuer { assertion_id: String },

    #[error("Assertion with id {assertion_id} has missing Version")]
    MissingVersion { assertion_id: String },

    #[error("Assertion with id {assertion_id} declared an illegal Version attribute value")]
    IllegalVersion { assertion_id: String },

    #[error("Assertion with id {assertion_id} failed signature validation")]
    InvalidSignature {
        assertion_id: String,
        #[source]
        source: SignatureError,
    },

    #[error("Assertion with id {assertion_id} has an invalid subject")]
    InvalidSubject {
        assertion_id: String,
        #[source]
        source: SubjectError,
    },

    #[error("Assertion with id {assertion_id} has an invalid attribute statement")]
    InvalidAttributeStatement {
        assertion_id: String,
        #[source]
        source: AttributeStatementError,
    },

    #[error("Authn and matching dataset assertions were issued by different issuers")]
    MismatchedIssuers,

    #[error("Authn and matching dataset assertions refer to different subjects")]
    MismatchedPids,

    #[error("Exactly one authn statement is expected, found {0}")]
    ExactlyOneAuthnStatementExpected(usize),

    #[error("Authn statement has no authn context class reference")]
    MissingAuthnContext,

    #[error(transparent)]
    UnsupportedAssuranceLevel(#[from] UnsupportedAssuranceLevel),

    #[error("Level of assurance {actual} is below the required minimum {minimum}")]
    LevelOfAssuranceBelowMinimum {
        actual: AssuranceLevel,
        minimum: AssuranceLevel,
    },

    #[error("Success status cannot be translated as a non-success response")]
    UnexpectedSuccessStatus,

    #[error("Unknown status code: {value}")]
    UnknownStatusCode {
        value: String,
        sub_status: Option<String>,
    },
}

impl ValidationFailure {
    /// The category this failure belongs to
    pub fn category(&self) -> FailureCategory {
        use ValidationFailure::*;
        match self {
            MissingIssueInstant
            | MissingId
            | MissingIssuer { .. }
            | MissingVersion { .. }
            | IllegalVersion { .. }
            | MissingAuthnContext
            | UnknownStatusCode { .. } => FailureCategory::Malformed,
            InvalidSignature { .. } | InvalidSubject { .. } => FailureCategory::Security,
            InvalidAttributeStatement { .. } => FailureCategory::Schema,
            ExactlyOneAuthnAssertionExpected(_)
            | ExactlyOneIdentityAssertionExpected(_)
            | ExactlyOneAuthnStatementExpected(_) => FailureCategory::Cardinality,
            MismatchedIssuers | MismatchedPids => FailureCategory::Consistency,
            ValidationFailure::UnsupportedAssuranceLevel(_)
            | LevelOfAssuranceBelowMinimum { .. }
            | UnexpectedSuccessStatus => FailureCategory::Policy,
        }
    }

    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        use ValidationFailure::*;
        match self {
            ExactlyOneAuthnAssertionExpected(_) => "EXACTLY_ONE_AUTHN_ASSERTION_EXPECTED",
            ExactlyOneIdentityAssertionExpected(_) => "EXACTLY_ONE_IDENTITY_ASSERTION_EXPECTED",
            MissingIssueInstant => "MISSING_ISSUE_INSTANT",
            MissingId => "MISSING_ID",
            MissingIssuer { .. } => "MISSING_ISSUER",
            MissingVersion { .. } => "MISSING_VERSION",
            IllegalVersion { .. } => "ILLEGAL_VERSION",
            InvalidSignature { .. } => "INVALID_SIGNATURE",
            InvalidSubject { .. } => "INVALID_SUBJECT",
            InvalidAttributeStatement { .. } => "INVALID_ATTRIBUTE_STATEMENT",
            MismatchedIssuers => "MISMATCHED_ISSUERS",
            MismatchedPids => "MISMATCHED_PIDS",
            ExactlyOneAuthnStatementExpected(_) => "EXACTLY_ONE_AUTHN_STATEMENT_EXPECTED",
            MissingAuthnContext => "MISSING_AUTHN_CONTEXT",
            ValidationFailure::UnsupportedAssuranceLevel(_) => "UNSUPPORTED_ASSURANCE_LEVEL",
            LevelOfAssuranceBelowMinimum { .. } => "LEVEL_OF_ASSURANCE_BELOW_MINIMUM",
            UnexpectedSuccessStatus => "UNEXPECTED_SUCCESS_STATUS",
            UnknownStatusCode { .. } => "UNKNOWN_STATUS_CODE",
        }
    }

    /// Id of the assertion the failure was found on, when there is one
    pub fn assertion_id(&self) -> Option<&str> {
        use ValidationFailure::*;
        match self {
            MissingIssuer { assertion_id }
            | MissingVersion { assertion_id }
            | IllegalVersion { assertion_id }
            | InvalidSignature { assertion_id, .. }
            | InvalidSubject { assertion_id, .. }
            | InvalidAttributeStatement { assertion_id, .. } => Some(assertion_id),
            _ => None,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unrecognised Hub Environment: {0}. Valid values are: PRODUCTION, INTEGRATION, COMPLIANCE_TOOL")]
    UnknownEnvironment(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error("Invalid trusted key '{kid}': {reason}")]
    InvalidKey { kid: String, reason: String },

    #[error("Invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Capabilities(#[from] BridgeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            ValidationFailure::ExactlyOneAuthnAssertionExpected(0).category(),
            FailureCategory::Cardinality
        );
        assert_eq!(ValidationFailure::MismatchedPids.category(), FailureCategory::Consistency);
        assert_eq!(
            ValidationFailure::InvalidSignature {
                assertion_id: "a".into(),
                source: SignatureError::MissingSignature,
            }
            .category(),
            FailureCategory::Security
        );
        assert_eq!(
            ValidationFailure::LevelOfAssuranceBelowMinimum {
                actual: AssuranceLevel::Level1,
                minimum: AssuranceLevel::Level2,
            }
            .category(),
            FailureCategory::Policy
        );
    }

    #[test]
    fn test_unsupported_level_keeps_raw_value() {
        let failure: ValidationFailure = UnsupportedAssuranceLevel {
            raw: "urn:example:level9".into(),
        }
        .into();
        assert_eq!(failure.error_code(), "UNSUPPORTED_ASSURANCE_LEVEL");
        assert!(failure.to_string().contains("urn:example:level9"));
    }

    #[test]
    fn test_source_is_chained() {
        use std::error::Error;

        let failure = ValidationFailure::InvalidSubject {
            assertion_id: "assertion-1".into(),
            source: SubjectError::MissingNameId,
        };
        assert_eq!(failure.assertion_id(), Some("assertion-1"));
        assert!(failure.source().is_some());
    }

    #[test]
    fn test_unknown_environment_lists_valid_values() {
        let message = ConfigError::UnknownEnvironment("STAGING".into()).to_string();
        assert!(message.contains("STAGING"));
        assert!(message.contains("PRODUCTION, INTEGRATION, COMPLIANCE_TOOL"));
    }
}
