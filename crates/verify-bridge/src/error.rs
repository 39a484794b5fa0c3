//! Error types for the validation collaborators
//!
//! Messages name fields and identifiers only. Key material, signature bytes
//! and attribute values never appear in them.

use thiserror::Error;

use crate::types::SignerRole;

/// Result type for capability wiring
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors raised while assembling the capability bundle
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A required capability was not supplied
    #[error("Missing capability: {0}")]
    MissingCapability(&'static str),
}

/// Signature verification failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// Assertion carries no signature
    #[error("Assertion is not signed")]
    MissingSignature,

    /// No trusted key for this role has the signature's key id
    #[error("No trusted {role} signing key with id '{key_id}'")]
    UnknownSigningKey { role: SignerRole, key_id: String },

    /// Trust material holds no keys at all for this role
    #[error("No trusted {0} signing keys are configured")]
    NoTrustedKeys(SignerRole),

    /// Signature bytes did not verify
    #[error("Signature did not verify: {0}")]
    Invalid(String),

    /// Rejected by a verifier without further detail
    #[error("Signature rejected: {0}")]
    Rejected(String),
}

/// Subject and subject-confirmation failures, in the order they are checked
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubjectError {
    #[error("Subject is missing from the assertion")]
    MissingSubject,

    #[error("Exactly one subject confirmation is expected, found {0}")]
    ExactlyOneConfirmationExpected(usize),

    #[error("Subject confirmation method must be bearer, got '{0}'")]
    InvalidConfirmationMethod(String),

    #[error("Subject confirmation data is missing from the assertion")]
    MissingConfirmationData,

    #[error("Subject confirmation data is not valid until {0}")]
    NotYetValid(String),

    #[error("Subject confirmation data must contain NotOnOrAfter")]
    MissingNotOnOrAfter,

    #[error("Subject confirmation data expired at {0}")]
    Expired(String),

    #[error("Subject confirmation data must contain InResponseTo")]
    MissingInResponseTo,

    #[error("InResponseTo must match the request id: expected '{expected}', got '{actual}'")]
    InResponseToMismatch { expected: String, actual: String },

    #[error("NameID is missing from the subject of the assertion")]
    MissingNameId,

    /// Skew allowance pushes the validation window past the representable range
    #[error("Clock skew allowance is out of range")]
    ClockSkewOutOfRange,
}

/// Attribute statement schema failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeStatementError {
    /// Identity assertion without an attribute statement
    #[error("Identity assertion has no attribute statement")]
    MissingAttributeStatement,

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// Attribute that does not belong on this kind of assertion
    #[error("Attribute '{attribute}' is not allowed on an {role} assertion")]
    UnexpectedAttribute { attribute: String, role: String },

    #[error("Attribute '{0}' appears more than once")]
    DuplicateAttribute(String),

    #[error("Attribute '{0}' has no values")]
    EmptyAttribute(String),

    #[error("Attribute '{0}' must have exactly one value")]
    TooManyValues(String),

    #[error("Attribute '{attribute}' expected a {expected} value, got {actual}")]
    UnexpectedValueKind {
        attribute: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Attribute '{attribute}' has an invalid value: {reason}")]
    InvalidValue { attribute: String, reason: String },

    #[error("Attribute '{0}' has a validity interval that ends before it starts")]
    InvalidInterval(String),

    #[error("Required attribute is missing: {0}")]
    MissingAttribute(String),
}
