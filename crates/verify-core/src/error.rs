//! Error types for the assertion model

use thiserror::Error;

/// Result type alias using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while building, signing or checking model values
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validity interval ends before it starts
    #[error("Invalid validity interval: {from} is after {to}")]
    InvalidInterval { from: String, to: String },

    /// Assertion carries no signature
    #[error("Assertion is not signed")]
    MissingSignature,

    /// Signature was produced by a different key than the one supplied
    #[error("Key id mismatch: expected '{expected}', got '{actual}'")]
    KeyIdMismatch { expected: String, actual: String },

    /// Signature bytes did not verify
    #[error("Signature verification failed: {0}")]
    SignatureInvalid(String),

    /// Key material could not be decoded
    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<ed25519_dalek::SignatureError> for CoreError {
    fn from(err: ed25519_dalek::SignatureError) -> Self {
        CoreError::SignatureInvalid(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}
