//! Validation Bridge
//!
//! The collaborators the assertion engine delegates to: signature
//! verification, subject confirmation checks, attribute-statement schema
//! checks and matching-dataset extraction.
//!
//! ## Architecture
//!
//! Each concern is a trait with one production implementation:
//!
//! - **Signature**: `TrustStoreSignatureVerifier` checks Ed25519 signatures against a `TrustSource`
//! - **Subject**: `BearerSubjectValidator` checks the bearer confirmation
//! - **Attributes**: `MatchingDatasetStatementValidator` checks the attribute schema
//! - **Unmarshalling**: `MatchingDatasetUnmarshaller` builds the `IdentityDataset`
//!
//! ## Usage
//!
//! ```ignore
//! use verify_bridge::{bootstrap, CapabilitiesBuilder, handlers::*};
//!
//! let capabilities = CapabilitiesBuilder::new(bootstrap())
//!     .with_signature_verifier(TrustStoreSignatureVerifier::new(trust))
//!     .with_subject_validator(BearerSubjectValidator::new().with_clock_skew(skew))
//!     .build()?;
//! ```
//!
//! Capabilities can only be assembled with the token returned by
//! `bootstrap()`, so process-wide initialization always happens first.

pub mod bridge;
pub mod error;
pub mod handlers;
pub mod types;

pub use bridge::{
    bootstrap, AttributeStatementValidator, CapabilitiesBuilder, CapabilitiesReady,
    IdentityDatasetUnmarshaller, SignatureVerifier, SubjectValidator, ValidationCapabilities,
};
pub use error::{AttributeStatementError, BridgeError, Result, SignatureError, SubjectError};
pub use types::{SignerRole, StaticTrust, TrustMaterial, TrustSource};
