//! # Verify Core
//!
//! Assertion model and pure building blocks for a relying-party identity
//! broker that consumes signed assertion bundles from a federated identity
//! hub.
//!
//! ## Key Concepts
//!
//! - **Authn assertion**: proves the subject authenticated, and at which assurance level
//! - **Identity assertion**: carries the matching dataset (names, date of birth, addresses)
//! - **Assurance level**: ordered strength of authentication, resolved from the authn context
//! - **Canonical attributes**: the stable schema the matching dataset is translated into
//!
//! Everything in this crate is pure: classification, level resolution and
//! attribute translation read their inputs and never fail on shape alone.
//! Validation policy lives in `verify-engine`.

pub mod assertion;
pub mod assurance;
pub mod classify;
pub mod crypto;
pub mod error;
pub mod response;
pub mod translate;
pub mod types;

pub use assertion::{
    AddressValue, Assertion, AssertionBuilder, AssertionSignature, AttributeStatement,
    AttributeValue, AuthnStatement, RawAttribute, SamlVersion, Subject, SubjectConfirmation,
    SubjectConfirmationData, VerifiableValue,
};
pub use assurance::{resolve, AssuranceLevel, UnsupportedAssuranceLevel};
pub use classify::{classify, group_by_role, AssertionRole, RoleGroups};
pub use crypto::{KeyPair, PublicKey};
pub use error::{CoreError, Result};
pub use response::{Scenario, StatusCode, TranslatedIdentity, TranslatedResponseBody};
pub use translate::{translate, CanonicalAddress, CanonicalAttributes, VerifiableAttribute};
pub use types::{Address, Gender, IdentityDataset, TimedAttribute, Validity};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the library version
pub fn version() -> &'static str {
    VERSION
}
