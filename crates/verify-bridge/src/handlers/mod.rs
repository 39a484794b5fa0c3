//! Collaborator implementations

pub mod attributes;
pub mod mock;
pub mod signature;
pub mod subject;

pub use attributes::{MatchingDatasetStatementValidator, MatchingDatasetUnmarshaller};
pub use mock::{CountingUnmarshaller, MockSignatureVerifier};
pub use signature::TrustStoreSignatureVerifier;
pub use subject::BearerSubjectValidator;
