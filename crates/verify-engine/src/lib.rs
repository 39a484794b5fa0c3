//! Assertion Engine
//!
//! Validates the assertions a relying party receives from the identity hub
//! and translates them into a verified identity:
//! - Classifies the assertions into one authn and one matching-dataset assertion
//! - Validates each assertion's structure, signature, subject and attributes
//! - Checks the two assertions agree on issuer and subject
//! - Resolves the level of assurance and enforces the caller's minimum
//! - Translates the matching dataset into the canonical attribute schema
//!
//! Non-success responses are mapped straight to a scenario without looking
//! at any assertion.
//!
//! ## Usage
//!
//! ```ignore
//! use verify_engine::{observability, EngineConfig};
//!
//! let config = EngineConfig::from_env()?;
//! observability::init_tracing(&config.logging);
//! let (engine, trust) = config.build_engine()?;
//!
//! let identity = engine.translate_success_response(&assertions, request_id, config.minimum_level)?;
//! ```
//!
//! The engine is synchronous and holds no per-request state. Trust material
//! can be replaced through the returned `TrustRegistry` while requests are
//! in flight.

pub mod config;
pub mod core;
pub mod error;
pub mod observability;
pub mod trust;

pub use crate::core::{check_consistency, map_status, validate_assertion, AssertionTranslationEngine};
pub use config::{EngineConfig, SubjectConfig, TrustKeysConfig, TrustedKeyConfig};
pub use error::{ConfigError, FailureCategory, ValidationFailure};
pub use observability::{init_tracing, LoggingConfig};
pub use trust::{
    resolve_trust_anchor, HubEnvironment, RefreshDelays, ResolvedTrustAnchor, TrustAnchorOverride,
    TrustRegistry,
};
