//! Assurance levels and their wire-level context identifiers

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const LEVEL_1_AUTHN_CTX: &str = "urn:uk:gov:cabinet-office:tc:saml:authn-context:level1";
pub const LEVEL_2_AUTHN_CTX: &str = "urn:uk:gov:cabinet-office:tc:saml:authn-context:level2";
pub const LEVEL_3_AUTHN_CTX: &str = "urn:uk:gov:cabinet-office:tc:saml:authn-context:level3";
pub const LEVEL_4_AUTHN_CTX: &str = "urn:uk:gov:cabinet-office:tc:saml:authn-context:level4";

/// Ordered strength-of-authentication classification
///
/// The derived ordering is the assurance ordering: `Level1 < Level2 < ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AssuranceLevel {
    #[serde(rename = "LEVEL_1")]
    Level1,
    #[serde(rename = "LEVEL_2")]
    Level2,
    #[serde(rename = "LEVEL_3")]
    Level3,
    #[serde(rename = "LEVEL_4")]
    Level4,
}

const CONTEXT_TABLE: [(&str, AssuranceLevel); 4] = [
    (LEVEL_1_AUTHN_CTX, AssuranceLevel::Level1),
    (LEVEL_2_AUTHN_CTX, AssuranceLevel::Level2),
    (LEVEL_3_AUTHN_CTX, AssuranceLevel::Level3),
    (LEVEL_4_AUTHN_CTX, AssuranceLevel::Level4),
];

/// Error returned for an assurance context outside the supported table
///
/// Carries the raw value exactly as received.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Level of assurance '{raw}' is not supported")]
pub struct UnsupportedAssuranceLevel {
    pub raw: String,
}

/// Resolve a wire-level assurance context to a level
pub fn resolve(context_class_ref: &str) -> Result<AssuranceLevel, UnsupportedAssuranceLevel> {
    CONTEXT_TABLE
        .iter()
        .find(|(context, _)| *context == context_class_ref)
        .map(|(_, level)| *level)
        .ok_or_else(|| UnsupportedAssuranceLevel {
            raw: context_class_ref.to_string(),
        })
}

impl AssuranceLevel {
    /// All levels, lowest first
    pub const ALL: [AssuranceLevel; 4] = [
        AssuranceLevel::Level1,
        AssuranceLevel::Level2,
        AssuranceLevel::Level3,
        AssuranceLevel::Level4,
    ];

    /// The authn context class reference for this level
    pub fn context_class_ref(&self) -> &'static str {
        match self {
            AssuranceLevel::Level1 => LEVEL_1_AUTHN_CTX,
            AssuranceLevel::Level2 => LEVEL_2_AUTHN_CTX,
            AssuranceLevel::Level3 => LEVEL_3_AUTHN_CTX,
            AssuranceLevel::Level4 => LEVEL_4_AUTHN_CTX,
        }
    }

    /// Whether this level satisfies `minimum`
    pub fn meets(&self, minimum: AssuranceLevel) -> bool {
        *self >= minimum
    }
}

impl std::fmt::Display for AssuranceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssuranceLevel::Level1 => write!(f, "LEVEL_1"),
            AssuranceLevel::Level2 => write!(f, "LEVEL_2"),
            AssuranceLevel::Level3 => write!(f, "LEVEL_3"),
            AssuranceLevel::Level4 => write!(f, "LEVEL_4"),
        }
    }
}

impl std::str::FromStr for AssuranceLevel {
    type Err = String;

    /// Parse the level name used in configuration (`LEVEL_2`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LEVEL_1" => Ok(AssuranceLevel::Level1),
            "LEVEL_2" => Ok(AssuranceLevel::Level2),
            "LEVEL_3" => Ok(AssuranceLevel::Level3),
            "LEVEL_4" => Ok(AssuranceLevel::Level4),
            _ => Err(format!("Unknown level of assurance: {}", s)),
        }
    }
}
