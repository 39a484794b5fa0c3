//! Hub response status codes and translated response bodies

use serde::{Deserialize, Serialize};

use crate::assurance::AssuranceLevel;
use crate::translate::CanonicalAttributes;

pub const STATUS_SUCCESS: &str = "urn:oasis:names:tc:SAML:2.0:status:Success";
pub const STATUS_REQUESTER: &str = "urn:oasis:names:tc:SAML:2.0:status:Requester";
pub const STATUS_RESPONDER: &str = "urn:oasis:names:tc:SAML:2.0:status:Responder";
pub const STATUS_AUTHN_FAILED: &str = "urn:oasis:names:tc:SAML:2.0:status:AuthnFailed";
pub const STATUS_NO_AUTHN_CONTEXT: &str = "urn:oasis:names:tc:SAML:2.0:status:NoAuthnContext";
pub const STATUS_NO_PASSIVE: &str = "urn:oasis:names:tc:SAML:2.0:status:NoPassive";

/// Top-level status code of a hub response, with its optional sub-status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode {
    pub value: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_status: Option<String>,
}

impl StatusCode {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            sub_status: None,
        }
    }

    pub fn with_sub_status(mut self, sub_status: impl Into<String>) -> Self {
        self.sub_status = Some(sub_status.into());
        self
    }
}

/// Outcome scenario reported to the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scenario {
    IdentityVerified,
    Cancellation,
    AuthenticationFailed,
    NoAuthentication,
    RequestError,
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Scenario::IdentityVerified => "IDENTITY_VERIFIED",
            Scenario::Cancellation => "CANCELLATION",
            Scenario::AuthenticationFailed => "AUTHENTICATION_FAILED",
            Scenario::NoAuthentication => "NO_AUTHENTICATION",
            Scenario::RequestError => "REQUEST_ERROR",
        };
        write!(f, "{}", name)
    }
}

/// A verified identity, the terminal success artifact of the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedIdentity {
    pub scenario: Scenario,
    /// Persistent identifier of the subject
    pub pid: String,
    pub level_of_assurance: AssuranceLevel,
    pub attributes: CanonicalAttributes,
}

/// Response body handed to the API layer
///
/// Identity fields are only present for `IDENTITY_VERIFIED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedResponseBody {
    pub scenario: Scenario,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_of_assurance: Option<AssuranceLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<CanonicalAttributes>,
}

impl TranslatedResponseBody {
    /// Body for a scenario that carries no identity
    pub fn non_identity(scenario: Scenario) -> Self {
        Self {
            scenario,
            pid: None,
            level_of_assurance: None,
            attributes: None,
        }
    }
}

impl From<TranslatedIdentity> for TranslatedResponseBody {
    fn from(identity: TranslatedIdentity) -> Self {
        Self {
            scenario: identity.scenario,
            pid: Some(identity.pid),
            level_of_assurance: Some(identity.level_of_assurance),
            attributes: Some(identity.attributes),
        }
    }
}
