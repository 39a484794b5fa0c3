//! SAML assertion model
//!
//! These values are produced by the layer that decrypts and unmarshals the
//! hub's response. The engine only ever reads them. Fields that the wire
//! format makes mandatory are still `Option` here so that a missing value
//! reaches validation and is reported, instead of being lost at parse time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Subject confirmation method for bearer assertions
pub const BEARER_CONFIRMATION_METHOD: &str = "urn:oasis:names:tc:SAML:2.0:cm:bearer";

/// SAML protocol versions that can appear on an assertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SamlVersion {
    #[serde(rename = "1.0")]
    V1_0,
    #[serde(rename = "1.1")]
    V1_1,
    #[serde(rename = "2.0")]
    V2_0,
}

impl std::fmt::Display for SamlVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamlVersion::V1_0 => write!(f, "1.0"),
            SamlVersion::V1_1 => write!(f, "1.1"),
            SamlVersion::V2_0 => write!(f, "2.0"),
        }
    }
}

/// Data attached to a subject confirmation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectConfirmationData {
    /// Id of the request this assertion answers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_response_to: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_before: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_on_or_after: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
}

impl SubjectConfirmationData {
    /// Confirmation data answering `request_id`, valid until `not_on_or_after`
    pub fn for_request(request_id: impl Into<String>, not_on_or_after: DateTime<Utc>) -> Self {
        Self {
            in_response_to: Some(request_id.into()),
            not_on_or_after: Some(not_on_or_after),
            ..Default::default()
        }
    }
}

/// A subject confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectConfirmation {
    /// Confirmation method URI
    pub method: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<SubjectConfirmationData>,
}

impl SubjectConfirmation {
    /// Bearer confirmation with the given data
    pub fn bearer(data: SubjectConfirmationData) -> Self {
        Self {
            method: BEARER_CONFIRMATION_METHOD.to_string(),
            data: Some(data),
        }
    }
}

/// The subject of an assertion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// NameID value (the persistent identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_id: Option<String>,

    #[serde(default)]
    pub confirmations: Vec<SubjectConfirmation>,
}

impl Subject {
    /// Subject with a NameID and no confirmations
    pub fn new(name_id: impl Into<String>) -> Self {
        Self {
            name_id: Some(name_id.into()),
            confirmations: Vec::new(),
        }
    }

    /// Add a subject confirmation
    pub fn with_confirmation(mut self, confirmation: SubjectConfirmation) -> Self {
        self.confirmations.push(confirmation);
        self
    }
}

/// An authentication statement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthnStatement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authn_instant: Option<DateTime<Utc>>,

    /// Authentication context class reference (the assurance context)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_class_ref: Option<String>,
}

impl AuthnStatement {
    /// Statement with the given context class reference
    pub fn with_context(context_class_ref: impl Into<String>) -> Self {
        Self {
            authn_instant: Some(Utc::now()),
            context_class_ref: Some(context_class_ref.into()),
        }
    }
}

/// A verifiable text value inside an attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiableValue {
    pub value: String,

    #[serde(default)]
    pub verified: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

impl VerifiableValue {
    pub fn new(
        value: impl Into<String>,
        verified: bool,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            value: value.into(),
            verified,
            from,
            to,
        }
    }
}

/// A raw address value inside an attribute
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressValue {
    #[serde(default)]
    pub lines: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub international_post_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uprn: Option<String>,

    #[serde(default)]
    pub verified: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

/// Typed attribute value as produced by the unmarshalling layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeValue {
    PersonName(VerifiableValue),
    Date(VerifiableValue),
    Gender(VerifiableValue),
    Address(AddressValue),
    IpAddress { value: String },
}

impl AttributeValue {
    /// Short name of the value kind, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            AttributeValue::PersonName(_) => "person_name",
            AttributeValue::Date(_) => "date",
            AttributeValue::Gender(_) => "gender",
            AttributeValue::Address(_) => "address",
            AttributeValue::IpAddress { .. } => "ip_address",
        }
    }
}

/// A raw attribute: a name and its ordered values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAttribute {
    pub name: String,

    #[serde(default)]
    pub values: Vec<AttributeValue>,
}

impl RawAttribute {
    pub fn new(name: impl Into<String>, values: Vec<AttributeValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// An attribute statement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeStatement {
    #[serde(default)]
    pub attributes: Vec<RawAttribute>,
}

/// Detached signature over an assertion's signing input
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionSignature {
    /// Id of the signing key
    pub key_id: String,

    /// Raw signature bytes
    pub value: Vec<u8>,
}

impl std::fmt::Debug for AssertionSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssertionSignature")
            .field("key_id", &self.key_id)
            .field("value", &"[redacted]")
            .finish()
    }
}

/// A SAML assertion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_instant: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<SamlVersion>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,

    #[serde(default)]
    pub authn_statements: Vec<AuthnStatement>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_statement: Option<AttributeStatement>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<AssertionSignature>,
}

/// Everything in an assertion except its signature
#[derive(Serialize)]
struct SigningInput<'a> {
    id: &'a Option<String>,
    issuer: &'a Option<String>,
    issue_instant: &'a Option<DateTime<Utc>>,
    version: &'a Option<SamlVersion>,
    subject: &'a Option<Subject>,
    authn_statements: &'a [AuthnStatement],
    attribute_statement: &'a Option<AttributeStatement>,
}

impl Assertion {
    /// Assertion id for diagnostics, or an empty string when missing
    pub fn id_or_empty(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    /// Issuer entity id, if present
    pub fn issuer_value(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    /// NameID of the subject, if present
    pub fn name_id(&self) -> Option<&str> {
        self.subject.as_ref().and_then(|s| s.name_id.as_deref())
    }

    /// Raw attributes, empty when there is no attribute statement
    pub fn attributes(&self) -> &[RawAttribute] {
        self.attribute_statement
            .as_ref()
            .map(|s| s.attributes.as_slice())
            .unwrap_or_default()
    }

    /// Canonical bytes covered by the signature
    pub fn signing_input(&self) -> Result<Vec<u8>> {
        let input = SigningInput {
            id: &self.id,
            issuer: &self.issuer,
            issue_instant: &self.issue_instant,
            version: &self.version,
            subject: &self.subject,
            authn_statements: &self.authn_statements,
            attribute_statement: &self.attribute_statement,
        };
        Ok(serde_json::to_vec(&input)?)
    }
}

/// Builder for assertions
///
/// Defaults to a SAML 2.0 assertion issued now, with no subject and no
/// statements.
#[derive(Debug, Clone)]
pub struct AssertionBuilder {
    assertion: Assertion,
}

impl AssertionBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            assertion: Assertion {
                issue_instant: Some(Utc::now()),
                version: Some(SamlVersion::V2_0),
                ..Default::default()
            },
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.assertion.id = Some(id.into());
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.assertion.issuer = Some(issuer.into());
        self
    }

    pub fn issue_instant(mut self, instant: DateTime<Utc>) -> Self {
        self.assertion.issue_instant = Some(instant);
        self
    }

    pub fn version(mut self, version: SamlVersion) -> Self {
        self.assertion.version = Some(version);
        self
    }

    pub fn subject(mut self, subject: Subject) -> Self {
        self.assertion.subject = Some(subject);
        self
    }

    pub fn authn_statement(mut self, statement: AuthnStatement) -> Self {
        self.assertion.authn_statements.push(statement);
        self
    }

    /// Append an attribute, creating the attribute statement if needed
    pub fn attribute(mut self, attribute: RawAttribute) -> Self {
        self.assertion
            .attribute_statement
            .get_or_insert_with(AttributeStatement::default)
            .attributes
            .push(attribute);
        self
    }

    pub fn attribute_statement(mut self, statement: AttributeStatement) -> Self {
        self.assertion.attribute_statement = Some(statement);
        self
    }

    /// Build the assertion
    pub fn build(self) -> Assertion {
        self.assertion
    }
}

impl Default for AssertionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Assertion {
        AssertionBuilder::new()
            .id("assertion-1")
            .issuer("idp-1")
            .subject(Subject::new("pid-abc"))
            .authn_statement(AuthnStatement::with_context("ctx"))
            .build()
    }

    #[test]
    fn test_builder_defaults() {
        let assertion = AssertionBuilder::new().build();
        assert_eq!(assertion.version, Some(SamlVersion::V2_0));
        assert!(assertion.issue_instant.is_some());
        assert!(assertion.id.is_none());
        assert!(assertion.attributes().is_empty());
    }

    #[test]
    fn test_accessors() {
        let assertion = sample();
        assert_eq!(assertion.id_or_empty(), "assertion-1");
        assert_eq!(assertion.issuer_value(), Some("idp-1"));
        assert_eq!(assertion.name_id(), Some("pid-abc"));
    }

    #[test]
    fn test_signing_input_excludes_signature() {
        let unsigned = sample();
        let mut signed = unsigned.clone();
        signed.signature = Some(AssertionSignature {
            key_id: "k".into(),
            value: vec![1, 2, 3],
        });

        assert_eq!(
            unsigned.signing_input().unwrap(),
            signed.signing_input().unwrap()
        );
    }

    #[test]
    fn test_signing_input_covers_subject() {
        let original = sample();
        let mut tampered = original.clone();
        tampered.subject = Some(Subject::new("pid-xyz"));

        assert_ne!(
            original.signing_input().unwrap(),
            tampered.signing_input().unwrap()
        );
    }

    #[test]
    fn test_signature_debug_is_redacted() {
        let signature = AssertionSignature {
            key_id: "idp-key".into(),
            value: vec![0xde, 0xad],
        };
        let debug = format!("{:?}", signature);
        assert!(debug.contains("idp-key"));
        assert!(debug.contains("redacted"));
        assert!(!debug.contains("222"));
    }
}
