//! Shared fixtures: a signing identity provider and an engine that trusts it

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

use verify_bridge::handlers::{
    attributes::{MDS_CURRENT_ADDRESS, MDS_DATE_OF_BIRTH, MDS_FIRST_NAME, MDS_SURNAME},
    BearerSubjectValidator, CountingUnmarshaller, MatchingDatasetUnmarshaller,
    TrustStoreSignatureVerifier,
};
use verify_bridge::{bootstrap, CapabilitiesBuilder, SignerRole, TrustMaterial};
use verify_core::{
    AddressValue, Assertion, AssertionBuilder, AssuranceLevel, AttributeValue, AuthnStatement,
    KeyPair, RawAttribute, Subject, SubjectConfirmation, SubjectConfirmationData, VerifiableValue,
};
use verify_engine::{AssertionTranslationEngine, TrustRegistry};

pub const REQUEST_ID: &str = "req-42";
pub const ISSUER: &str = "idp-1";
pub const PID: &str = "pid-abc";

pub fn name_valid_from() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2013, 2, 22, 14, 32, 14).unwrap()
}

pub fn name_valid_to() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2015, 10, 2, 9, 32, 14).unwrap()
}

/// An identity provider with a real Ed25519 key, and an engine trusting it
pub struct Federation {
    pub idp: KeyPair,
    pub registry: Arc<TrustRegistry>,
    pub unmarshaller: CountingUnmarshaller<MatchingDatasetUnmarshaller>,
    pub engine: AssertionTranslationEngine,
}

impl Federation {
    pub fn new() -> Self {
        let idp = KeyPair::generate("idp-1-signing");
        let registry = Arc::new(TrustRegistry::new(
            TrustMaterial::new().with_key(SignerRole::Idp, idp.public_key()),
        ));
        let unmarshaller = CountingUnmarshaller::new(MatchingDatasetUnmarshaller::new());

        let capabilities = CapabilitiesBuilder::new(bootstrap())
            .with_signature_verifier(TrustStoreSignatureVerifier::new(Arc::clone(&registry)))
            .with_subject_validator(BearerSubjectValidator::new())
            .with_unmarshaller(unmarshaller.clone())
            .build()
            .expect("capabilities");

        Self {
            idp,
            registry,
            unmarshaller,
            engine: AssertionTranslationEngine::new(capabilities),
        }
    }

    pub fn sign(&self, assertion: Assertion) -> Assertion {
        self.idp.sign(assertion).expect("signing")
    }

    /// Signed authn assertion for `pid` at `level`
    pub fn authn(&self, pid: &str, level: AssuranceLevel) -> Assertion {
        self.sign(authn_assertion(pid, level))
    }

    /// Signed matching-dataset assertion for `pid`
    pub fn identity(&self, pid: &str) -> Assertion {
        self.sign(identity_assertion(pid))
    }

    /// The standard valid bundle: Bob Smith at LEVEL_2
    pub fn bundle(&self) -> Vec<Assertion> {
        self.bundle_at(AssuranceLevel::Level2)
    }

    pub fn bundle_at(&self, level: AssuranceLevel) -> Vec<Assertion> {
        vec![self.authn(PID, level), self.identity(PID)]
    }
}

pub fn confirmed_subject(pid: &str, not_on_or_after: DateTime<Utc>) -> Subject {
    Subject::new(pid).with_confirmation(SubjectConfirmation::bearer(
        SubjectConfirmationData::for_request(REQUEST_ID, not_on_or_after),
    ))
}

pub fn authn_assertion(pid: &str, level: AssuranceLevel) -> Assertion {
    AssertionBuilder::new()
        .id("authn-assertion")
        .issuer(ISSUER)
        .subject(confirmed_subject(pid, Utc::now() + Duration::minutes(5)))
        .authn_statement(AuthnStatement::with_context(level.context_class_ref()))
        .build()
}

pub fn identity_assertion(pid: &str) -> Assertion {
    AssertionBuilder::new()
        .id("identity-assertion")
        .issuer(ISSUER)
        .subject(confirmed_subject(pid, Utc::now() + Duration::minutes(5)))
        .attribute(RawAttribute::new(
            MDS_FIRST_NAME,
            vec![AttributeValue::PersonName(VerifiableValue::new(
                "Bob",
                true,
                Some(name_valid_from()),
                Some(name_valid_to()),
            ))],
        ))
        .attribute(RawAttribute::new(
            MDS_SURNAME,
            vec![AttributeValue::PersonName(VerifiableValue::new("Smith", true, None, None))],
        ))
        .attribute(RawAttribute::new(
            MDS_DATE_OF_BIRTH,
            vec![AttributeValue::Date(VerifiableValue::new("1970-01-01", true, None, None))],
        ))
        .attribute(RawAttribute::new(
            MDS_CURRENT_ADDRESS,
            vec![AttributeValue::Address(AddressValue {
                lines: vec![
                    "The White Chapel Building".into(),
                    "10 Whitechapel High Street".into(),
                ],
                post_code: Some("E1 8QS".into()),
                verified: true,
                from: Some(name_valid_from()),
                ..Default::default()
            })],
        ))
        .build()
}
