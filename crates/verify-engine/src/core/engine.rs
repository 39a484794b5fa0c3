//! Assertion Translation Engine
//!
//! Turns the decrypted assertions of a hub response into a verified
//! identity, or into the scenario a non-success status stands for.

use tracing::{debug, info, warn};

use verify_bridge::{SignerRole, SubjectError, ValidationCapabilities};
use verify_core::{
    group_by_role, resolve, translate, Assertion, AssuranceLevel, Scenario, StatusCode,
    TranslatedIdentity, TranslatedResponseBody,
};

use crate::core::status::map_status;
use crate::core::validation::{check_consistency, validate_assertion};
use crate::error::ValidationFailure;

/// Validates assertion bundles and translates them into identities
///
/// Stateless between calls; share one instance across threads.
#[derive(Clone)]
pub struct AssertionTranslationEngine {
    capabilities: ValidationCapabilities,
}

impl AssertionTranslationEngine {
    /// Create an engine over a capability bundle
    pub fn new(capabilities: ValidationCapabilities) -> Self {
        Self { capabilities }
    }

    /// Translate the assertions of a successful hub response
    ///
    /// Both assertions are expected to be signed by an identity provider.
    /// Nothing is unmarshalled or translated until every check has passed.
    pub fn translate_success_response(
        &self,
        assertions: &[Assertion],
        expected_in_response_to: &str,
        minimum_level: AssuranceLevel,
    ) -> Result<TranslatedIdentity, ValidationFailure> {
        let groups = group_by_role(assertions);

        let [authn] = groups.authn.as_slice() else {
            return Err(ValidationFailure::ExactlyOneAuthnAssertionExpected(
                groups.authn.len(),
            ));
        };
        let [identity] = groups.identity.as_slice() else {
            return Err(ValidationFailure::ExactlyOneIdentityAssertionExpected(
                groups.identity.len(),
            ));
        };

        debug!(
            authn_assertion = authn.id_or_empty(),
            identity_assertion = identity.id_or_empty(),
            "Classified assertions"
        );

        validate_assertion(authn, expected_in_response_to, SignerRole::Idp, &self.capabilities)?;
        validate_assertion(identity, expected_in_response_to, SignerRole::Idp, &self.capabilities)?;

        check_consistency(authn, identity)?;

        let level = Self::level_of_assurance(authn)?;
        if !level.meets(minimum_level) {
            warn!(
                assertion_id = authn.id_or_empty(),
                level = %level,
                minimum = %minimum_level,
                "Level of assurance below required minimum"
            );
            return Err(ValidationFailure::LevelOfAssuranceBelowMinimum {
                actual: level,
                minimum: minimum_level,
            });
        }

        let pid = match identity.name_id() {
            Some(name_id) if !name_id.trim().is_empty() => name_id.to_string(),
            _ => {
                warn!(
                    assertion_id = identity.id_or_empty(),
                    "SECURITY: Identity assertion has no usable NameID"
                );
                return Err(ValidationFailure::InvalidSubject {
                    assertion_id: identity.id_or_empty().to_string(),
                    source: SubjectError::MissingNameId,
                });
            }
        };

        let dataset = self
            .capabilities
            .unmarshaller
            .unmarshal(identity)
            .map_err(|source| ValidationFailure::InvalidAttributeStatement {
                assertion_id: identity.id_or_empty().to_string(),
                source,
            })?;

        info!(
            issuer = identity.issuer_value(),
            level = %level,
            "Identity verified"
        );

        Ok(TranslatedIdentity {
            scenario: Scenario::IdentityVerified,
            pid,
            level_of_assurance: level,
            attributes: translate(dataset),
        })
    }

    /// Translate a non-success hub response
    pub fn translate_non_success_response(
        &self,
        status: &StatusCode,
    ) -> Result<TranslatedResponseBody, ValidationFailure> {
        let scenario = map_status(status)?;
        info!(
            status = %status.value,
            sub_status = status.sub_status.as_deref(),
            scenario = %scenario,
            "Translated non-success response"
        );
        Ok(TranslatedResponseBody::non_identity(scenario))
    }

    fn level_of_assurance(authn: &Assertion) -> Result<AssuranceLevel, ValidationFailure> {
        let [statement] = authn.authn_statements.as_slice() else {
            return Err(ValidationFailure::ExactlyOneAuthnStatementExpected(
                authn.authn_statements.len(),
            ));
        };
        let context = statement
            .context_class_ref
            .as_deref()
            .ok_or(ValidationFailure::MissingAuthnContext)?;
        Ok(resolve(context)?)
    }
}
