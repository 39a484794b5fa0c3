//! Per-assertion validation and cross-assertion consistency
//!
//! These checks gate every identity the engine releases. Each one fails
//! fast with its own `ValidationFailure` variant.

use tracing::warn;

use verify_bridge::{SignerRole, ValidationCapabilities};
use verify_core::{Assertion, SamlVersion};

use crate::error::ValidationFailure;

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Validate one assertion's structure, signature, subject and attributes
///
/// Checks run in a fixed order and stop at the first failure:
/// 1. issue instant present
/// 2. id present and non-blank
/// 3. issuer present and non-blank
/// 4. version present and equal to 2.0
/// 5. signature valid for `role`
/// 6. subject confirmation answers `expected_in_response_to`
/// 7. attribute statement well-formed
///
/// # Security
/// Both assertions of a response must pass this before any of their content
/// is trusted.
pub fn validate_assertion(
    assertion: &Assertion,
    expected_in_response_to: &str,
    role: SignerRole,
    capabilities: &ValidationCapabilities,
) -> Result<(), ValidationFailure> {
    if assertion.issue_instant.is_none() {
        return Err(ValidationFailure::MissingIssueInstant);
    }

    if is_blank(assertion.id.as_deref()) {
        return Err(ValidationFailure::MissingId);
    }
    let assertion_id = assertion.id_or_empty();

    if is_blank(assertion.issuer_value()) {
        return Err(ValidationFailure::MissingIssuer {
            assertion_id: assertion_id.to_string(),
        });
    }

    match assertion.version {
        None => {
            return Err(ValidationFailure::MissingVersion {
                assertion_id: assertion_id.to_string(),
            })
        }
        Some(SamlVersion::V2_0) => {}
        Some(_) => {
            return Err(ValidationFailure::IllegalVersion {
                assertion_id: assertion_id.to_string(),
            })
        }
    }

    capabilities
        .signature
        .verify(assertion, role)
        .map_err(|source| {
            warn!(
                assertion_id,
                issuer = assertion.issuer_value(),
                role = %role,
                error = %source,
                "SECURITY: Assertion signature rejected"
            );
            ValidationFailure::InvalidSignature {
                assertion_id: assertion_id.to_string(),
                source,
            }
        })?;

    capabilities
        .subject
        .validate(assertion.subject.as_ref(), expected_in_response_to)
        .map_err(|source| {
            warn!(
                assertion_id,
                error = %source,
                "SECURITY: Subject confirmation rejected"
            );
            ValidationFailure::InvalidSubject {
                assertion_id: assertion_id.to_string(),
                source,
            }
        })?;

    capabilities
        .attributes
        .validate(assertion)
        .map_err(|source| ValidationFailure::InvalidAttributeStatement {
            assertion_id: assertion_id.to_string(),
            source,
        })
}

/// Check that the authn and identity assertions describe the same sign-in
///
/// Issuers must be equal, then NameIDs must be equal.
pub fn check_consistency(authn: &Assertion, identity: &Assertion) -> Result<(), ValidationFailure> {
    if authn.issuer_value() != identity.issuer_value() {
        warn!(
            authn_assertion = authn.id_or_empty(),
            identity_assertion = identity.id_or_empty(),
            "SECURITY: Assertions issued by different issuers"
        );
        return Err(ValidationFailure::MismatchedIssuers);
    }

    if authn.name_id() != identity.name_id() {
        warn!(
            authn_assertion = authn.id_or_empty(),
            identity_assertion = identity.id_or_empty(),
            "SECURITY: Assertions refer to different subjects"
        );
        return Err(ValidationFailure::MismatchedPids);
    }

    Ok(())
}
