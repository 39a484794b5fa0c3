//! Assertion classification

use serde::{Deserialize, Serialize};

use crate::assertion::Assertion;

/// The role an assertion plays in a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssertionRole {
    /// Carries an authentication statement
    AuthnAssertion,
    /// Carries the matching-dataset attribute statement
    IdentityAssertion,
}

impl std::fmt::Display for AssertionRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssertionRole::AuthnAssertion => write!(f, "authn"),
            AssertionRole::IdentityAssertion => write!(f, "identity"),
        }
    }
}

/// Classify an assertion by the statements it carries
///
/// Never fails: an assertion with neither kind of statement is an identity
/// assertion and is rejected later by attribute validation.
pub fn classify(assertion: &Assertion) -> AssertionRole {
    if assertion.authn_statements.is_empty() {
        AssertionRole::IdentityAssertion
    } else {
        AssertionRole::AuthnAssertion
    }
}

/// Assertions of a bundle grouped by role, each group in input order
#[derive(Debug, Default)]
pub struct RoleGroups<'a> {
    pub authn: Vec<&'a Assertion>,
    pub identity: Vec<&'a Assertion>,
}

/// Classify every assertion in a bundle
pub fn group_by_role(assertions: &[Assertion]) -> RoleGroups<'_> {
    let mut groups = RoleGroups::default();
    for assertion in assertions {
        match classify(assertion) {
            AssertionRole::AuthnAssertion => groups.authn.push(assertion),
            AssertionRole::IdentityAssertion => groups.identity.push(assertion),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::{AssertionBuilder, AuthnStatement, RawAttribute};

    #[test]
    fn test_authn_statement_makes_authn_assertion() {
        let assertion = AssertionBuilder::new()
            .authn_statement(AuthnStatement::with_context("ctx"))
            .build();
        assert_eq!(classify(&assertion), AssertionRole::AuthnAssertion);
    }

    #[test]
    fn test_authn_statement_wins_over_attributes() {
        let assertion = AssertionBuilder::new()
            .authn_statement(AuthnStatement::with_context("ctx"))
            .attribute(RawAttribute::new("TXN_IPaddress", vec![]))
            .build();
        assert_eq!(classify(&assertion), AssertionRole::AuthnAssertion);
    }

    #[test]
    fn test_empty_assertion_is_identity() {
        let assertion = AssertionBuilder::new().build();
        assert_eq!(classify(&assertion), AssertionRole::IdentityAssertion);
    }

    #[test]
    fn test_group_by_role_preserves_order() {
        let assertions = vec![
            AssertionBuilder::new().id("i-1").build(),
            AssertionBuilder::new()
                .id("a-1")
                .authn_statement(AuthnStatement::with_context("ctx"))
                .build(),
            AssertionBuilder::new().id("i-2").build(),
        ];

        let groups = group_by_role(&assertions);
        assert_eq!(groups.authn.len(), 1);
        assert_eq!(groups.authn[0].id_or_empty(), "a-1");
        let identity_ids: Vec<_> = groups.identity.iter().map(|a| a.id_or_empty()).collect();
        assert_eq!(identity_ids, vec!["i-1", "i-2"]);
    }
}
