//! Property-Based Tests for the pure building blocks
//!
//! 1. TRANSLATION: output mirrors input (order, flags, intervals)
//! 2. RESOLUTION: unknown contexts are rejected with their raw value
//! 3. CLASSIFICATION: total, decided only by authn statements
//!
//! Uses proptest for property-based testing with arbitrary inputs.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use verify_core::{
    assurance, classify, translate, Address, AssertionBuilder, AssertionRole, AssuranceLevel,
    AuthnStatement, IdentityDataset, TimedAttribute, Validity,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn instant(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0).unwrap()
}

fn interval_strategy() -> impl Strategy<Value = Validity> {
    (0i64..2_000_000_000, 0i64..100_000_000, any::<bool>()).prop_map(|(from, span, open)| {
        if open {
            Validity::since(instant(from))
        } else {
            Validity::between(instant(from), instant(from + span)).unwrap()
        }
    })
}

fn name_strategy() -> impl Strategy<Value = TimedAttribute<String>> {
    ("[A-Z][a-z]{1,12}", any::<bool>(), interval_strategy())
        .prop_map(|(value, verified, validity)| TimedAttribute::new(value, verified, validity))
}

fn address_strategy() -> impl Strategy<Value = Address> {
    (
        prop::collection::vec("[0-9]{1,3} [A-Z][a-z]{2,10} Street", 1..4),
        prop::option::of("[A-Z]{1,2}[0-9] [0-9][A-Z]{2}"),
        any::<bool>(),
        interval_strategy(),
    )
        .prop_map(|(lines, post_code, verified, validity)| {
            let address = Address::new(lines, verified, validity);
            match post_code {
                Some(code) => address.with_post_code(code),
                None => address,
            }
        })
}

fn dataset_strategy() -> impl Strategy<Value = IdentityDataset> {
    (
        name_strategy(),
        prop::option::of(name_strategy()),
        prop::collection::vec(name_strategy(), 0..6),
        prop::collection::vec(address_strategy(), 0..4),
    )
        .prop_map(|(first_name, middle_names, surnames, addresses)| IdentityDataset {
            first_name,
            middle_names,
            surnames,
            gender: None,
            date_of_birth: TimedAttribute::current(
                NaiveDate::from_ymd_opt(1980, 5, 17).unwrap(),
                true,
            ),
            addresses,
        })
}

// =============================================================================
// PROPERTY 1: TRANSLATION mirrors the dataset
// =============================================================================

proptest! {
    /// Every surname survives translation in the same position with the same flags
    #[test]
    fn prop_translation_preserves_surnames(dataset in dataset_strategy()) {
        let expected = dataset.surnames.clone();
        let attributes = translate(dataset);

        prop_assert_eq!(attributes.surnames.len(), expected.len());
        for (out, input) in attributes.surnames.iter().zip(expected.iter()) {
            prop_assert_eq!(&out.value, &input.value);
            prop_assert_eq!(out.verified, input.verified);
            prop_assert_eq!(out.from, input.validity.from);
            prop_assert_eq!(out.to, input.validity.to);
        }
    }

    /// Addresses keep order, lines and postcodes
    #[test]
    fn prop_translation_preserves_addresses(dataset in dataset_strategy()) {
        let expected = dataset.addresses.clone();
        let attributes = translate(dataset);

        prop_assert_eq!(attributes.addresses.len(), expected.len());
        for (out, input) in attributes.addresses.iter().zip(expected.iter()) {
            prop_assert_eq!(&out.lines, &input.lines);
            prop_assert_eq!(&out.post_code, &input.post_code);
            prop_assert_eq!(out.verified, input.verified);
        }
    }

    /// Optional attributes stay optional
    #[test]
    fn prop_translation_keeps_optionality(dataset in dataset_strategy()) {
        let had_middle_names = dataset.middle_names.is_some();
        let first_name = dataset.first_name.clone();
        let attributes = translate(dataset);

        prop_assert_eq!(attributes.middle_names.is_some(), had_middle_names);
        prop_assert!(attributes.gender.is_none());
        prop_assert_eq!(attributes.first_name.value, first_name.value);
    }
}

// =============================================================================
// PROPERTY 2: RESOLUTION is total over the table and rejects everything else
// =============================================================================

proptest! {
    /// Any string outside the table is rejected with the raw value intact
    #[test]
    fn prop_unknown_context_is_rejected(raw in ".*") {
        prop_assume!(AssuranceLevel::ALL.iter().all(|l| l.context_class_ref() != raw));

        let err = assurance::resolve(&raw).unwrap_err();
        prop_assert_eq!(err.raw, raw);
    }

    /// Ordering of levels follows the table order
    #[test]
    fn prop_level_order_matches_table(a in 0usize..4, b in 0usize..4) {
        let left = AssuranceLevel::ALL[a];
        let right = AssuranceLevel::ALL[b];
        prop_assert_eq!(left.meets(right), a >= b);
    }
}

// =============================================================================
// PROPERTY 3: CLASSIFICATION is total
// =============================================================================

proptest! {
    /// Role depends only on whether any authn statement is present
    #[test]
    fn prop_classification_by_authn_statements(
        statements in 0usize..4,
        with_attributes in any::<bool>(),
    ) {
        let mut builder = AssertionBuilder::new().id("a").issuer("idp");
        for _ in 0..statements {
            builder = builder.authn_statement(AuthnStatement::with_context("ctx"));
        }
        if with_attributes {
            builder = builder.attribute(verify_core::RawAttribute::new("MDS_firstname", vec![]));
        }

        let expected = if statements > 0 {
            AssertionRole::AuthnAssertion
        } else {
            AssertionRole::IdentityAssertion
        };
        prop_assert_eq!(classify(&builder.build()), expected);
    }

    /// Validity construction accepts exactly the ordered intervals
    #[test]
    fn prop_validity_requires_order(from in 0i64..2_000_000_000, to in 0i64..2_000_000_000) {
        let result = Validity::between(instant(from), instant(to));
        prop_assert_eq!(result.is_ok(), from <= to);
    }
}
