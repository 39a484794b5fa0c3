//! Matching Dataset Attributes
//!
//! Schema checks for attribute statements and extraction of the matching
//! dataset from an identity assertion.

use chrono::NaiveDate;
use std::collections::HashSet;

use verify_core::{
    classify, Address, AddressValue, Assertion, AssertionRole, AttributeValue, IdentityDataset,
    TimedAttribute, Validity, VerifiableValue,
};

use crate::bridge::{AttributeStatementValidator, IdentityDatasetUnmarshaller};
use crate::error::AttributeStatementError;

pub const MDS_FIRST_NAME: &str = "MDS_firstname";
pub const MDS_MIDDLE_NAME: &str = "MDS_middlename";
pub const MDS_SURNAME: &str = "MDS_surname";
pub const MDS_GENDER: &str = "MDS_gender";
pub const MDS_DATE_OF_BIRTH: &str = "MDS_dateofbirth";
pub const MDS_CURRENT_ADDRESS: &str = "MDS_currentaddress";
pub const MDS_PREVIOUS_ADDRESS: &str = "MDS_previousaddress";
pub const TXN_IP_ADDRESS: &str = "TXN_IPaddress";

/// Wire format of date-of-birth values
const DATE_FORMAT: &str = "%Y-%m-%d";

/// What the schema allows for one attribute name
#[derive(Debug, Clone, Copy)]
struct AttributeRule {
    name: &'static str,
    kind: &'static str,
    single_valued: bool,
    allowed_on: AssertionRole,
}

const RULES: &[AttributeRule] = &[
    AttributeRule { name: MDS_FIRST_NAME, kind: "person_name", single_valued: true, allowed_on: AssertionRole::IdentityAssertion },
    AttributeRule { name: MDS_MIDDLE_NAME, kind: "person_name", single_valued: true, allowed_on: AssertionRole::IdentityAssertion },
    AttributeRule { name: MDS_SURNAME, kind: "person_name", single_valued: false, allowed_on: AssertionRole::IdentityAssertion },
    AttributeRule { name: MDS_GENDER, kind: "gender", single_valued: true, allowed_on: AssertionRole::IdentityAssertion },
    AttributeRule { name: MDS_DATE_OF_BIRTH, kind: "date", single_valued: true, allowed_on: AssertionRole::IdentityAssertion },
    AttributeRule { name: MDS_CURRENT_ADDRESS, kind: "address", single_valued: false, allowed_on: AssertionRole::IdentityAssertion },
    AttributeRule { name: MDS_PREVIOUS_ADDRESS, kind: "address", single_valued: false, allowed_on: AssertionRole::IdentityAssertion },
    AttributeRule { name: TXN_IP_ADDRESS, kind: "ip_address", single_valued: true, allowed_on: AssertionRole::AuthnAssertion },
];

fn rule_for(name: &str) -> Option<&'static AttributeRule> {
    RULES.iter().find(|rule| rule.name == name)
}

fn interval_error(attribute: &str) -> AttributeStatementError {
    AttributeStatementError::InvalidInterval(attribute.to_string())
}

fn validity(attribute: &str, value: &VerifiableValue) -> Result<Validity, AttributeStatementError> {
    Validity::new(value.from, value.to).map_err(|_| interval_error(attribute))
}

fn parse_date(attribute: &str, raw: &str) -> Result<NaiveDate, AttributeStatementError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| AttributeStatementError::InvalidValue {
        attribute: attribute.to_string(),
        reason: format!("expected a {} date", DATE_FORMAT),
    })
}

fn parse_gender(attribute: &str, raw: &str) -> Result<verify_core::Gender, AttributeStatementError> {
    raw.parse()
        .map_err(|reason| AttributeStatementError::InvalidValue {
            attribute: attribute.to_string(),
            reason,
        })
}

/// Validates attribute statements against the matching-dataset schema
///
/// An identity assertion must carry an attribute statement with at least a
/// first name and a date of birth. An authn assertion may carry only the
/// transaction attributes.
#[derive(Debug, Clone, Default)]
pub struct MatchingDatasetStatementValidator;

impl MatchingDatasetStatementValidator {
    pub fn new() -> Self {
        Self
    }

    fn check_value(
        rule: &AttributeRule,
        value: &AttributeValue,
    ) -> Result<(), AttributeStatementError> {
        if value.kind() != rule.kind {
            return Err(AttributeStatementError::UnexpectedValueKind {
                attribute: rule.name.to_string(),
                expected: rule.kind,
                actual: value.kind(),
            });
        }

        match value {
            AttributeValue::PersonName(v) => {
                validity(rule.name, v)?;
            }
            AttributeValue::Gender(v) => {
                validity(rule.name, v)?;
                parse_gender(rule.name, &v.value)?;
            }
            AttributeValue::Date(v) => {
                validity(rule.name, v)?;
                parse_date(rule.name, &v.value)?;
            }
            AttributeValue::Address(a) => {
                Validity::new(a.from, a.to).map_err(|_| interval_error(rule.name))?;
            }
            AttributeValue::IpAddress { .. } => {}
        }
        Ok(())
    }
}

impl AttributeStatementValidator for MatchingDatasetStatementValidator {
    fn validate(&self, assertion: &Assertion) -> Result<(), AttributeStatementError> {
        let role = classify(assertion);

        let statement = match (role, assertion.attribute_statement.as_ref()) {
            (_, Some(statement)) => statement,
            (AssertionRole::IdentityAssertion, None) => {
                return Err(AttributeStatementError::MissingAttributeStatement)
            }
            (AssertionRole::AuthnAssertion, None) => return Ok(()),
        };

        let mut seen = HashSet::new();
        for attribute in &statement.attributes {
            let rule = rule_for(&attribute.name)
                .ok_or_else(|| AttributeStatementError::UnknownAttribute(attribute.name.clone()))?;

            if rule.allowed_on != role {
                return Err(AttributeStatementError::UnexpectedAttribute {
                    attribute: attribute.name.clone(),
                    role: role.to_string(),
                });
            }
            if !seen.insert(rule.name) {
                return Err(AttributeStatementError::DuplicateAttribute(attribute.name.clone()));
            }
            if attribute.values.is_empty() {
                return Err(AttributeStatementError::EmptyAttribute(attribute.name.clone()));
            }
            if rule.single_valued && attribute.values.len() > 1 {
                return Err(AttributeStatementError::TooManyValues(attribute.name.clone()));
            }

            for value in &attribute.values {
                Self::check_value(rule, value)?;
            }
        }

        if role == AssertionRole::IdentityAssertion {
            for required in [MDS_FIRST_NAME, MDS_DATE_OF_BIRTH] {
                if !seen.contains(required) {
                    return Err(AttributeStatementError::MissingAttribute(required.to_string()));
                }
            }
        }

        Ok(())
    }
}

/// Builds an `IdentityDataset` from a validated identity assertion
///
/// Addresses come out current first, then previous, each group in the order
/// received. Attributes outside the matching dataset are ignored.
#[derive(Debug, Clone, Default)]
pub struct MatchingDatasetUnmarshaller;

impl MatchingDatasetUnmarshaller {
    pub fn new() -> Self {
        Self
    }
}

fn person_name(
    attribute: &str,
    value: &AttributeValue,
) -> Result<TimedAttribute<String>, AttributeStatementError> {
    match value {
        AttributeValue::PersonName(v) => Ok(TimedAttribute::new(
            v.value.clone(),
            v.verified,
            validity(attribute, v)?,
        )),
        other => Err(kind_mismatch(attribute, "person_name", other)),
    }
}

fn address(attribute: &str, value: &AttributeValue) -> Result<Address, AttributeStatementError> {
    let AttributeValue::Address(AddressValue {
        lines,
        post_code,
        international_post_code,
        uprn,
        verified,
        from,
        to,
    }) = value
    else {
        return Err(kind_mismatch(attribute, "address", value));
    };

    let validity = Validity::new(*from, *to).map_err(|_| interval_error(attribute))?;
    let mut address = Address::new(lines.clone(), *verified, validity);
    address.post_code = post_code.clone();
    address.international_post_code = international_post_code.clone();
    address.uprn = uprn.clone();
    Ok(address)
}

fn kind_mismatch(attribute: &str, expected: &'static str, actual: &AttributeValue) -> AttributeStatementError {
    AttributeStatementError::UnexpectedValueKind {
        attribute: attribute.to_string(),
        expected,
        actual: actual.kind(),
    }
}

impl IdentityDatasetUnmarshaller for MatchingDatasetUnmarshaller {
    fn unmarshal(&self, assertion: &Assertion) -> Result<IdentityDataset, AttributeStatementError> {
        let mut first_name = None;
        let mut middle_names = None;
        let mut surnames = Vec::new();
        let mut gender = None;
        let mut date_of_birth = None;
        let mut current_addresses = Vec::new();
        let mut previous_addresses = Vec::new();

        for attribute in assertion.attributes() {
            let name = attribute.name.as_str();
            match name {
                MDS_FIRST_NAME => {
                    if let Some(value) = attribute.values.first() {
                        first_name = Some(person_name(name, value)?);
                    }
                }
                MDS_MIDDLE_NAME => {
                    if let Some(value) = attribute.values.first() {
                        middle_names = Some(person_name(name, value)?);
                    }
                }
                MDS_SURNAME => {
                    for value in &attribute.values {
                        surnames.push(person_name(name, value)?);
                    }
                }
                MDS_GENDER => match attribute.values.first() {
                    Some(AttributeValue::Gender(v)) => {
                        gender = Some(TimedAttribute::new(
                            parse_gender(name, &v.value)?,
                            v.verified,
                            validity(name, v)?,
                        ));
                    }
                    Some(other) => return Err(kind_mismatch(name, "gender", other)),
                    None => {}
                },
                MDS_DATE_OF_BIRTH => match attribute.values.first() {
                    Some(AttributeValue::Date(v)) => {
                        date_of_birth = Some(TimedAttribute::new(
                            parse_date(name, &v.value)?,
                            v.verified,
                            validity(name, v)?,
                        ));
                    }
                    Some(other) => return Err(kind_mismatch(name, "date", other)),
                    None => {}
                },
                MDS_CURRENT_ADDRESS => {
                    for value in &attribute.values {
                        current_addresses.push(address(name, value)?);
                    }
                }
                MDS_PREVIOUS_ADDRESS => {
                    for value in &attribute.values {
                        previous_addresses.push(address(name, value)?);
                    }
                }
                _ => {}
            }
        }

        let mut addresses = current_addresses;
        addresses.extend(previous_addresses);

        Ok(IdentityDataset {
            first_name: first_name
                .ok_or_else(|| AttributeStatementError::MissingAttribute(MDS_FIRST_NAME.into()))?,
            middle_names,
            surnames,
            gender,
            date_of_birth: date_of_birth
                .ok_or_else(|| AttributeStatementError::MissingAttribute(MDS_DATE_OF_BIRTH.into()))?,
            addresses,
        })
    }
}
