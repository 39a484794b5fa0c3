//! Translation of the matching dataset into the consumer-facing schema
//!
//! This is a pure remap. Verified flags and validity intervals are carried
//! across unchanged, lists keep their order and optional attributes stay
//! optional. Nothing here rejects input: the attribute statement has already
//! been validated by the time a dataset exists.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Address, Gender, IdentityDataset, TimedAttribute};

/// A translated attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableAttribute<T> {
    pub value: T,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

impl<T> From<TimedAttribute<T>> for VerifiableAttribute<T> {
    fn from(attribute: TimedAttribute<T>) -> Self {
        Self {
            value: attribute.value,
            verified: attribute.verified,
            from: attribute.validity.from,
            to: attribute.validity.to,
        }
    }
}

/// A translated address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalAddress {
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub international_post_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uprn: Option<String>,
    pub lines: Vec<String>,
}

impl From<Address> for CanonicalAddress {
    fn from(address: Address) -> Self {
        Self {
            verified: address.verified,
            from: address.validity.from,
            to: address.validity.to,
            post_code: address.post_code,
            international_post_code: address.international_post_code,
            uprn: address.uprn,
            lines: address.lines,
        }
    }
}

/// The stable output attribute schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalAttributes {
    pub first_name: VerifiableAttribute<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_names: Option<VerifiableAttribute<String>>,
    pub surnames: Vec<VerifiableAttribute<String>>,
    pub date_of_birth: VerifiableAttribute<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<VerifiableAttribute<Gender>>,
    pub addresses: Vec<CanonicalAddress>,
}

/// Translate a matching dataset into canonical attributes
pub fn translate(dataset: IdentityDataset) -> CanonicalAttributes {
    CanonicalAttributes {
        first_name: dataset.first_name.into(),
        middle_names: dataset.middle_names.map(Into::into),
        surnames: dataset.surnames.into_iter().map(Into::into).collect(),
        date_of_birth: dataset.date_of_birth.into(),
        gender: dataset.gender.map(Into::into),
        addresses: dataset.addresses.into_iter().map(Into::into).collect(),
    }
}
