//! Identity dataset types produced from a matching-dataset assertion

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Half-open validity interval `[from, to)`
///
/// An absent `from` means "since records began"; an absent `to` means the
/// value is still current.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validity {
    /// Start of validity (inclusive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,

    /// End of validity (exclusive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

impl Validity {
    /// Create a validity interval, rejecting `from > to`
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Result<Self> {
        let validity = Self { from, to };
        if !validity.is_ordered() {
            return Err(CoreError::InvalidInterval {
                from: from.map(|t| t.to_rfc3339()).unwrap_or_default(),
                to: to.map(|t| t.to_rfc3339()).unwrap_or_default(),
            });
        }
        Ok(validity)
    }

    /// Closed-on-both-ends interval
    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self> {
        Self::new(Some(from), Some(to))
    }

    /// Interval that is open at the end
    pub fn since(from: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    /// Interval with no bounds
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// `from <= to` whenever both ends are present
    pub fn is_ordered(&self) -> bool {
        match (self.from, self.to) {
            (Some(from), Some(to)) => from <= to,
            _ => true,
        }
    }

    /// Whether `instant` falls inside `[from, to)`
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let after_start = self.from.map_or(true, |from| instant >= from);
        let before_end = self.to.map_or(true, |to| instant < to);
        after_start && before_end
    }
}

/// A personal attribute with a verified flag and a validity interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedAttribute<T> {
    /// The attribute value
    pub value: T,

    /// Whether the identity provider verified this value
    pub verified: bool,

    /// When the value applied
    #[serde(flatten)]
    pub validity: Validity,
}

impl<T> TimedAttribute<T> {
    /// Create a new timed attribute
    pub fn new(value: T, verified: bool, validity: Validity) -> Self {
        Self {
            value,
            verified,
            validity,
        }
    }

    /// Create an attribute with no validity bounds
    pub fn current(value: T, verified: bool) -> Self {
        Self::new(value, verified, Validity::unbounded())
    }
}

/// Gender as asserted by the identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Female,
    Male,
    NotSpecified,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Female => write!(f, "FEMALE"),
            Gender::Male => write!(f, "MALE"),
            Gender::NotSpecified => write!(f, "NOT_SPECIFIED"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "FEMALE" => Ok(Gender::Female),
            "MALE" => Ok(Gender::Male),
            "NOT_SPECIFIED" => Ok(Gender::NotSpecified),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// A postal address from the matching dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Whether the identity provider verified this address
    pub verified: bool,

    /// When the subject lived at this address
    #[serde(flatten)]
    pub validity: Validity,

    /// UK postcode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_code: Option<String>,

    /// Postcode for addresses outside the UK
    #[serde(skip_serializing_if = "Option::is_none")]
    pub international_post_code: Option<String>,

    /// Unique property reference number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uprn: Option<String>,

    /// Address lines in order
    #[serde(default)]
    pub lines: Vec<String>,
}

impl Address {
    /// Create an address from its lines
    pub fn new(lines: Vec<String>, verified: bool, validity: Validity) -> Self {
        Self {
            verified,
            validity,
            lines,
            ..Default::default()
        }
    }

    /// Set the postcode
    pub fn with_post_code(mut self, post_code: impl Into<String>) -> Self {
        self.post_code = Some(post_code.into());
        self
    }

    /// Set the international postcode
    pub fn with_international_post_code(mut self, post_code: impl Into<String>) -> Self {
        self.international_post_code = Some(post_code.into());
        self
    }

    /// Set the UPRN
    pub fn with_uprn(mut self, uprn: impl Into<String>) -> Self {
        self.uprn = Some(uprn.into());
        self
    }
}

/// The matching dataset carried by an identity assertion
///
/// Lists keep the order in which the attributes were received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDataset {
    pub first_name: TimedAttribute<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_names: Option<TimedAttribute<String>>,

    #[serde(default)]
    pub surnames: Vec<TimedAttribute<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<TimedAttribute<Gender>>,

    pub date_of_birth: TimedAttribute<NaiveDate>,

    #[serde(default)]
    pub addresses: Vec<Address>,
}
