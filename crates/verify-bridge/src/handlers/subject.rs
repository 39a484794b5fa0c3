//! Bearer Subject Validator
//!
//! Checks the subject confirmation of an assertion delivered to this
//! relying party.

use chrono::{DateTime, Duration, Utc};

use verify_core::{Subject, assertion::BEARER_CONFIRMATION_METHOD};

use crate::bridge::SubjectValidator;
use crate::error::SubjectError;

/// Where the validator reads the current time from
#[derive(Debug, Clone, Copy)]
enum Clock {
    System,
    Fixed(DateTime<Utc>),
}

/// Validates bearer subject confirmations
///
/// Checks, in order: subject present, exactly one confirmation, bearer
/// method, confirmation data present, not before, not on or after, in
/// response to, NameID present.
#[derive(Debug, Clone)]
pub struct BearerSubjectValidator {
    clock: Clock,
    clock_skew: Duration,
}

impl BearerSubjectValidator {
    /// Validator using the system clock and no skew allowance
    pub fn new() -> Self {
        Self {
            clock: Clock::System,
            clock_skew: Duration::zero(),
        }
    }

    /// Allow this much disagreement between our clock and the issuer's
    pub fn with_clock_skew(mut self, skew: Duration) -> Self {
        self.clock_skew = skew;
        self
    }

    /// Evaluate time checks at a fixed instant
    pub fn at_fixed_time(mut self, now: DateTime<Utc>) -> Self {
        self.clock = Clock::Fixed(now);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        match self.clock {
            Clock::System => Utc::now(),
            Clock::Fixed(now) => now,
        }
    }
}

impl Default for BearerSubjectValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl SubjectValidator for BearerSubjectValidator {
    fn validate(
        &self,
        subject: Option<&Subject>,
        expected_in_response_to: &str,
    ) -> Result<(), SubjectError> {
        let subject = subject.ok_or(SubjectError::MissingSubject)?;

        let [confirmation] = subject.confirmations.as_slice() else {
            return Err(SubjectError::ExactlyOneConfirmationExpected(
                subject.confirmations.len(),
            ));
        };

        if confirmation.method != BEARER_CONFIRMATION_METHOD {
            return Err(SubjectError::InvalidConfirmationMethod(
                confirmation.method.clone(),
            ));
        }

        let data = confirmation
            .data
            .as_ref()
            .ok_or(SubjectError::MissingConfirmationData)?;

        let now = self.now();
        let latest = now
            .checked_add_signed(self.clock_skew)
            .ok_or(SubjectError::ClockSkewOutOfRange)?;
        let earliest = now
            .checked_sub_signed(self.clock_skew)
            .ok_or(SubjectError::ClockSkewOutOfRange)?;

        if let Some(not_before) = data.not_before {
            if not_before > latest {
                return Err(SubjectError::NotYetValid(not_before.to_rfc3339()));
            }
        }

        let not_on_or_after = data
            .not_on_or_after
            .ok_or(SubjectError::MissingNotOnOrAfter)?;
        if earliest >= not_on_or_after {
            return Err(SubjectError::Expired(not_on_or_after.to_rfc3339()));
        }

        let in_response_to = data
            .in_response_to
            .as_deref()
            .ok_or(SubjectError::MissingInResponseTo)?;
        if in_response_to != expected_in_response_to {
            return Err(SubjectError::InResponseToMismatch {
                expected: expected_in_response_to.to_string(),
                actual: in_response_to.to_string(),
            });
        }

        match subject.name_id.as_deref() {
            Some(name_id) if !name_id.trim().is_empty() => Ok(()),
            _ => Err(SubjectError::MissingNameId),
        }
    }
}
