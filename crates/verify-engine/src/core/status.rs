//! Non-success status mapping

use verify_core::response::{
    STATUS_AUTHN_FAILED, STATUS_NO_AUTHN_CONTEXT, STATUS_NO_PASSIVE, STATUS_REQUESTER,
    STATUS_RESPONDER, STATUS_SUCCESS,
};
use verify_core::{Scenario, StatusCode};

use crate::error::ValidationFailure;

/// Map a non-success hub status to the scenario reported to the consumer
///
/// A success status has no non-identity scenario and is rejected, as is any
/// code combination outside the table.
pub fn map_status(status: &StatusCode) -> Result<Scenario, ValidationFailure> {
    match (status.value.as_str(), status.sub_status.as_deref()) {
        (STATUS_REQUESTER, _) => Ok(Scenario::RequestError),
        (STATUS_RESPONDER, Some(STATUS_NO_AUTHN_CONTEXT)) => Ok(Scenario::Cancellation),
        (STATUS_RESPONDER, Some(STATUS_AUTHN_FAILED)) => Ok(Scenario::AuthenticationFailed),
        (STATUS_RESPONDER, Some(STATUS_NO_PASSIVE)) => Ok(Scenario::NoAuthentication),
        (STATUS_SUCCESS, _) => Err(ValidationFailure::UnexpectedSuccessStatus),
        _ => Err(ValidationFailure::UnknownStatusCode {
            value: status.value.clone(),
            sub_status: status.sub_status.clone(),
        }),
    }
}
