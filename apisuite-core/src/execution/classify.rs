//! Response classification.
//!
//! Maps one completed exchange onto a `ClassifiedOutcome`:
//! - [200,300): decode per the request's format; vendor failure flags become client errors
//! - [400,500): client error with the vendor's error list
//! - >= 500: server error with a generic message
//! - anything else (1xx, 3xx): server error, since no payload can be trusted

use serde_json::Value;

use crate::profile::ApiProfile;
use crate::types::{ApiResponse, ClassifiedOutcome, RequestDescriptor, ResponseFormat};

pub const UNKNOWN_CLIENT_ERROR: &str = "An unknown client-side error has occurred.";
pub const UNKNOWN_SERVER_ERROR: &str = "An unknown server-side error has occurred.";

fn base_error(request: &RequestDescriptor) -> String {
    format!(
        "Unable to complete API request \"{}\" with errors:",
        request.request_uri()
    )
}

/// Classifies `response`, filling `response.parsed` when the body decodes.
pub fn classify(
    profile: &dyn ApiProfile,
    request: &RequestDescriptor,
    response: &mut ApiResponse,
) -> ClassifiedOutcome {
    let base = base_error(request);
    let status = response.status;

    if response.is_success() {
        return match request.format() {
            ResponseFormat::Text => {
                let payload = Value::String(response.body.clone());
                response.parsed = Some(payload.clone());
                ClassifiedOutcome::Success(payload)
            }
            ResponseFormat::Json => match serde_json::from_str::<Value>(&response.body) {
                Ok(payload @ (Value::Object(_) | Value::Array(_))) => {
                    response.parsed = Some(payload.clone());
                    match profile.failure_indicator(&payload) {
                        Some(failure) => ClassifiedOutcome::ClientError {
                            status,
                            message: format!("{base} {}", failure.message),
                            errors: failure.errors,
                        },
                        None => ClassifiedOutcome::Success(payload),
                    }
                }
                _ => ClassifiedOutcome::ParseError(format!(
                    "{base} Unable to parse the response body."
                )),
            },
        };
    }

    if response.is_client_error() {
        let errors = match serde_json::from_str::<Value>(&response.body) {
            Ok(payload) => {
                let errors = profile.client_errors(&payload);
                response.parsed = Some(payload);
                errors
            }
            Err(_) => Vec::new(),
        };
        let message = if errors.is_empty() {
            format!("{base} {UNKNOWN_CLIENT_ERROR}")
        } else {
            format!("{base} {}", errors.join(", "))
        };
        return ClassifiedOutcome::ClientError {
            status,
            message,
            errors,
        };
    }

    if response.is_server_error() {
        return ClassifiedOutcome::ServerError {
            status,
            message: format!("{base} {UNKNOWN_SERVER_ERROR}"),
        };
    }

    ClassifiedOutcome::ServerError {
        status,
        message: format!("{base} Unexpected response status {status}."),
    }
}
