//! Normalized result of one orchestrated call.

use serde_json::Value;

use crate::error::{ApiSuiteError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedOutcome {
    Success(Value),
    ClientError {
        status: u16,
        message: String,
        errors: Vec<String>,
    },
    ServerError {
        status: u16,
        message: String,
    },
    ParseError(String),
    NetworkError(String),
}

impl ClassifiedOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn into_result(self) -> Result<Value> {
        match self {
            Self::Success(value) => Ok(value),
            Self::ClientError {
                status,
                message,
                errors,
            } => Err(ApiSuiteError::ClientError {
                status,
                message,
                errors,
            }),
            Self::ServerError { status, message } => {
                Err(ApiSuiteError::ServerError { status, message })
            }
            Self::ParseError(message) => Err(ApiSuiteError::ParseError(message)),
            Self::NetworkError(cause) => Err(ApiSuiteError::NetworkError(cause)),
        }
    }
}
