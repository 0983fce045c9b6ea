//! Error Handling Module
//!
//! This module provides the error taxonomy shared by every adapter:
//! - Core error types (`ApiSuiteError`, `ErrorCategory`)
//! - Type conversions from common error types
//!
//! # Example
//!
//! ```rust,ignore
//! use apisuite_core::error::{ApiSuiteError, ErrorCategory};
//!
//! let error = ApiSuiteError::client_error(404, "Not found", vec![]);
//! assert_eq!(error.category(), ErrorCategory::Client);
//! assert!(!error.is_retryable());
//! ```

mod conversions;
pub mod types;

pub use types::*;
