//! Small shared utilities.

pub mod cancel;

pub use cancel::{CancelHandle, ExecuteOptions};
