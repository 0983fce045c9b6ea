//! Retry module
//! - policy.rs: method-gated retries that surface the first failure

pub mod policy;

pub use policy::*;
