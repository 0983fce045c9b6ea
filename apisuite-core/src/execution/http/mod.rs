//! HTTP Utilities
//!
//! This module contains HTTP-related utilities:
//! - The injectable transport abstraction and its reqwest implementation
//! - Header management

pub mod client;
pub mod headers;
pub mod transport;

pub use client::ReqwestTransport;
pub use headers::*;
pub use transport::*;
