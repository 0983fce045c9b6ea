//! Core request/response types shared by the orchestrator and every adapter.

pub mod http;
pub mod method;
pub mod outcome;
pub mod request;
pub mod response;

pub use http::{HttpConfig, HttpConfigBuilder};
pub use method::Method;
pub use outcome::ClassifiedOutcome;
pub use request::{Body, RequestDescriptor, RequestDescriptorBuilder, ResponseFormat};
pub use response::ApiResponse;
