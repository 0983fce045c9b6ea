//! Request execution: transport, headers, classification and the orchestrator built on top of them.

pub mod classify;
pub mod http;
pub mod orchestrator;

pub use classify::classify;
pub use orchestrator::Orchestrator;
