//! OpenX 3.0 ad server adapter.
//!
//! Calls are gated by a session cookie obtained through a three-legged
//! OAuth 1.0a handshake with a scripted login in the middle. The handshake
//! runs lazily on the first call and again whenever the server answers 401.

mod auth;
mod client;
mod profile;

pub use auth::OpenXAuthenticator;
pub use client::{OpenXBuilder, OpenXClient};
pub use profile::OpenXProfile;

/// Cookie carrying the access token on every gated request.
pub const SESSION_COOKIE: &str = "openx3_access_token";
