//! Omeda audience API adapter.
//!
//! Customer, brand and Omail endpoints. Most calls are scoped to the
//! configured brand; opt-in/opt-out queue submissions are scoped to the
//! client account instead. Every modifying call carries the input id.

mod builder;
mod client;
mod profile;

pub use builder::OmedaBuilder;
pub use client::OmedaClient;
pub use profile::OmedaProfile;

/// Production host; anything else is a staging environment.
pub const PRODUCTION_HOST: &str = "ows.omeda.com";
