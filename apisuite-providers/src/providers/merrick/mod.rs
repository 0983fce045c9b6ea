//! Merrick content API adapter.
//!
//! Channel and section lookups plus a pending-changes counter. Responses are
//! cached; there is no in-body failure flag.

mod builder;
mod client;
mod profile;

pub use builder::MerrickBuilder;
pub use client::MerrickClient;
pub use profile::MerrickProfile;
