//! Base2 content API adapter.
//!
//! Read-mostly CMS lookups (content, publications, channels, vocabularies).
//! Responses are cached without expiry by default and every successful body
//! must carry a truthy `status` flag.

mod builder;
mod client;
mod profile;

pub use builder::Base2Builder;
pub use client::Base2Client;
pub use profile::Base2Profile;
