//! Mailchimp 2.0 adapter.
//!
//! Every call is a JSON POST with the API key folded into the body.
//! Endpoints are grouped into named resources (`lists`, `campaigns`,
//! `templates`, `reports`) held in a [`ResourceRegistry`](apisuite_core::ResourceRegistry).

mod builder;
mod client;
mod profile;
pub mod resources;

pub use builder::MailchimpBuilder;
pub use client::MailchimpClient;
pub use profile::MailchimpProfile;
pub use resources::{CampaignQuery, Campaigns, Lists, Reports, Templates};

/// Records per `lists/batch-subscribe` request unless `batch_size` is configured.
pub const DEFAULT_BATCH_SIZE: usize = 500;
