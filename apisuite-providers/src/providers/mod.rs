//! Vendor adapters, one module per API.

#[cfg(feature = "base2")]
pub mod base2;
#[cfg(feature = "base-platform")]
pub mod base_platform;
#[cfg(feature = "brightcove")]
pub mod brightcove;
#[cfg(feature = "geocode")]
pub mod geocode;
#[cfg(feature = "gigya")]
pub mod gigya;
#[cfg(feature = "mailchimp")]
pub mod mailchimp;
#[cfg(feature = "media")]
pub mod media;
#[cfg(feature = "merrick")]
pub mod merrick;
#[cfg(feature = "omeda")]
pub mod omeda;
#[cfg(feature = "openx")]
pub mod openx;
#[cfg(feature = "varnish")]
pub mod varnish;
#[cfg(feature = "youtube")]
pub mod youtube;
