//! Google geocoding adapter.

use std::sync::Arc;

use apisuite_core::{
    ApiProfile, CachePolicy, ClientBuilder, ClientConfig, Method, Orchestrator, Result,
    RetryPolicy,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common;

pub const DEFAULT_HOST: &str = "maps.googleapis.com";

/// A geocoded point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GeocodeProfile;

impl ApiProfile for GeocodeProfile {
    fn id(&self) -> &'static str {
        "GeoCode"
    }

    fn supported_methods(&self) -> &'static [Method] {
        &[Method::Get]
    }

    fn base_url(&self, config: &ClientConfig) -> Result<String> {
        let host = common::host(config, "host");
        let host = if host.is_empty() { DEFAULT_HOST } else { &host };
        Ok(format!("http://{host}/maps/api/geocode"))
    }
}

#[derive(Clone, Default)]
pub struct GeocodeBuilder {
    core: ClientBuilder,
}

impl GeocodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(self, host: impl Into<String>) -> Self {
        self.option("host", host)
    }

    pub fn build(self) -> Result<GeocodeClient> {
        let orchestrator = self.core.build_orchestrator(
            Arc::new(GeocodeProfile),
            CachePolicy::disabled(),
            RetryPolicy::default(),
        )?;
        Ok(GeocodeClient { orchestrator })
    }
}

impl_builder_common!(GeocodeBuilder);

pub struct GeocodeClient {
    orchestrator: Orchestrator,
}

impl_api_client!(GeocodeClient);

impl GeocodeClient {
    pub fn builder() -> GeocodeBuilder {
        GeocodeBuilder::new()
    }

    /// Geocoder response for an address given as parts (street, city, ...).
    pub async fn get_data<S: AsRef<str>>(&self, address: &[S]) -> Result<Value> {
        let address = address
            .iter()
            .map(|part| part.as_ref().trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("+");
        let request = self
            .orchestrator
            .request(Method::Get, "json")?
            .query_param("address", address)
            .query_param("sensor", "true")
            .build()?;
        self.orchestrator.execute_default(&request).await
    }

    /// Location of the first result; `None` when the lookup fails or has no geometry.
    pub async fn get_long_and_lat<S: AsRef<str>>(&self, address: &[S]) -> Option<LatLng> {
        let data = match self.get_data(address).await {
            Ok(data) => data,
            Err(error) => {
                tracing::debug!(error = %error, "geocode lookup failed");
                return None;
            }
        };
        let location = data.pointer("/results/0/geometry/location")?;
        serde_json::from_value(location.clone()).ok()
    }
}
