use std::sync::Arc;

use apisuite_core::{CachePolicy, ClientBuilder, Result, RetryPolicy};

use super::{OmedaClient, OmedaProfile};

/// Builder for [`OmedaClient`].
#[derive(Clone, Default)]
pub struct OmedaBuilder {
    core: ClientBuilder,
}

impl OmedaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// API host, `ows.omeda.com` in production.
    pub fn host(self, host: impl Into<String>) -> Self {
        self.option("host", host)
    }

    /// Client abbreviation, used by opt-in/opt-out queues.
    pub fn client(self, client: impl Into<String>) -> Self {
        self.option("client", client)
    }

    pub fn brand(self, brand: impl Into<String>) -> Self {
        self.option("brand", brand)
    }

    pub fn app_id(self, app_id: impl Into<String>) -> Self {
        self.option("appid", app_id)
    }

    pub fn input_id(self, input_id: impl Into<String>) -> Self {
        self.option("inputid", input_id)
    }

    pub fn build(self) -> Result<OmedaClient> {
        let orchestrator = self.core.build_orchestrator(
            Arc::new(OmedaProfile),
            CachePolicy::disabled(),
            RetryPolicy::default(),
        )?;
        Ok(OmedaClient::new(orchestrator))
    }
}

impl_builder_common!(OmedaBuilder);
