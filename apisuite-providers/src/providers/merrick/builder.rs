use std::sync::Arc;

use apisuite_core::{CachePolicy, ClientBuilder, Result, RetryPolicy};

use super::{MerrickClient, MerrickProfile};

#[derive(Clone, Default)]
pub struct MerrickBuilder {
    core: ClientBuilder,
}

impl MerrickBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(self, host: impl Into<String>) -> Self {
        self.option("host", host)
    }

    pub fn dev_access_token(self, token: impl Into<String>) -> Self {
        self.option("dev_access_token", token)
    }

    pub fn build(self) -> Result<MerrickClient> {
        let orchestrator = self.core.build_orchestrator(
            Arc::new(MerrickProfile),
            CachePolicy::forever(),
            RetryPolicy::default(),
        )?;
        Ok(MerrickClient::new(orchestrator))
    }
}

impl_builder_common!(MerrickBuilder);
