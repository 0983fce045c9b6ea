use std::sync::Arc;

use apisuite_core::{CachePolicy, ClientBuilder, Result, RetryPolicy};

use super::{Base2Client, Base2Profile};

/// Builder for [`Base2Client`].
#[derive(Clone, Default)]
pub struct Base2Builder {
    core: ClientBuilder,
}

impl Base2Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(self, host: impl Into<String>) -> Self {
        self.option("host", host)
    }

    pub fn user(self, user: impl Into<String>) -> Self {
        self.option("user", user)
    }

    pub fn key(self, key: impl Into<String>) -> Self {
        self.option("key", key)
    }

    pub fn build(self) -> Result<Base2Client> {
        let orchestrator = self.core.build_orchestrator(
            Arc::new(Base2Profile),
            CachePolicy::forever(),
            RetryPolicy::default(),
        )?;
        Ok(Base2Client::new(orchestrator))
    }
}

impl_builder_common!(Base2Builder);
