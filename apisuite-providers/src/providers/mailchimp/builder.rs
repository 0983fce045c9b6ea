use std::sync::Arc;

use apisuite_core::{ApiSuiteError, CachePolicy, ClientBuilder, Result, RetryPolicy};

use super::{DEFAULT_BATCH_SIZE, MailchimpClient, MailchimpProfile};

/// Builder for [`MailchimpClient`].
#[derive(Clone, Default)]
pub struct MailchimpBuilder {
    core: ClientBuilder,
}

impl MailchimpBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data-center host, e.g. `us4.api.mailchimp.com`.
    pub fn host(self, host: impl Into<String>) -> Self {
        self.option("host", host)
    }

    pub fn api_key(self, api_key: impl Into<String>) -> Self {
        self.option("apikey", api_key)
    }

    pub fn batch_size(self, batch_size: usize) -> Self {
        self.option("batch_size", batch_size.to_string())
    }

    pub fn build(self) -> Result<MailchimpClient> {
        let batch_size = match self.core.config.get("batch_size") {
            None => DEFAULT_BATCH_SIZE,
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| {
                    ApiSuiteError::InvalidParameter(format!(
                        "batch_size must be a positive integer, got '{raw}'"
                    ))
                })?,
        };
        let orchestrator = self.core.build_orchestrator(
            Arc::new(MailchimpProfile),
            CachePolicy::disabled(),
            RetryPolicy::default(),
        )?;
        Ok(MailchimpClient::new(orchestrator, batch_size))
    }
}

impl_builder_common!(MailchimpBuilder);
