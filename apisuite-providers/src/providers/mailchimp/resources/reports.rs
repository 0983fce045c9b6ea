use std::any::Any;
use std::sync::Arc;

use apisuite_core::{Resource, Result};
use serde_json::{Value, json};

use super::{MailchimpApi, body};

/// `reports/*` endpoints.
pub struct Reports {
    api: Arc<MailchimpApi>,
}

impl Reports {
    pub(crate) fn new(api: Arc<MailchimpApi>) -> Self {
        Self { api }
    }

    pub async fn summary(&self, cid: &str) -> Result<Value> {
        self.api
            .call(&self.endpoint("summary"), body! {"cid" => cid})
            .await
    }

    /// Opens for a campaign, paged; the API sorts by `opened` ascending by default.
    pub async fn opened(
        &self,
        cid: &str,
        start: u32,
        limit: u32,
        sort_field: Option<&str>,
        sort_dir: Option<&str>,
    ) -> Result<Value> {
        let request = body! {
            "cid" => cid,
            "opts" => json!({
                "start": start,
                "limit": limit,
                "sort_field": sort_field.unwrap_or("opened"),
                "sort_dir": sort_dir.unwrap_or("ASC"),
            }),
        };
        self.api.call(&self.endpoint("opened"), request).await
    }
}

impl Resource for Reports {
    fn key(&self) -> &'static str {
        "reports"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
