//! Resource handlers registered on [`MailchimpClient`](super::MailchimpClient).

mod campaigns;
mod lists;
mod reports;
mod templates;

use apisuite_core::{Method, Orchestrator, Result};
use serde_json::{Map, Value};

pub use campaigns::{CampaignQuery, Campaigns};
pub use lists::Lists;
pub use reports::Reports;
pub use templates::Templates;

/// Shared state behind the client and all of its resources.
pub(crate) struct MailchimpApi {
    pub(crate) orchestrator: Orchestrator,
    pub(crate) batch_size: usize,
}

impl MailchimpApi {
    /// POSTs `body` plus the API key to `endpoint`.
    pub(crate) async fn call(&self, endpoint: &str, mut body: Map<String, Value>) -> Result<Value> {
        let api_key = self.orchestrator.config().get_or("apikey", "").to_string();
        body.insert("apikey".into(), Value::String(api_key));
        let request = self
            .orchestrator
            .request(Method::Post, endpoint)?
            .json(Value::Object(body))
            .build()?;
        self.orchestrator.execute_default(&request).await
    }
}

/// Object literal helper for request bodies.
macro_rules! body {
    ($($key:literal => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut map = serde_json::Map::new();
        $(map.insert($key.to_string(), serde_json::json!($value));)*
        map
    }};
}
pub(crate) use body;

/// First member of `data`, or `NotFound` with `message`.
pub(crate) fn first_record(response: Value, message: String) -> Result<Value> {
    match response {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(mut items)) if !items.is_empty() => Ok(items.swap_remove(0)),
            _ => Err(apisuite_core::ApiSuiteError::NotFound(message)),
        },
        _ => Err(apisuite_core::ApiSuiteError::NotFound(message)),
    }
}
