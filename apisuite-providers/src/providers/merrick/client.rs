use apisuite_core::{Method, Orchestrator, Result};
use serde_json::{Value, json};

use super::MerrickBuilder;
use crate::common;

pub struct MerrickClient {
    orchestrator: Orchestrator,
}

impl_api_client!(MerrickClient, cacheable);

impl MerrickClient {
    pub fn builder() -> MerrickBuilder {
        MerrickBuilder::new()
    }

    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    /// Channels by id.
    ///
    /// A single id is fetched by path and its payload re-keyed as
    /// `{status, channel: {id: ...}}` so both shapes read the same way.
    pub async fn channel_lookup_by_id<I, S>(&self, channel_ids: I) -> Result<Value>
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let ids = common::id_list(channel_ids, "channel id")?;
        if let [single] = ids.as_slice() {
            let response = self.handle(&format!("channel/{single}"), vec![], None).await?;
            let mut channel = serde_json::Map::new();
            channel.insert(single.clone(), response.get("channel").cloned().unwrap_or(Value::Null));
            return Ok(json!({
                "status": response.get("status").cloned().unwrap_or(Value::Null),
                "channel": channel,
            }));
        }
        self.handle("channel", vec![("channel_id", ids.join("|"))], None)
            .await
    }

    /// Pending company/product changes for a pubgroup; cached for a minute.
    ///
    /// A missing or non-numeric count reads as zero.
    pub async fn pending_changes_count(&self, short_name: &str) -> Result<i64> {
        let params = vec![
            ("pending", "true".to_string()),
            ("content_type", "company|product".to_string()),
            ("pubgroup", short_name.to_string()),
            ("count", "true".to_string()),
        ];
        let response = self.handle("content", params, Some(60)).await?;
        Ok(match response.get("content") {
            Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse::<f64>().map(|f| f as i64).unwrap_or(0),
            _ => 0,
        })
    }

    pub async fn section_lookup_by_id<I, S>(&self, section_ids: I) -> Result<Value>
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let ids = common::id_list(section_ids, "section id")?;
        match ids.as_slice() {
            [single] => self.handle(&format!("section/{single}"), vec![], None).await,
            many => {
                self.handle("section", vec![("section_id", many.join("|"))], None)
                    .await
            }
        }
    }

    pub async fn section_lookup_by_section_and_channel_id(
        &self,
        channel_id: impl ToString,
        section_id: impl ToString,
    ) -> Result<Value> {
        let params = vec![
            ("channel_id", channel_id.to_string()),
            ("section_id", section_id.to_string()),
        ];
        self.handle("section", params, None).await
    }

    pub async fn section_lookup_by_term_vocab_id(&self, term_vocab_id: impl ToString) -> Result<Value> {
        self.handle("section", vec![("term_vocab_id", term_vocab_id.to_string())], None)
            .await
    }

    async fn handle(
        &self,
        endpoint: &str,
        params: Vec<(&str, String)>,
        ttl: Option<u64>,
    ) -> Result<Value> {
        let request = self
            .orchestrator
            .request(Method::Get, endpoint)?
            .query_params(params)
            .build()?;
        match ttl {
            Some(ttl) => {
                let policy = self.orchestrator.cache_policy().clone().with_ttl(ttl);
                self.orchestrator.execute_cached(&request, &policy).await
            }
            None => self.orchestrator.execute_default(&request).await,
        }
    }
}
