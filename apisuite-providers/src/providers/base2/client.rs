use apisuite_core::{ApiSuiteError, Method, Orchestrator, Result};
use serde_json::{Map, Value};

use super::Base2Builder;
use crate::common;

/// Base2 content API client.
pub struct Base2Client {
    orchestrator: Orchestrator,
}

impl_api_client!(Base2Client, cacheable);

impl Base2Client {
    pub fn builder() -> Base2Builder {
        Base2Builder::new()
    }

    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    /// Content by id. One id hits `content/{id}`, several are sent as `content_id=a|b`.
    pub async fn content_lookup<I, S>(&self, content_ids: I) -> Result<Value>
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let ids = common::id_list(content_ids, "content id")?;
        let (endpoint, params) = match ids.as_slice() {
            [single] => (format!("content/{single}"), vec![]),
            many => ("content".to_string(), vec![("content_id", many.join("|"))]),
        };
        let response = self.handle(&endpoint, params, None).await?;
        require_member(response, "content", "content", &ids.join(","))
    }

    /// Contract search against the sales tool.
    pub async fn contracts_lookup(&self, search: &str) -> Result<Value> {
        self.handle("contracts/search", vec![("q", search.to_string())], None)
            .await
    }

    pub async fn content_lookup_by_range(
        &self,
        pubgroup: &str,
        starting_id: u64,
        limit: u64,
    ) -> Result<Value> {
        let params = vec![
            ("pubgroup", pubgroup.to_lowercase()),
            ("start", starting_id.to_string()),
            ("count", limit.to_string()),
            ("base3", "true".to_string()),
        ];
        let response = self.handle("content", params, None).await?;
        require_member(response, "content", "content", &starting_id.to_string())
    }

    /// Field definitions for a content type, e.g. `press_release`.
    pub async fn fields_lookup(&self, content_type: &str, pubgroup: &str) -> Result<Value> {
        let params = vec![
            ("content_type", content_type.to_lowercase()),
            ("pubgroup", pubgroup.to_lowercase()),
        ];
        self.handle("field/content", params, None).await
    }

    pub async fn field_lookup(&self, field_id: impl ToString) -> Result<Value> {
        self.handle(&format!("field/{}", field_id.to_string()), vec![], None)
            .await
    }

    pub async fn field_rel_lookup(&self, field_rel_id: impl ToString) -> Result<Value> {
        self.handle(&format!("field_rel/{}", field_rel_id.to_string()), vec![], None)
            .await
    }

    /// Publications keyed by `pub_id`, restricted to the requested ids.
    pub async fn pub_lookup_by_id<I, S>(&self, pub_ids: I) -> Result<Map<String, Value>>
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let ids = common::id_list(pub_ids, "pub id")?;
        let response = self.handle("pub", vec![], None).await?;
        let response = require_member(response, "pub", "pub", &ids.join(","))?;

        let publications: Vec<&Value> = match &response["pub"] {
            Value::Object(map) => map.values().collect(),
            Value::Array(list) => list.iter().collect(),
            _ => Vec::new(),
        };
        Ok(publications
            .into_iter()
            .filter_map(|publication| {
                let pub_id = common::value_text(publication.get("pub_id")?);
                ids.contains(&pub_id)
                    .then(|| (pub_id, publication.clone()))
            })
            .collect())
    }

    pub async fn pub_lookup_by_pub(&self, pub_code: &str) -> Result<Value> {
        self.handle("pub", vec![("pub", pub_code.to_lowercase())], None)
            .await
    }

    pub async fn pub_lookup_by_pub_group(&self, pubgroup: &str) -> Result<Value> {
        let response = self
            .handle("pub", vec![("pubgroup", pubgroup.to_lowercase())], None)
            .await?;
        require_member(response, "pub", "pubgroup", pubgroup)
    }

    /// Channel by id within a publication; the payload must carry `channel.{PUB}`.
    pub async fn channel_lookup_by_id(&self, channel_id: impl ToString, pub_code: &str) -> Result<Value> {
        let channel_id = channel_id.to_string();
        let params = vec![
            ("channel_id", channel_id.clone()),
            ("pub", pub_code.to_lowercase()),
        ];
        let response = self.handle("channel", params, None).await?;

        let found = response
            .get("channel")
            .and_then(|channels| channels.get(pub_code.to_uppercase()))
            .is_some_and(|channel| channel.get("").is_none());
        if !found {
            return Err(missing_data("channel", &channel_id));
        }
        Ok(response)
    }

    pub async fn channel_lookup_by_pub(&self, pub_code: &str) -> Result<Value> {
        self.handle("channel", vec![("pub", pub_code.to_lowercase())], None)
            .await
    }

    /// Channels of a type such as `website`; cached for 30 seconds.
    pub async fn channel_lookup_by_type(&self, channel_type: &str, pub_code: &str) -> Result<Value> {
        let params = vec![
            ("channel", channel_type.to_lowercase()),
            ("pub", pub_code.to_lowercase()),
        ];
        self.handle("channel", params, Some(30)).await
    }

    /// Vocabulary by key (e.g. `fcp_categories`), optionally with its terms.
    pub async fn vocab_lookup(&self, vocab: &str, pubgroup: &str, terms: bool) -> Result<Value> {
        let mut params = vec![
            ("vocab", vocab.to_lowercase()),
            ("pub", pubgroup.to_lowercase()),
        ];
        if terms {
            params.push(("terms", "true".to_string()));
        }
        self.handle("vocab", params, None).await
    }

    pub async fn term_vocab_lookup<I, S>(&self, term_vocab_ids: I) -> Result<Value>
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let ids = common::id_list(term_vocab_ids, "term vocab id")?.join(",");
        let response = self
            .handle("term_vocab", vec![("term_vocab_id", ids.clone())], None)
            .await?;
        require_member(response, "term_vocab", "term vocab", &ids)
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

fn missing_data(kind: &str, tried: &str) -> ApiSuiteError {
    ApiSuiteError::NotFound(format!(
        "A successful {kind} response was received, but is missing data. The {kind} likely doesn't exist. Tried {tried}"
    ))
}

fn require_member(response: Value, member: &str, kind: &str, tried: &str) -> Result<Value> {
    if common::is_empty_value(response.get(member)) {
        return Err(missing_data(kind, tried));
    }
    Ok(response)
}
