use std::any::Any;
use std::sync::Arc;

use apisuite_core::{Resource, Result};
use chrono::NaiveDateTime;
use serde_json::{Map, Value, json};

use super::{MailchimpApi, body, first_record};

const SCHEDULE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Paging and sorting for `campaigns/list`.
///
/// Zero `start`/`limit` and a `None` sort field are left out of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignQuery {
    pub start: u32,
    pub limit: u32,
    pub sort_field: Option<String>,
    pub sort_dir: String,
}

impl Default for CampaignQuery {
    fn default() -> Self {
        Self {
            start: 0,
            limit: 25,
            sort_field: Some("create_time".to_string()),
            sort_dir: "DESC".to_string(),
        }
    }
}

impl CampaignQuery {
    /// No limit and no sort field; the API defaults apply.
    pub fn unbounded() -> Self {
        Self {
            limit: 0,
            sort_field: None,
            ..Self::default()
        }
    }

    pub fn start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn sort(mut self, field: impl Into<String>, dir: impl Into<String>) -> Self {
        self.sort_field = Some(field.into());
        self.sort_dir = dir.into();
        self
    }

    pub(crate) fn into_body(self, filters: Value) -> Map<String, Value> {
        let filters = if filters.is_null() { json!([]) } else { filters };
        let mut body = body! {"filters" => filters, "sort_dir" => self.sort_dir};
        if self.start != 0 {
            body.insert("start".into(), json!(self.start));
        }
        if self.limit != 0 {
            body.insert("limit".into(), json!(self.limit));
        }
        if let Some(field) = self.sort_field.filter(|f| !f.is_empty()) {
            body.insert("sort_field".into(), json!(field));
        }
        body
    }
}

/// `campaigns/*` endpoints.
pub struct Campaigns {
    api: Arc<MailchimpApi>,
}

impl Campaigns {
    pub(crate) fn new(api: Arc<MailchimpApi>) -> Self {
        Self { api }
    }

    pub async fn content(&self, cid: &str, options: Value) -> Result<Value> {
        let options = if options.is_null() { json!([]) } else { options };
        self.call("content", body! {"cid" => cid, "options" => options})
            .await
    }

    /// Creates a draft campaign; `campaign_type` is usually `regular`.
    pub async fn create(
        &self,
        campaign_type: &str,
        options: Value,
        content: Value,
        segment_opts: Option<Value>,
        type_opts: Option<Value>,
    ) -> Result<Value> {
        let request = body! {
            "type" => campaign_type,
            "options" => options,
            "content" => content,
            "segment_opts" => segment_opts.unwrap_or_else(|| json!([])),
            "type_opts" => type_opts.unwrap_or_else(|| json!([])),
        };
        self.call("create", request).await
    }

    pub async fn delete(&self, cid: &str) -> Result<Value> {
        self.call("delete", body! {"cid" => cid}).await
    }

    pub async fn find_by_id(&self, cid: &str) -> Result<Value> {
        let response = self
            .get_list(json!({"campaign_id": cid}), CampaignQuery::default())
            .await?;
        first_record(response, format!("Unable to find campaign using id {cid}"))
    }

    pub async fn get_list(&self, filters: Value, query: CampaignQuery) -> Result<Value> {
        self.call("list", query.into_body(filters)).await
    }

    pub async fn replicate(&self, cid: &str) -> Result<Value> {
        self.call("replicate", body! {"cid" => cid}).await
    }

    /// Readiness checklist for sending.
    pub async fn ready(&self, cid: &str) -> Result<Value> {
        self.call("ready", body! {"cid" => cid}).await
    }

    /// Schedules delivery; `time_b` is the second slot of an A/B split.
    pub async fn schedule(
        &self,
        cid: &str,
        time: NaiveDateTime,
        time_b: Option<NaiveDateTime>,
    ) -> Result<Value> {
        let mut request = body! {
            "cid" => cid,
            "schedule_time" => time.format(SCHEDULE_FORMAT).to_string(),
        };
        if let Some(time_b) = time_b {
            request.insert(
                "schedule_time_b".into(),
                json!(time_b.format(SCHEDULE_FORMAT).to_string()),
            );
        }
        self.call("schedule", request).await
    }

    pub async fn segment_test(&self, list_id: &str, options: Value) -> Result<Value> {
        self.call("segment-test", body! {"list_id" => list_id, "options" => options})
            .await
    }

    pub async fn send(&self, cid: &str) -> Result<Value> {
        self.call("send", body! {"cid" => cid}).await
    }

    /// `send_type` is `html` or `text`.
    pub async fn send_test(&self, cid: &str, test_emails: &[&str], send_type: &str) -> Result<Value> {
        let request = body! {"cid" => cid, "test_emails" => test_emails, "send_type" => send_type};
        self.call("send-test", request).await
    }

    pub async fn update(&self, cid: &str, name: &str, value: Value) -> Result<Value> {
        self.call("update", body! {"cid" => cid, "name" => name, "value" => value})
            .await
    }

    pub async fn unschedule(&self, cid: &str) -> Result<Value> {
        self.call("unschedule", body! {"cid" => cid}).await
    }

    async fn call(&self, action: &str, body: Map<String, Value>) -> Result<Value> {
        self.api.call(&self.endpoint(action), body).await
    }
}

impl Resource for Campaigns {
    fn key(&self) -> &'static str {
        "campaigns"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
