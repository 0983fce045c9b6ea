use std::any::Any;
use std::sync::Arc;

use apisuite_core::{Resource, Result};
use serde_json::{Value, json};

use super::{MailchimpApi, body, first_record};

/// `lists/*` endpoints.
pub struct Lists {
    api: Arc<MailchimpApi>,
}

impl Lists {
    pub(crate) fn new(api: Arc<MailchimpApi>) -> Self {
        Self { api }
    }

    /// Subscribes `batch` in chunks of the configured batch size.
    ///
    /// Chunks are sent one after another and the responses returned in order;
    /// the first failing chunk aborts the rest.
    pub async fn batch_subscribe(
        &self,
        list_id: &str,
        batch: Vec<Value>,
        double_optin: bool,
        update_existing: bool,
        replace_interests: bool,
    ) -> Result<Vec<Value>> {
        let endpoint = self.endpoint("batch-subscribe");
        let chunks = batch.chunks(self.api.batch_size.max(1));
        let total = chunks.len();
        let mut responses = Vec::with_capacity(total);
        for (index, chunk) in chunks.enumerate() {
            tracing::debug!(list_id, chunk = index + 1, total, size = chunk.len(), "batch subscribe");
            let request = body! {
                "id" => list_id,
                "batch" => chunk,
                "double_optin" => double_optin,
                "update_existing" => update_existing,
                "replace_interests" => replace_interests,
            };
            responses.push(self.api.call(&endpoint, request).await?);
        }
        Ok(responses)
    }

    pub async fn find_member_by_email(&self, list_id: &str, email: &str) -> Result<Value> {
        let response = self.member_info(list_id, vec![json!({"email": email})]).await?;
        first_record(response, format!("Unable to find member info using email {email}"))
    }

    pub async fn find_member_by_euid(&self, list_id: &str, euid: &str) -> Result<Value> {
        let response = self.member_info(list_id, vec![json!({"euid": euid})]).await?;
        first_record(response, format!("Unable to find member info using id {euid}"))
    }

    pub async fn interest_group_add(&self, list_id: &str, name: &str, grouping_id: i64) -> Result<Value> {
        let request = body! {"id" => list_id, "group_name" => name, "grouping_id" => grouping_id};
        self.api.call(&self.endpoint("interest-group-add"), request).await
    }

    pub async fn interest_group_del(&self, list_id: &str, name: &str, grouping_id: i64) -> Result<Value> {
        let request = body! {"id" => list_id, "group_name" => name, "grouping_id" => grouping_id};
        self.api.call(&self.endpoint("interest-group-del"), request).await
    }

    pub async fn interest_groupings(&self, list_id: &str, counts: bool) -> Result<Value> {
        let request = body! {"id" => list_id, "counts" => counts};
        self.api.call(&self.endpoint("interest-groupings"), request).await
    }

    /// Member details for up to 50 email structs (`{"email": ..}`, `{"euid": ..}` or `{"leid": ..}`).
    pub async fn member_info(&self, list_id: &str, emails: Vec<Value>) -> Result<Value> {
        let request = body! {"id" => list_id, "emails" => emails};
        self.api.call(&self.endpoint("member-info"), request).await
    }

    pub async fn merge_var_add(&self, list_id: &str, tag: &str, name: &str, options: Value) -> Result<Value> {
        let options = if options.is_null() { json!([]) } else { options };
        let request = body! {"id" => list_id, "tag" => tag, "name" => name, "options" => options};
        self.api.call(&self.endpoint("merge-var-add"), request).await
    }

    pub async fn merge_vars(&self, list_id: &str) -> Result<Value> {
        let request = body! {"id" => [list_id]};
        self.api.call(&self.endpoint("merge-vars"), request).await
    }
}

impl Resource for Lists {
    fn key(&self) -> &'static str {
        "lists"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
