use std::any::Any;
use std::sync::Arc;

use apisuite_core::{Resource, Result};
use serde_json::{Map, Value, json};

use super::{MailchimpApi, body};

/// `templates/*` endpoints.
pub struct Templates {
    api: Arc<MailchimpApi>,
}

impl Templates {
    pub(crate) fn new(api: Arc<MailchimpApi>) -> Self {
        Self { api }
    }

    pub async fn add(&self, name: &str, html: &str, folder_id: Option<i64>) -> Result<Value> {
        let mut request = body! {"name" => name, "html" => html};
        if let Some(folder_id) = folder_id {
            request.insert("folder_id".into(), json!(folder_id));
        }
        self.call("add", request).await
    }

    pub async fn del(&self, template_id: i64) -> Result<Value> {
        self.call("del", body! {"template_id" => template_id}).await
    }

    /// `types` and `filters` are passed through as given (`null` sends `[]`).
    pub async fn get_list(&self, types: Value, filters: Value) -> Result<Value> {
        let or_empty = |v: Value| if v.is_null() { json!([]) } else { v };
        self.call("list", body! {"types" => or_empty(types), "filters" => or_empty(filters)})
            .await
    }

    /// `template_type` is one of `user`, `gallery` or `base`; `user` when omitted.
    pub async fn info(&self, template_id: i64, template_type: Option<&str>) -> Result<Value> {
        let request = body! {
            "template_id" => template_id,
            "type" => template_type.unwrap_or("user"),
        };
        self.call("info", request).await
    }

    pub async fn undel(&self, template_id: i64) -> Result<Value> {
        self.call("undel", body! {"template_id" => template_id}).await
    }

    pub async fn update(&self, template_id: i64, values: Value) -> Result<Value> {
        self.call("update", body! {"template_id" => template_id, "values" => values})
            .await
    }

    async fn call(&self, action: &str, body: Map<String, Value>) -> Result<Value> {
        self.api.call(&self.endpoint(action), body).await
    }
}

impl Resource for Templates {
    fn key(&self) -> &'static str {
        "templates"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
