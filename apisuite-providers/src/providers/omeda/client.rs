use apisuite_core::{Body, Method, Orchestrator, Result};
use chrono::NaiveDateTime;
use serde_json::{Map, Value, json};

use super::{OmedaBuilder, OmedaProfile, PRODUCTION_HOST};
use crate::common;

const CHANGE_DATE_FORMAT: &str = "%m%d%Y_%H%M";
const SCHEDULE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Omeda brand/client API client.
///
/// Request bodies given as `Value::String` are sent verbatim as JSON text;
/// any other value is serialized.
pub struct OmedaClient {
    orchestrator: Orchestrator,
}

impl_api_client!(OmedaClient);

impl OmedaClient {
    pub fn builder() -> OmedaBuilder {
        OmedaBuilder::new()
    }

    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    pub fn host(&self) -> String {
        common::host(self.orchestrator.config(), "host")
    }

    pub fn is_production(&self) -> bool {
        self.host() == PRODUCTION_HOST
    }

    pub fn is_staging(&self) -> bool {
        !self.is_production()
    }

    // Customer

    pub async fn customer_lookup_by_id(&self, customer_id: impl ToString) -> Result<Value> {
        let endpoint = format!("/customer/{}/*", segment(customer_id));
        self.get(&endpoint).await
    }

    pub async fn customer_lookup_by_encrypted_id(&self, encrypted_id: &str) -> Result<Value> {
        let endpoint = format!("/customer/{}/encrypted/*", segment(encrypted_id));
        self.get(&endpoint).await
    }

    pub async fn customer_lookup_by_email(&self, email: &str) -> Result<Value> {
        let endpoint = format!("/customer/email/{}/*", segment(email));
        self.get(&endpoint).await
    }

    pub async fn customer_comprehensive_lookup(&self, customer_id: impl ToString) -> Result<Value> {
        let endpoint = format!("/customer/{}/comp/*", segment(customer_id));
        self.get(&endpoint).await
    }

    /// Stores a customer together with an optional order.
    pub async fn customer_save(&self, request_body: Value) -> Result<Value> {
        self.send(Method::Post, "/storecustomerandorder/*", json_body(request_body))
            .await
    }

    pub async fn customer_transaction_lookup(&self, transaction_id: impl ToString) -> Result<Value> {
        let endpoint = format!("/transaction/{}/*", segment(transaction_id));
        self.get(&endpoint).await
    }

    pub async fn customer_behavior_lookup(&self, customer_id: impl ToString) -> Result<Value> {
        let endpoint = format!("/customer/{}/behavior/*", segment(customer_id));
        self.get(&endpoint).await
    }

    pub async fn customer_behavior_lookup_by_behavior(
        &self,
        customer_id: impl ToString,
        behavior_id: impl ToString,
    ) -> Result<Value> {
        let endpoint = format!(
            "/customer/{}/behavior/{}/*",
            segment(customer_id),
            segment(behavior_id)
        );
        self.get(&endpoint).await
    }

    pub async fn customer_behavior_lookup_by_product(
        &self,
        customer_id: impl ToString,
        product_id: impl ToString,
    ) -> Result<Value> {
        let endpoint = format!(
            "/customer/{}/behavior/product/{}/*",
            segment(customer_id),
            segment(product_id)
        );
        self.get(&endpoint).await
    }

    pub async fn customer_assign_behavior(&self, request_body: Value) -> Result<Value> {
        self.send(Method::Post, "/assignbehavior/*", json_body(request_body))
            .await
    }

    /// Customers changed between two dates, both inclusive.
    pub async fn customer_change_lookup(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Value> {
        let endpoint = format!(
            "/customer/change/startdate/{}/enddate/{}/*",
            start.format(CHANGE_DATE_FORMAT),
            end.format(CHANGE_DATE_FORMAT)
        );
        self.get(&endpoint).await
    }

    // Brand

    pub async fn brand_comprehensive_lookup(&self) -> Result<Value> {
        self.get("/comp/*").await
    }

    pub async fn brand_behavior_lookup(&self) -> Result<Value> {
        self.get("/behavior/*").await
    }

    pub async fn brand_behavior_lookup_by_id(&self, behavior_id: impl ToString) -> Result<Value> {
        let endpoint = format!("/behavior/{}/*", segment(behavior_id));
        self.get(&endpoint).await
    }

    pub async fn brand_behavior_lookup_by_product(&self) -> Result<Value> {
        self.get("/behavior/byproduct/*").await
    }

    pub async fn brand_behavior_create(
        &self,
        action_id: &str,
        description: &str,
        alternate_id: Option<&str>,
        product_id: Option<i64>,
    ) -> Result<Value> {
        let mut body = Map::new();
        body.insert("ActionId".into(), json!(action_id));
        body.insert("Description".into(), json!(description));
        if let Some(alternate_id) = alternate_id {
            body.insert("AlternateId".into(), json!(alternate_id));
        }
        if let Some(product_id) = product_id {
            body.insert("ProductId".into(), json!(product_id));
        }
        self.send(Method::Post, "/behavior/*", Body::Json(Value::Object(body)))
            .await
    }

    /// Updates a behavior; a status code other than 0 (inactive) or 1 (active) is ignored.
    pub async fn brand_behavior_update(
        &self,
        behavior_id: i64,
        alternate_id: Option<&str>,
        status_code: Option<u8>,
    ) -> Result<Value> {
        let mut body = Map::new();
        body.insert("Id".into(), json!(behavior_id));
        if let Some(code) = status_code.filter(|code| *code <= 1) {
            body.insert("StatusCode".into(), json!(code));
        }
        if let Some(alternate_id) = alternate_id {
            body.insert("AlternateId".into(), json!(alternate_id));
        }
        self.send(Method::Put, "/behavior/*", Body::Json(Value::Object(body)))
            .await
    }

    pub async fn brand_behavior_actions_lookup(&self) -> Result<Value> {
        self.get("/behavior/action/*").await
    }

    pub async fn brand_behavior_categories_lookup(&self) -> Result<Value> {
        self.get("/behavior/category/*").await
    }

    // Omail

    pub async fn omail_optin_optout_lookup(&self, email: &str) -> Result<Value> {
        let endpoint = format!("/filter/email/{}/*", segment(email));
        self.get(&endpoint).await
    }

    /// Queues opt-ins; scoped to the client account.
    pub async fn omail_optin_send(&self, request_body: Value) -> Result<Value> {
        self.send_client("/optinfilterqueue/*", json_body(request_body))
            .await
    }

    /// Queues opt-outs; scoped to the client account.
    pub async fn omail_optout_send(&self, request_body: Value) -> Result<Value> {
        self.send_client("/optoutfilterqueue/*", json_body(request_body))
            .await
    }

    pub async fn omail_deployment_lookup(&self, track_id: &str) -> Result<Value> {
        let endpoint = format!("/omail/deployment/lookup/{}/*", segment(track_id));
        self.get(&endpoint).await
    }

    pub async fn omail_deployment_cancel(&self, track_id: &str, user_id: &str) -> Result<Value> {
        let body = json!({"UserId": user_id, "TrackId": track_id});
        self.send(Method::Post, "/omail/deployment/cancel/*", Body::Json(body))
            .await
    }

    pub async fn omail_deployment_create(&self, request_body: Value) -> Result<Value> {
        self.send(Method::Post, "/omail/deployment/*", json_body(request_body))
            .await
    }

    /// Schedules a deployment; `None` sends it immediately.
    pub async fn omail_deployment_schedule(
        &self,
        track_id: &str,
        user_id: &str,
        date: Option<NaiveDateTime>,
    ) -> Result<Value> {
        let scheduled = match date {
            Some(date) => date.format(SCHEDULE_DATE_FORMAT).to_string(),
            None => "[NOW]".to_string(),
        };
        let body = json!({"TrackId": track_id, "UserId": user_id, "ScheduledDate": scheduled});
        self.send(Method::Post, "/omail/deployment/schedule/*", Body::Json(body))
            .await
    }

    pub async fn omail_deployment_unschedule(&self, track_id: &str, user_id: &str) -> Result<Value> {
        let body = json!({"TrackId": track_id, "UserId": user_id});
        self.send(Method::Post, "/omail/deployment/unschedule/*", Body::Json(body))
            .await
    }

    pub async fn omail_deployment_add_audience(&self, request_body: Value) -> Result<Value> {
        self.send(
            Method::Post,
            "/omail/deployment/audience/add/*",
            json_body(request_body),
        )
        .await
    }

    pub async fn omail_deployment_update(&self, request_body: Value) -> Result<Value> {
        self.send(Method::Put, "/omail/deployment/*", json_body(request_body))
            .await
    }

    /// Sends the test emails of a deployment.
    pub async fn omail_deployment_test(&self, track_id: &str, user_id: &str) -> Result<Value> {
        let body = json!({"TrackId": track_id, "UserId": user_id});
        self.send(Method::Post, "/omail/deployment/sendtest/*", Body::Json(body))
            .await
    }

    /// Posts split content (subject, from name, html, ...) as an XML `<Deployment>` document.
    pub async fn omail_deployment_content<I, K>(&self, fields: I) -> Result<Value>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let xml = deployment_xml(fields);
        self.send(
            Method::Post,
            "/omail/deployment/content/*",
            Body::text(xml, "text/xml"),
        )
        .await
    }

    /// Content of one split; `content_type` is `html` or `text`.
    pub async fn omail_deployment_content_lookup(
        &self,
        track_id: &str,
        sequence: u32,
        content_type: Option<&str>,
    ) -> Result<Value> {
        let endpoint = format!(
            "/omail/deployment/content/lookup/{}/{}/{}/*",
            segment(content_type.unwrap_or("html")),
            segment(track_id),
            sequence
        );
        self.get(&endpoint).await
    }

    pub async fn omail_deployment_search(&self, request_body: Value) -> Result<Value> {
        self.send(
            Method::Post,
            "/omail/deployment/search/*",
            json_body(request_body),
        )
        .await
    }

    pub async fn omail_on_demand_send(&self, request_body: Value) -> Result<Value> {
        self.send(Method::Post, "/omail/deployemails/*", json_body(request_body))
            .await
    }

    async fn get(&self, endpoint: &str) -> Result<Value> {
        self.send(Method::Get, endpoint, Body::Empty).await
    }

    async fn send(&self, method: Method, endpoint: &str, body: Body) -> Result<Value> {
        let request = self
            .orchestrator
            .request(method, endpoint)?
            .body(body)
            .build()?;
        self.orchestrator.execute_default(&request).await
    }

    async fn send_client(&self, endpoint: &str, body: Body) -> Result<Value> {
        let url = apisuite_core::execution::orchestrator::join_url(
            &OmedaProfile::client_url(self.orchestrator.config()),
            endpoint,
        );
        let request = self
            .orchestrator
            .request_url(Method::Post, url)
            .body(body)
            .build()?;
        self.orchestrator.execute_default(&request).await
    }
}

fn segment(value: impl ToString) -> String {
    urlencoding::encode(&value.to_string()).into_owned()
}

fn json_body(body: Value) -> Body {
    match body {
        Value::String(raw) => Body::text(raw, "application/json"),
        other => Body::Json(other),
    }
}

fn deployment_xml<I, K>(fields: I) -> String
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    let elements: Vec<String> = fields
        .into_iter()
        .map(|(name, value)| {
            let name = name.as_ref();
            let inner = match value {
                Value::String(text) => format!("<![CDATA[{}]]>", text.replace("]]>", "]]&gt;")),
                Value::Null | Value::Bool(false) => String::new(),
                Value::Bool(true) => "1".to_string(),
                other => common::value_text(&other),
            };
            format!("<{name}>{inner}</{name}>")
        })
        .collect();
    format!("<Deployment>{}</Deployment>", elements.join("\n"))
}
