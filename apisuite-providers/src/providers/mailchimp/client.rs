use std::any::Any;
use std::sync::Arc;

use apisuite_core::{ApiClient, Orchestrator, Resource, ResourceRegistry, Result};
use serde_json::{Value, json};

use super::MailchimpBuilder;
use super::resources::{
    CampaignQuery, Campaigns, Lists, MailchimpApi, Reports, Templates, first_record,
};

/// Mailchimp client: a registry of resource handlers plus a few shortcuts.
pub struct MailchimpClient {
    api: Arc<MailchimpApi>,
    resources: ResourceRegistry,
}

impl MailchimpClient {
    pub fn builder() -> MailchimpBuilder {
        MailchimpBuilder::new()
    }

    pub fn new(orchestrator: Orchestrator, batch_size: usize) -> Self {
        let api = Arc::new(MailchimpApi {
            orchestrator,
            batch_size,
        });
        let mut resources = ResourceRegistry::new("Mailchimp");
        resources
            .register(Arc::new(Lists::new(api.clone())))
            .register(Arc::new(Campaigns::new(api.clone())))
            .register(Arc::new(Templates::new(api.clone())))
            .register(Arc::new(Reports::new(api.clone())));
        Self { api, resources }
    }

    pub fn batch_size(&self) -> usize {
        self.api.batch_size
    }

    /// Handler registered under `key`; unknown keys are `ResourceNotFound`.
    pub fn resource(&self, key: &str) -> Result<&Arc<dyn Resource>> {
        self.resources.get(key)
    }

    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    pub fn lists(&self) -> Result<&Lists> {
        self.resources.get_as("lists")
    }

    pub fn campaigns(&self) -> Result<&Campaigns> {
        self.resources.get_as("campaigns")
    }

    pub fn templates(&self) -> Result<&Templates> {
        self.resources.get_as("templates")
    }

    pub fn reports(&self) -> Result<&Reports> {
        self.resources.get_as("reports")
    }

    /// `campaigns/list` without the resource defaults for limit and sort field.
    pub async fn campaigns_list(&self, filters: Value, query: Option<CampaignQuery>) -> Result<Value> {
        self.campaigns()?
            .get_list(filters, query.unwrap_or_else(CampaignQuery::unbounded))
            .await
    }

    pub async fn lists_member_info(&self, list_id: &str, emails: Vec<Value>) -> Result<Value> {
        self.lists()?.member_info(list_id, emails).await
    }

    pub async fn lists_find_member_by_euid(&self, list_id: &str, euid: &str) -> Result<Value> {
        self.lists()?.find_member_by_euid(list_id, euid).await
    }

    pub async fn campaign_find_by_id(&self, cid: &str) -> Result<Value> {
        let response = self
            .campaigns_list(json!({"campaign_id": cid}), None)
            .await?;
        first_record(response, format!("Unable to find campaign using id {cid}"))
    }
}

impl ApiClient for MailchimpClient {
    fn orchestrator(&self) -> &Orchestrator {
        &self.api.orchestrator
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
