//! Named sub-resources of an adapter.
//!
//! Adapters that group endpoints (for example mailing lists and campaigns)
//! register one handler per group and look them up by name. A miss is a
//! `ResourceNotFound` error rather than a silent `None`.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{ApiSuiteError, Result};

pub trait Resource: Send + Sync + 'static {
    /// Registry key, e.g. `lists`.
    fn key(&self) -> &'static str;

    /// Endpoint path for `action` within this resource.
    fn endpoint(&self, action: &str) -> String {
        format!("/{}/{}", self.key(), action)
    }

    fn as_any(&self) -> &dyn Any;
}

pub struct ResourceRegistry {
    client: &'static str,
    resources: BTreeMap<&'static str, Arc<dyn Resource>>,
}

impl ResourceRegistry {
    pub fn new(client: &'static str) -> Self {
        Self {
            client,
            resources: BTreeMap::new(),
        }
    }

    /// Registers `resource` under its key, replacing any previous entry.
    pub fn register(&mut self, resource: Arc<dyn Resource>) -> &mut Self {
        self.resources.insert(resource.key(), resource);
        self
    }

    pub fn get(&self, key: &str) -> Result<&Arc<dyn Resource>> {
        self.resources
            .get(key)
            .ok_or_else(|| ApiSuiteError::resource_not_found(self.client, key))
    }

    /// Typed lookup; a handler of another type counts as a miss.
    pub fn get_as<T: Resource>(&self, key: &str) -> Result<&T> {
        self.get(key)?
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| ApiSuiteError::resource_not_found(self.client, key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.resources.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("client", &self.client)
            .field("resources", &self.resources.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Lists;
    impl Resource for Lists {
        fn key(&self) -> &'static str {
            "lists"
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct Reports;
    impl Resource for Reports {
        fn key(&self) -> &'static str {
            "reports"
        }
        fn endpoint(&self, action: &str) -> String {
            format!("/reports/{action}.json")
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn registry() -> ResourceRegistry {
        let mut registry = ResourceRegistry::new("Mailchimp");
        registry.register(Arc::new(Lists)).register(Arc::new(Reports));
        registry
    }

    #[test]
    fn lookup_by_name() {
        let registry = registry();
        assert_eq!(registry.get("lists").unwrap().endpoint("subscribe"), "/lists/subscribe");
        assert_eq!(registry.get("reports").unwrap().endpoint("opened"), "/reports/opened.json");
        assert!(registry.get_as::<Lists>("lists").is_ok());
        assert_eq!(registry.keys().collect::<Vec<_>>(), ["lists", "reports"]);
    }

    #[test]
    fn misses_are_named_errors() {
        let registry = registry();
        let Err(err) = registry.get("folders") else {
            panic!("folders should not resolve");
        };
        assert_eq!(err.to_string(), "No Mailchimp resource exists for 'folders'");
        assert!(matches!(
            registry.get_as::<Lists>("reports"),
            Err(ApiSuiteError::ResourceNotFound { .. })
        ));
    }
}
