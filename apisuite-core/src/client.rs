//! Client Module
//!
//! Uniform surface implemented by every vendor adapter.

use std::any::Any;

use crate::error::Result;
use crate::execution::Orchestrator;

/// A vendor adapter: a thin endpoint catalog over a shared orchestrator.
pub trait ApiClient: Send + Sync {
    fn orchestrator(&self) -> &Orchestrator;

    /// Adapter type name, e.g. `Base2`.
    fn client_id(&self) -> &'static str {
        self.orchestrator().client_id()
    }

    /// Checks the required configuration without sending anything.
    fn validate_config(&self) -> Result<()> {
        self.orchestrator().validate()
    }

    /// Get as Any for dynamic casting
    fn as_any(&self) -> &dyn Any;

    /// Get as cacheable capability if supported
    fn as_cacheable(&self) -> Option<&dyn Cacheable> {
        None
    }
}

/// Adapters whose responses may be served from the shared response cache.
pub trait Cacheable: ApiClient {
    fn set_cache_enabled(&self, enabled: bool) {
        self.orchestrator().set_cache_enabled(enabled);
    }

    fn cache_enabled(&self) -> bool {
        self.orchestrator().cache_enabled()
    }
}
