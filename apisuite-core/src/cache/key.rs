//! Cache key derivation.

use crate::types::RequestDescriptor;

/// Maps a request onto an opaque cache key.
pub trait CacheKeyStrategy: Send + Sync {
    fn cache_key(&self, request: &RequestDescriptor) -> String;
}

impl<F> CacheKeyStrategy for F
where
    F: Fn(&RequestDescriptor) -> String + Send + Sync,
{
    fn cache_key(&self, request: &RequestDescriptor) -> String {
        self(request)
    }
}

/// `{client}:{host}:{METHOD}:{path}` followed by `:{sorted query}` when there is one.
///
/// Headers and body never participate, and parameter order does not matter.
/// Keys are plain text, not hashes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultKeyStrategy;

impl CacheKeyStrategy for DefaultKeyStrategy {
    fn cache_key(&self, request: &RequestDescriptor) -> String {
        let mut key = format!(
            "{}:{}:{}:{}",
            request.client(),
            request.host(),
            request.method(),
            request.path()
        );
        let query = request.sorted_query();
        if !query.is_empty() {
            key.push(':');
            key.push_str(&query);
        }
        key
    }
}
