//! Default values shared across the workspace.

pub mod http {
    use std::time::Duration;

    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const USER_AGENT: &str = concat!("apisuite/", env!("CARGO_PKG_VERSION"));
}

pub mod retry {
    use std::time::Duration;

    /// Additional attempts for side-effect-free verbs.
    pub const MAX_RETRIES: u32 = 3;
    pub const MAX_DELAY: Duration = Duration::from_secs(10);
    pub const BACKOFF_MULTIPLIER: f64 = 2.0;
    pub const JITTER_FACTOR: f64 = 0.1;
}

pub mod cache {
    /// Entries kept by the in-process cache before the least recently used is evicted.
    pub const MEMORY_CAPACITY: usize = 1024;
}
