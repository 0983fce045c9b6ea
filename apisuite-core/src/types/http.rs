//! Settings for the reqwest-backed transport.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Transport settings. Durations are whole seconds in serialized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(with = "seconds")]
    pub timeout: Option<Duration>,
    #[serde(with = "seconds")]
    pub connect_timeout: Option<Duration>,
    /// Sent with every request unless the adapter overrides them.
    pub headers: HashMap<String, String>,
    pub proxy: Option<String>,
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(defaults::http::REQUEST_TIMEOUT),
            connect_timeout: Some(defaults::http::CONNECT_TIMEOUT),
            headers: HashMap::new(),
            proxy: None,
            user_agent: Some(defaults::http::USER_AGENT.to_string()),
        }
    }
}

impl HttpConfig {
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::default()
    }
}

/// Starts from [`HttpConfig::default`]; every setter overrides one field.
#[derive(Debug, Clone, Default)]
pub struct HttpConfigBuilder {
    config: HttpConfig,
}

impl HttpConfigBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Lets requests run without a client-side deadline.
    pub fn no_timeout(mut self) -> Self {
        self.config.timeout = None;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.config.proxy = Some(proxy.into());
        self
    }

    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(name.into(), value.into());
        self
    }

    pub fn build(self) -> HttpConfig {
        self.config
    }
}

mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => s.serialize_some(&duration.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_defaults_for_untouched_fields() {
        let config = HttpConfig::builder()
            .connect_timeout(Duration::from_secs(2))
            .default_header("x-env", "staging")
            .build();
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(2)));
        assert_eq!(config.timeout, Some(defaults::http::REQUEST_TIMEOUT));
        assert_eq!(config.headers["x-env"], "staging");
        assert!(config.user_agent.unwrap().starts_with("apisuite/"));
    }

    #[test]
    fn durations_are_read_as_seconds() {
        let config: HttpConfig =
            serde_json::from_str(r#"{"timeout": 5, "connect_timeout": null}"#).unwrap();
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.connect_timeout, None);
        assert!(config.headers.is_empty());
    }

    #[test]
    fn no_timeout_clears_the_request_deadline() {
        assert_eq!(HttpConfig::builder().no_timeout().build().timeout, None);
    }
}
