//! Helpers shared by several adapters.

use apisuite_core::execution::http::HttpHeaderBuilder;
use apisuite_core::{ApiSuiteError, ClientConfig, Result};
use reqwest::header::HeaderMap;
use serde_json::Value;

/// Host option without scheme or surrounding slashes.
pub(crate) fn host(config: &ClientConfig, key: &str) -> String {
    let raw = config.get_or(key, "").trim().trim_matches('/');
    raw.trim_start_matches("http://")
        .trim_start_matches("https://")
        .to_string()
}

pub(crate) fn headers<'a, I>(pairs: I) -> Result<HeaderMap>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .try_fold(HttpHeaderBuilder::new(), |builder, (name, value)| {
            builder.with_header(name, value)
        })
        .map(HttpHeaderBuilder::build)
}

/// Non-empty list of ids as strings, splitting comma separated input.
pub(crate) fn id_list<I, S>(ids: I, what: &str) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: ToString,
{
    let ids: Vec<String> = ids
        .into_iter()
        .flat_map(|id| {
            id.to_string()
                .split(',')
                .map(|part| part.trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|id| !id.is_empty())
        .collect();
    if ids.is_empty() {
        return Err(ApiSuiteError::InvalidParameter(format!(
            "at least one {what} is required"
        )));
    }
    Ok(ids)
}

/// Loose emptiness: null, false, zero, `""`, `"0"`, `[]` and `{}`.
pub(crate) fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty() || s == "0",
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
    }
}

/// Scalar value as plain text (strings unquoted).
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn require_param(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiSuiteError::InvalidParameter(format!("{name} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn host_strips_scheme_and_slashes() {
        let config = ClientConfig::new().with("host", "https://cms.local/");
        assert_eq!(host(&config, "host"), "cms.local");
    }

    #[test]
    fn ids_split_on_commas() {
        assert_eq!(id_list(["1,2", "3"], "id").unwrap(), ["1", "2", "3"]);
        assert!(id_list(Vec::<String>::new(), "id").is_err());
    }

    #[test]
    fn loose_emptiness() {
        assert!(is_empty_value(None));
        assert!(is_empty_value(Some(&json!("0"))));
        assert!(is_empty_value(Some(&json!({}))));
        assert!(!is_empty_value(Some(&json!([1]))));
        assert!(!is_empty_value(Some(&json!(1))));
    }
}
