//! Request descriptors.
//!
//! A `RequestDescriptor` is built once per adapter call and never mutated
//! afterwards. Headers are case-insensitive with last-write-wins semantics
//! (backed by `reqwest::header::HeaderMap`); query parameters keep their
//! insertion order for the wire and are sorted only for cache keys.

use reqwest::Url;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use super::Method;
use crate::error::{ApiSuiteError, Result};

/// Request payload, serialized according to its content type.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    Json(Value),
    Text {
        content: String,
        content_type: String,
    },
    Form(Vec<(String, String)>),
    Bytes {
        data: Vec<u8>,
        content_type: String,
    },
}

impl Body {
    pub fn text(content: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
            content_type: content_type.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn content_type(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Json(_) => Some("application/json"),
            Self::Text { content_type, .. } | Self::Bytes { content_type, .. } => {
                Some(content_type.as_str())
            }
            Self::Form(_) => Some("application/x-www-form-urlencoded"),
        }
    }

    /// Wire bytes for this payload, `None` for an empty body.
    pub fn to_bytes(&self) -> Result<Option<Vec<u8>>> {
        Ok(match self {
            Self::Empty => None,
            Self::Json(value) => Some(serde_json::to_vec(value)?),
            Self::Text { content, .. } => Some(content.as_bytes().to_vec()),
            Self::Form(pairs) => Some(encode_pairs(pairs.iter()).into_bytes()),
            Self::Bytes { data, .. } => Some(data.clone()),
        })
    }
}

/// How a 2xx body is decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    /// JSON object or array; anything else is a parse error.
    #[default]
    Json,
    /// Body is passed through verbatim as a JSON string value.
    Text,
}

pub(crate) fn encode_pairs<'a, I>(pairs: I) -> String
where
    I: Iterator<Item = &'a (String, String)>,
{
    pairs
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    client: String,
    method: Method,
    url: Url,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Body,
    format: ResponseFormat,
}

impl RequestDescriptor {
    pub fn builder(
        client: impl Into<String>,
        method: Method,
        url: impl Into<String>,
    ) -> RequestDescriptorBuilder {
        RequestDescriptorBuilder {
            client: client.into(),
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: Body::Empty,
            format: ResponseFormat::Json,
        }
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Base URL without the query string.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Host, with the port when one is explicit.
    pub fn host(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    /// Query string with pairs sorted by key then value.
    pub fn sorted_query(&self) -> String {
        let mut pairs: Vec<&(String, String)> = self.query.iter().collect();
        pairs.sort();
        encode_pairs(pairs.into_iter())
    }

    /// Path plus the query string in insertion order.
    pub fn request_uri(&self) -> String {
        if self.query.is_empty() {
            self.path().to_string()
        } else {
            format!("{}?{}", self.path(), encode_pairs(self.query.iter()))
        }
    }

    /// The absolute URL sent over the wire.
    pub fn target_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            url.set_query(Some(&encode_pairs(self.query.iter())));
        }
        url
    }
}

/// Builder for `RequestDescriptor`; validation happens in `build`.
#[derive(Debug, Clone)]
pub struct RequestDescriptorBuilder {
    client: String,
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Body,
    format: ResponseFormat,
}

impl RequestDescriptorBuilder {
    pub fn query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn query_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    pub fn json(self, value: Value) -> Self {
        self.body(Body::Json(value))
    }

    pub fn form<I, K, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let pairs = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.to_string()))
            .collect();
        self.body(Body::Form(pairs))
    }

    pub fn format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    pub fn build(self) -> Result<RequestDescriptor> {
        let mut url = Url::parse(&self.url)?;
        if url.cannot_be_a_base() {
            return Err(ApiSuiteError::InvalidParameter(format!(
                "'{}' is not an absolute http url",
                self.url
            )));
        }

        // Query pairs written into the url string are folded into the ordered list.
        let mut query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        query.extend(self.query);
        url.set_query(None);
        url.set_fragment(None);

        let mut headers = HeaderMap::new();
        if let Some(content_type) = self.body.content_type() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type)?);
        }
        for (name, value) in self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())?;
            headers.insert(name, HeaderValue::from_str(&value)?);
        }

        Ok(RequestDescriptor {
            client: self.client,
            method: self.method,
            url,
            query,
            headers,
            body: self.body,
            format: self.format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn headers_are_case_insensitive_last_write_wins() {
        let req = RequestDescriptor::builder("Base2", Method::Get, "http://cms.local/api/v2/pub")
            .header("X-Base-User", "first")
            .header("x-base-user", "second")
            .build()
            .unwrap();
        assert_eq!(req.headers().len(), 1);
        assert_eq!(req.headers()["X-BASE-USER"], "second");
    }

    #[test]
    fn inline_query_is_folded_before_explicit_params() {
        let req = RequestDescriptor::builder(
            "Media",
            Method::Put,
            "http://media.local/api/upload?file_name=a.png",
        )
        .query_param("file_path", "2024/01")
        .build()
        .unwrap();
        assert_eq!(req.path(), "/api/upload");
        assert_eq!(
            req.query(),
            &[
                ("file_name".to_string(), "a.png".to_string()),
                ("file_path".to_string(), "2024/01".to_string())
            ]
        );
        assert_eq!(
            req.target_url().as_str(),
            "http://media.local/api/upload?file_name=a.png&file_path=2024%2F01"
        );
    }

    #[test]
    fn sorted_query_ignores_insertion_order() {
        let a = RequestDescriptor::builder("Base2", Method::Get, "http://h/api/v2/channel")
            .query_param("pub", "abc")
            .query_param("channel", "news")
            .build()
            .unwrap();
        let b = RequestDescriptor::builder("Base2", Method::Get, "http://h/api/v2/channel")
            .query_param("channel", "news")
            .query_param("pub", "abc")
            .build()
            .unwrap();
        assert_eq!(a.sorted_query(), "channel=news&pub=abc");
        assert_eq!(a.sorted_query(), b.sorted_query());
        assert_ne!(a.request_uri(), b.request_uri());
    }

    #[test]
    fn json_body_sets_content_type_unless_overridden() {
        let req = RequestDescriptor::builder("Omeda", Method::Post, "https://ows.local/x")
            .json(json!({"a": 1}))
            .build()
            .unwrap();
        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");

        let req = RequestDescriptor::builder("Omeda", Method::Post, "https://ows.local/x")
            .json(json!({"a": 1}))
            .header("content-type", "text/plain")
            .build()
            .unwrap();
        assert_eq!(req.headers()[CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn form_body_is_url_encoded() {
        let body = Body::Form(vec![
            ("email".into(), "a@b.com".into()),
            ("password".into(), "p w".into()),
        ]);
        assert_eq!(
            body.to_bytes().unwrap().unwrap(),
            b"email=a%40b.com&password=p%20w".to_vec()
        );
    }

    #[test]
    fn relative_urls_are_rejected() {
        let err = RequestDescriptor::builder("Varnish", Method::Purge, "/just/a/path")
            .build()
            .unwrap_err();
        assert!(matches!(err, ApiSuiteError::InvalidParameter(_)));
    }
}
