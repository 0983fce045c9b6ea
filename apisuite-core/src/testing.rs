//! Test doubles shared by the provider crates.
//!
//! Only compiled for tests or with the `test-utils` feature.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;

use crate::error::ApiSuiteError;
use crate::execution::http::{HttpTransport, HttpTransportRequest, HttpTransportResponse};

type Scripted = Result<HttpTransportResponse, ApiSuiteError>;

/// Transport that replays queued responses and records every request.
///
/// Once the queue is drained the fallback is returned; without a fallback
/// the call fails with a `NetworkError`.
#[derive(Default)]
pub struct ScriptedTransport {
    queue: Mutex<VecDeque<Scripted>>,
    fallback: Mutex<Option<Scripted>>,
    requests: Mutex<Vec<HttpTransportRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, status: u16, body: impl Into<String>) -> Self {
        self.push_response(status, body);
        self
    }

    pub fn with_json(self, status: u16, body: Value) -> Self {
        self.push_json(status, body);
        self
    }

    pub fn with_error(self, error: ApiSuiteError) -> Self {
        self.push(Err(error));
        self
    }

    /// Response returned for every request once the queue is empty.
    pub fn repeat_response(self, status: u16, body: impl Into<String>) -> Self {
        *lock(&self.fallback) = Some(Ok(HttpTransportResponse::new(status, body.into())));
        self
    }

    pub fn repeat_error(self, error: ApiSuiteError) -> Self {
        *lock(&self.fallback) = Some(Err(error));
        self
    }

    pub fn push(&self, scripted: Scripted) {
        lock(&self.queue).push_back(scripted);
    }

    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.push(Ok(HttpTransportResponse::new(status, body.into())));
    }

    pub fn push_json(&self, status: u16, body: Value) {
        let mut response = HttpTransportResponse::new(status, body.to_string());
        response
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.push(Ok(response));
    }

    pub fn push_with_headers(&self, status: u16, headers: HeaderMap, body: impl Into<String>) {
        let mut response = HttpTransportResponse::new(status, body.into());
        response.headers = headers;
        self.push(Ok(response));
    }

    pub fn requests(&self) -> Vec<HttpTransportRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn last_request(&self) -> Option<HttpTransportRequest> {
        lock(&self.requests).last().cloned()
    }

    /// `"{METHOD} {url}"` for every recorded request, in order.
    pub fn request_lines(&self) -> Vec<String> {
        lock(&self.requests)
            .iter()
            .map(|r| format!("{} {}", r.method, r.url))
            .collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, ApiSuiteError> {
        lock(&self.requests).push(request);
        if let Some(next) = lock(&self.queue).pop_front() {
            return next;
        }
        lock(&self.fallback).clone().unwrap_or_else(|| {
            Err(ApiSuiteError::NetworkError(
                "scripted transport has no response queued".to_string(),
            ))
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
