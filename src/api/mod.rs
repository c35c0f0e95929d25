//! Board Server API
//!
//! Typed wrappers over the board's HTTP endpoints, organized by domain.
//! The wire is behind the `Transport` trait so the same client runs over
//! `fetch` in the browser and over scripted fakes in tests.

mod calendar;
mod catalog;
mod fetch;
mod tasks;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::models::MutationResponse;

pub use fetch::FetchTransport;

/// Characters `encodeURIComponent` leaves alone
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One request/response round-trip. Futures are not `Send`: the browser
/// runs everything on one thread.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, method: Method, url: &str, body: Option<String>) -> ApiResult<HttpResponse>;
}

#[async_trait(?Send)]
impl<T: Transport + ?Sized> Transport for std::rc::Rc<T> {
    async fn send(&self, method: Method, url: &str, body: Option<String>) -> ApiResult<HttpResponse> {
        (**self).send(method, url, body).await
    }
}

/// Percent-encode a single query value
pub fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Build `path?k=v&...`, skipping absent values
pub fn with_query(path: &str, params: &[(&str, Option<&str>)]) -> String {
    let pairs: Vec<String> = params
        .iter()
        .filter_map(|(k, v)| v.map(|v| format!("{}={}", k, encode_query_value(v))))
        .collect();
    if pairs.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, pairs.join("&"))
    }
}

#[derive(Debug, Clone)]
pub struct BoardApi<T> {
    transport: T,
    base: String,
}

impl<T: Transport> BoardApi<T> {
    pub fn new(transport: T, base: impl Into<String>) -> Self {
        Self {
            transport,
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get_text(&self, url: &str) -> ApiResult<String> {
        let resp = self.transport.send(Method::Get, url, None).await?;
        if !resp.is_success() {
            return Err(ApiError::Status { status: resp.status });
        }
        Ok(resp.body)
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        let body = self.get_text(&self.url(path)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send a mutating request and unwrap the `{ success, error, id }` envelope
    async fn mutate<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<MutationResponse> {
        let payload = match body {
            Some(b) => Some(serde_json::to_string(b)?),
            None => None,
        };
        let resp = self.transport.send(method, &self.url(path), payload).await?;
        // error responses usually still carry the envelope with a message
        let parsed = serde_json::from_str::<MutationResponse>(&resp.body);
        match parsed {
            Ok(envelope) if envelope.success => Ok(envelope),
            Ok(envelope) => Err(ApiError::Rejected(envelope.error)),
            Err(_) if !resp.is_success() => Err(ApiError::Status { status: resp.status }),
            Err(e) => Err(e.into()),
        }
    }
}
