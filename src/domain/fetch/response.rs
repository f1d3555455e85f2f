//! Fetched response representation

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use url::Url;

/// Body of the synthesized offline notice
const OFFLINE_NOTICE_BODY: &str = "<h1>Offline</h1><p>This page is not available offline.</p>";

/// Classification of a fetched response relative to the registration scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    /// Same-origin, not redirect-tainted; the only type eligible for cache fill
    Basic,
    /// Cross-origin
    Cors,
    /// Same-origin request redirected off-origin
    OpaqueRedirect,
    /// Synthesized locally, never fetched
    Default,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Cors => "cors",
            Self::OpaqueRedirect => "opaqueredirect",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A complete fetched (or synthesized) response.
///
/// The body is single-consumption: `into_body` takes the response by value,
/// so a `Response` cannot be read twice. Any path that both returns a
/// response and stores it must call `duplicate` first and hand each copy to
/// exactly one consumer. There is deliberately no `Clone` impl.
#[derive(Debug, PartialEq, Eq)]
pub struct Response {
    status: u16,
    headers: HashMap<String, String>,
    body: Bytes,
    response_type: ResponseType,
    url: Url,
}

impl Response {
    pub fn new(status: u16, url: Url, response_type: ResponseType) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Bytes::new(),
            response_type,
            url,
        }
    }

    /// Adds a header, replacing any previous value for the same name
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// The response served in place of a network failure: a minimal HTML
    /// notice with status 200
    pub fn offline_notice(url: Url) -> Self {
        Self::new(200, url, ResponseType::Default)
            .with_header("Content-Type", "text/html")
            .with_body(OFFLINE_NOTICE_BODY)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn response_type(&self) -> ResponseType {
        self.response_type
    }

    /// Header lookup by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether this response may be written back into the cache on a miss:
    /// exactly status 200 and a basic (same-origin) type. Opaque,
    /// cross-origin, redirect-tainted, and error responses are excluded so
    /// the cache never holds non-reusable data.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.response_type == ResponseType::Basic
    }

    /// Produces an independently readable copy.
    ///
    /// This is the only way to obtain two responses for two consumers; body
    /// buffers are immutable and shared, so the copy is cheap.
    pub fn duplicate(&self) -> Self {
        Self {
            status: self.status,
            headers: self.headers.clone(),
            body: self.body.clone(),
            response_type: self.response_type,
            url: self.url.clone(),
        }
    }

    /// Consumes the response, yielding its body
    pub fn into_body(self) -> Bytes {
        self.body
    }
}
