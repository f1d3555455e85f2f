//! Outgoing request descriptor

use std::fmt;

use url::{Origin, Url};

use crate::domain::DomainError;

/// HTTP method of an intercepted request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Options,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An outgoing request intercepted by the proxy.
///
/// Doubles as the cache key: two requests with the same method and URL
/// address the same cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Request {
    url: Url,
    method: Method,
}

impl Request {
    pub fn new(method: Method, url: Url) -> Self {
        Self { url, method }
    }

    /// Creates a GET request, the common case for interception
    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    /// Parses an absolute URL into a GET request
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let url = Url::parse(input)
            .map_err(|e| DomainError::configuration(format!("Invalid URL '{}': {}", input, e)))?;
        Ok(Self::get(url))
    }

    /// Resolves a manifest entry against the registration scope.
    ///
    /// Entries may be absolute URLs or paths relative to the scope.
    pub fn from_manifest_entry(scope: &Url, entry: &str) -> Result<Self, DomainError> {
        let url = scope.join(entry).map_err(|e| {
            DomainError::configuration(format!("Invalid manifest entry '{}': {}", entry, e))
        })?;
        Ok(Self::get(url))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Key identifying this request in a cache store
    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    /// Origin of the request target
    pub fn origin(&self) -> Origin {
        self.url.origin()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}
