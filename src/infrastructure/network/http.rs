//! HTTP network client implementation

use std::time::Duration;

use async_trait::async_trait;
use url::{Origin, Url};

use crate::domain::{DomainError, Method, NetworkClient, Request, Response, ResponseType};

/// Network client backed by reqwest.
///
/// Responses are classified against the registration scope origin: a
/// response whose final URL stayed on the scope origin is `Basic`, a
/// cross-origin request yields `Cors`, and a same-origin request whose
/// redirect chain left the origin yields `OpaqueRedirect`. Transport
/// failures map to network errors; HTTP error statuses are ordinary
/// responses.
#[derive(Debug, Clone)]
pub struct HttpNetworkClient {
    client: reqwest::Client,
    scope_origin: Origin,
}

impl HttpNetworkClient {
    pub fn new(scope: &Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            scope_origin: scope.origin(),
        }
    }

    pub fn with_timeout(scope: &Url, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            scope_origin: scope.origin(),
        }
    }

    fn classify(&self, request: &Request, final_url: &Url) -> ResponseType {
        if final_url.origin() == self.scope_origin {
            ResponseType::Basic
        } else if request.origin() == self.scope_origin {
            ResponseType::OpaqueRedirect
        } else {
            ResponseType::Cors
        }
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Head => reqwest::Method::HEAD,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Options => reqwest::Method::OPTIONS,
        Method::Patch => reqwest::Method::PATCH,
    }
}

#[async_trait]
impl NetworkClient for HttpNetworkClient {
    async fn fetch(&self, request: &Request) -> Result<Response, DomainError> {
        let outcome = self
            .client
            .request(to_reqwest_method(request.method()), request.url().clone())
            .send()
            .await
            .map_err(|e| {
                DomainError::network(request.url().as_str(), format!("Request failed: {}", e))
            })?;

        let status = outcome.status().as_u16();
        let final_url = outcome.url().clone();

        let mut response =
            Response::new(status, final_url.clone(), self.classify(request, &final_url));
        for (name, value) in outcome.headers() {
            if let Ok(value) = value.to_str() {
                response = response.with_header(name.as_str(), value);
            }
        }

        let body = outcome.bytes().await.map_err(|e| {
            DomainError::network(request.url().as_str(), format!("Failed to read body: {}", e))
        })?;

        Ok(response.with_body(body))
    }
}
