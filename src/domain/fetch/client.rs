//! Network client trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::fetch::{Request, Response};

/// Trait for issuing network fetches (for mocking)
#[async_trait]
pub trait NetworkClient: Send + Sync + Debug {
    /// Issues the request over the network.
    ///
    /// HTTP error statuses are ordinary `Ok` responses. `Err` means no
    /// response was received at all: connection failure, DNS failure,
    /// timeout.
    async fn fetch(&self, request: &Request) -> Result<Response, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// Mock network client for testing.
    ///
    /// Routes are keyed by absolute URL. Every fetch is recorded, so tests
    /// can assert whether (and how often) the network was reached.
    #[derive(Debug)]
    pub struct MockNetworkClient {
        responses: RwLock<HashMap<String, Response>>,
        errors: RwLock<HashMap<String, String>>,
        calls: RwLock<Vec<String>>,
    }

    impl MockNetworkClient {
        pub fn new() -> Self {
            Self {
                responses: RwLock::new(HashMap::new()),
                errors: RwLock::new(HashMap::new()),
                calls: RwLock::new(Vec::new()),
            }
        }

        pub fn with_response(self, url: impl Into<String>, response: Response) -> Self {
            self.responses.write().unwrap().insert(url.into(), response);
            self
        }

        pub fn with_error(self, url: impl Into<String>, error: impl Into<String>) -> Self {
            self.errors.write().unwrap().insert(url.into(), error.into());
            self
        }

        /// Total number of fetches issued
        pub fn fetch_count(&self) -> usize {
            self.calls.read().unwrap().len()
        }

        /// Number of fetches issued for one URL
        pub fn fetch_count_for(&self, url: &str) -> usize {
            self.calls.read().unwrap().iter().filter(|u| *u == url).count()
        }

        /// URLs fetched, in call order
        pub fn requests_seen(&self) -> Vec<String> {
            self.calls.read().unwrap().clone()
        }
    }

    impl Default for MockNetworkClient {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl NetworkClient for MockNetworkClient {
        async fn fetch(&self, request: &Request) -> Result<Response, DomainError> {
            let url = request.url().as_str().to_string();
            self.calls.write().unwrap().push(url.clone());

            if let Some(error) = self.errors.read().unwrap().get(&url) {
                return Err(DomainError::network(&url, error));
            }

            self.responses
                .read()
                .unwrap()
                .get(&url)
                .map(Response::duplicate)
                .ok_or_else(|| DomainError::network(&url, "No mock response"))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::domain::fetch::ResponseType;
        use url::Url;

        fn request(url: &str) -> Request {
            Request::get(Url::parse(url).unwrap())
        }

        fn response(url: &str) -> Response {
            Response::new(200, Url::parse(url).unwrap(), ResponseType::Basic).with_body("hello")
        }

        #[tokio::test]
        async fn test_mock_client_returns_configured_response() {
            let client = MockNetworkClient::new()
                .with_response("https://example.com/a", response("https://example.com/a"));

            let fetched = client.fetch(&request("https://example.com/a")).await.unwrap();
            assert_eq!(fetched.status(), 200);
            assert_eq!(fetched.into_body(), "hello");
        }

        #[tokio::test]
        async fn test_mock_client_serves_same_route_repeatedly() {
            let client = MockNetworkClient::new()
                .with_response("https://example.com/a", response("https://example.com/a"));

            let first = client.fetch(&request("https://example.com/a")).await.unwrap();
            let second = client.fetch(&request("https://example.com/a")).await.unwrap();
            assert_eq!(first.into_body(), second.into_body());
        }

        #[tokio::test]
        async fn test_mock_client_counts_fetches() {
            let client = MockNetworkClient::new()
                .with_response("https://example.com/a", response("https://example.com/a"))
                .with_response("https://example.com/b", response("https://example.com/b"));

            client.fetch(&request("https://example.com/a")).await.unwrap();
            client.fetch(&request("https://example.com/a")).await.unwrap();
            client.fetch(&request("https://example.com/b")).await.unwrap();

            assert_eq!(client.fetch_count(), 3);
            assert_eq!(client.fetch_count_for("https://example.com/a"), 2);
            assert_eq!(client.fetch_count_for("https://example.com/b"), 1);
            assert_eq!(client.fetch_count_for("https://example.com/c"), 0);
        }

        #[tokio::test]
        async fn test_mock_client_with_error() {
            let client =
                MockNetworkClient::new().with_error("https://example.com/down", "Connection refused");

            let result = client.fetch(&request("https://example.com/down")).await;
            assert!(matches!(result, Err(DomainError::Network { .. })));
            assert_eq!(client.fetch_count(), 1);
        }

        #[tokio::test]
        async fn test_mock_client_unrouted_url_errors() {
            let client = MockNetworkClient::new();

            let result = client.fetch(&request("https://example.com/missing")).await;
            assert!(result.is_err());
        }
    }
}
