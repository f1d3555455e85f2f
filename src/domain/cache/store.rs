//! Cache store and storage trait definitions

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::fetch::{Request, Response};

/// A named, versioned container of request/response pairs.
///
/// Entries are keyed by request identity (method plus URL) and hold complete
/// response representations. Writes overwrite, last write wins.
#[async_trait]
pub trait CacheStore: Send + Sync + Debug {
    /// Name of this store, version identifier included
    fn name(&self) -> &str;

    /// Looks up the response stored for a request, returning an
    /// independently readable copy
    async fn match_request(&self, request: &Request) -> Result<Option<Response>, DomainError>;

    /// Inserts or overwrites the response stored for a request
    async fn put(&self, request: &Request, response: Response) -> Result<(), DomainError>;

    /// Checks for an entry without handing out a copy
    async fn has(&self, request: &Request) -> Result<bool, DomainError> {
        Ok(self.match_request(request).await?.is_some())
    }

    /// Cache keys of all entries
    async fn keys(&self) -> Result<Vec<String>, DomainError>;

    /// Number of entries
    async fn size(&self) -> Result<usize, DomainError>;
}

/// The storage partition holding every cache store the proxy can reach
#[async_trait]
pub trait CacheStorage: Send + Sync + Debug {
    /// Opens a named store, creating it if absent
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheStore>, DomainError>;

    /// Names of all existing stores, in creation order
    async fn names(&self) -> Result<Vec<String>, DomainError>;

    /// Deletes a named store and all its entries; false if it did not exist
    async fn delete(&self, name: &str) -> Result<bool, DomainError>;

    /// Whether a store with this name exists
    async fn contains(&self, name: &str) -> Result<bool, DomainError> {
        Ok(self.names().await?.iter().any(|n| n == name))
    }

    /// Looks a request up across every store, in store creation order
    async fn match_any(&self, request: &Request) -> Result<Option<Response>, DomainError> {
        for name in self.names().await? {
            let store = self.open(&name).await?;
            if let Some(response) = store.match_request(request).await? {
                return Ok(Some(response));
            }
        }
        Ok(None)
    }
}
