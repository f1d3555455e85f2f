//! In-memory cache storage implementation

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{CacheStore, CacheStorage, DomainError, Request, Response};

/// In-process cache storage backed by plain maps.
///
/// Stores live for the lifetime of the process; enumeration preserves store
/// creation order. Individual key writes take the store lock only for the
/// map operation, so concurrent interceptions interleave freely with
/// last-write-wins semantics.
#[derive(Debug, Default)]
pub struct InMemoryCacheStorage {
    stores: RwLock<Vec<Arc<InMemoryCacheStore>>>,
}

impl InMemoryCacheStorage {
    /// Creates an empty storage partition
    pub fn new() -> Self {
        Self {
            stores: RwLock::new(Vec::new()),
        }
    }
}

/// A single named store inside [`InMemoryCacheStorage`]
#[derive(Debug)]
pub struct InMemoryCacheStore {
    name: String,
    entries: RwLock<HashMap<String, Response>>,
}

impl InMemoryCacheStore {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CacheStorage for InMemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheStore>, DomainError> {
        let mut stores = self
            .stores
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        if let Some(store) = stores.iter().find(|s| s.name == name) {
            return Ok(store.clone() as Arc<dyn CacheStore>);
        }

        debug!(cache = %name, "Created cache store");
        let store = Arc::new(InMemoryCacheStore::new(name));
        stores.push(store.clone());
        Ok(store)
    }

    async fn names(&self) -> Result<Vec<String>, DomainError> {
        let stores = self
            .stores
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        Ok(stores.iter().map(|s| s.name.clone()).collect())
    }

    async fn delete(&self, name: &str) -> Result<bool, DomainError> {
        let mut stores = self
            .stores
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        let before = stores.len();
        stores.retain(|s| s.name != name);
        Ok(stores.len() < before)
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn match_request(&self, request: &Request) -> Result<Option<Response>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        Ok(entries.get(&request.cache_key()).map(Response::duplicate))
    }

    async fn put(&self, request: &Request, response: Response) -> Result<(), DomainError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        entries.insert(request.cache_key(), response);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        Ok(entries.keys().cloned().collect())
    }

    async fn size(&self) -> Result<usize, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        Ok(entries.len())
    }
}
