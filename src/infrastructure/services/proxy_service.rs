//! Offline cache proxy service

use std::sync::{Arc, RwLock};

use futures::future::{join_all, try_join_all};
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::{
    CacheStorage, DomainError, LifecycleState, NetworkClient, Request, Response,
};

/// Prefix shared by every cache store this proxy manages
const CACHE_NAME_PREFIX: &str = "app-cache-";

/// When a fetched response is written back into the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheFillMode {
    /// Write in a detached task; the response is returned before the write
    /// lands
    #[default]
    Detached,
    /// Wait for the write before returning; a write failure is still only
    /// logged
    Awaited,
}

/// Configuration for the offline cache proxy
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Registration scope. Relative manifest entries resolve against it and
    /// its origin defines which responses count as same-origin.
    pub scope: Url,
    /// Version identifier embedded in the cache store name. Must change
    /// whenever the manifest contents change to force invalidation at the
    /// next activation.
    pub cache_version: String,
    /// Resources precached at install time
    pub precache_manifest: Vec<String>,
    /// Cache fill behavior on a miss
    pub fill_mode: CacheFillMode,
}

impl ProxyConfig {
    pub fn new(scope: Url, cache_version: impl Into<String>) -> Self {
        Self {
            scope,
            cache_version: cache_version.into(),
            precache_manifest: Vec::new(),
            fill_mode: CacheFillMode::default(),
        }
    }

    /// Sets the precache manifest
    pub fn with_manifest<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.precache_manifest = entries.into_iter().map(Into::into).collect();
        self
    }

    /// Waits for cache fills instead of detaching them
    pub fn with_awaited_fill(mut self) -> Self {
        self.fill_mode = CacheFillMode::Awaited;
        self
    }

    /// Name of the cache store for this configuration's version
    pub fn cache_name(&self) -> String {
        format!("{}{}", CACHE_NAME_PREFIX, self.cache_version)
    }
}

/// Cache-first offline proxy.
///
/// Owns one versioned cache store inside a shared storage partition and
/// drives the install / activate / fetch-interception lifecycle:
///
/// - `install` precaches the resource manifest into the versioned store
/// - `activate` deletes every store belonging to another version
/// - `handle_fetch` answers requests cache-first, falls back to the network,
///   opportunistically fills the cache, and serves an offline notice when
///   the network is unreachable
#[derive(Debug)]
pub struct OfflineCacheProxy {
    storage: Arc<dyn CacheStorage>,
    network: Arc<dyn NetworkClient>,
    config: ProxyConfig,
    state: RwLock<LifecycleState>,
}

impl OfflineCacheProxy {
    pub fn new(
        storage: Arc<dyn CacheStorage>,
        network: Arc<dyn NetworkClient>,
        config: ProxyConfig,
    ) -> Self {
        Self {
            storage,
            network,
            config,
            state: RwLock::new(LifecycleState::Uninstalled),
        }
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Name of the store owned by this proxy's version
    pub fn cache_name(&self) -> String {
        self.config.cache_name()
    }

    /// Current lifecycle state
    pub fn state(&self) -> Result<LifecycleState, DomainError> {
        Ok(*self
            .state
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?)
    }

    fn set_state(&self, next: LifecycleState) -> Result<(), DomainError> {
        *self
            .state
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))? = next;
        Ok(())
    }

    /// Checks the guard and enters the next state while holding the write
    /// lock, so concurrent callers serialize on the transition
    fn try_transition(
        &self,
        allowed: fn(&LifecycleState) -> bool,
        next: LifecycleState,
        operation: &str,
    ) -> Result<(), DomainError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        if !allowed(&state) {
            return Err(DomainError::lifecycle(format!(
                "Cannot {} from state {}",
                operation, *state
            )));
        }

        *state = next;
        Ok(())
    }

    /// Precaches the resource manifest into this version's store.
    ///
    /// Fails as a whole if any manifest resource cannot be fetched or
    /// returns a non-success status; the state then reverts to
    /// `Uninstalled` so the embedder can retry.
    pub async fn install(&self) -> Result<(), DomainError> {
        self.try_transition(
            LifecycleState::can_install,
            LifecycleState::Installing,
            "install",
        )?;

        let cache_name = self.cache_name();
        info!(
            cache = %cache_name,
            resources = self.config.precache_manifest.len(),
            "Installing: precaching application shell"
        );

        match self.precache(&cache_name).await {
            Ok(()) => {
                self.set_state(LifecycleState::Installed)?;
                info!(cache = %cache_name, "Install complete, waiting to activate");
                Ok(())
            }
            Err(error) => {
                self.set_state(LifecycleState::Uninstalled)?;
                warn!(cache = %cache_name, error = %error, "Install failed");
                Err(error)
            }
        }
    }

    async fn precache(&self, cache_name: &str) -> Result<(), DomainError> {
        let requests = self
            .config
            .precache_manifest
            .iter()
            .map(|entry| Request::from_manifest_entry(&self.config.scope, entry))
            .collect::<Result<Vec<_>, _>>()?;

        let store = self.storage.open(cache_name).await?;

        // All fetches run concurrently; the first failure aborts the batch.
        // Unlike runtime fills, precaching accepts any response type, so
        // cross-origin manifest entries land in the store too.
        let fetches = requests.iter().map(|request| async move {
            let response = self.network.fetch(request).await?;
            if !response.is_success() {
                return Err(DomainError::network(
                    request.url().as_str(),
                    format!("Precache fetch returned status {}", response.status()),
                ));
            }
            Ok(response)
        });
        let responses = try_join_all(fetches).await?;

        for (request, response) in requests.iter().zip(responses) {
            store.put(request, response).await?;
        }

        Ok(())
    }

    /// Deletes every cache store belonging to another version, then starts
    /// intercepting requests.
    ///
    /// Deletions run in parallel and are independent: one failing is logged
    /// and does not block the others or fail the activation. Only a failure
    /// to enumerate store names aborts, reverting the state to `Installed`.
    pub async fn activate(&self) -> Result<(), DomainError> {
        self.try_transition(
            LifecycleState::can_activate,
            LifecycleState::Activating,
            "activate",
        )?;

        let current = self.cache_name();
        let names = match self.storage.names().await {
            Ok(names) => names,
            Err(error) => {
                self.set_state(LifecycleState::Installed)?;
                warn!(error = %error, "Activation failed to enumerate cache stores");
                return Err(error);
            }
        };

        let stale: Vec<String> = names.into_iter().filter(|name| *name != current).collect();
        let deletions = stale.iter().map(|name| {
            let storage = self.storage.clone();
            async move { (name, storage.delete(name).await) }
        });

        for (name, result) in join_all(deletions).await {
            match result {
                Ok(true) => info!(cache = %name, "Deleted stale cache store"),
                Ok(false) => debug!(cache = %name, "Stale cache store already gone"),
                Err(error) => {
                    warn!(cache = %name, error = %error, "Failed to delete stale cache store")
                }
            }
        }

        self.set_state(LifecycleState::Active)?;
        info!(cache = %current, "Activation complete, proxy is controlling requests");
        Ok(())
    }

    /// Resolves a request cache-first.
    ///
    /// Strict order, first match wins: a cached response from any store; the
    /// network response (filled into the current store when it is a
    /// status-200 basic response); the synthesized offline notice when the
    /// network is unreachable. HTTP error statuses pass through as-is,
    /// uncached.
    pub async fn handle_fetch(&self, request: Request) -> Result<Response, DomainError> {
        let state = self.state()?;
        if !state.can_intercept() {
            return Err(DomainError::lifecycle(format!(
                "Cannot intercept requests in state {}",
                state
            )));
        }

        if let Some(cached) = self.storage.match_any(&request).await? {
            debug!(url = %request.url(), "Cache hit");
            return Ok(cached);
        }

        debug!(url = %request.url(), "Cache miss, fetching from network");
        match self.network.fetch(&request).await {
            Ok(response) => {
                if !response.is_cacheable() {
                    debug!(
                        url = %request.url(),
                        status = response.status(),
                        response_type = %response.response_type(),
                        "Response not eligible for cache fill"
                    );
                    return Ok(response);
                }

                let copy = response.duplicate();
                self.fill_cache(request, copy).await;
                Ok(response)
            }
            Err(error) if error.is_network() => {
                warn!(url = %request.url(), error = %error, "Network unreachable, serving offline notice");
                Ok(Response::offline_notice(request.url().clone()))
            }
            Err(error) => Err(error),
        }
    }

    /// Writes a duplicate of a fetched response into the current store.
    ///
    /// In detached mode the write happens in a background task and the
    /// caller returns immediately. In both modes a write failure is logged
    /// and never reaches the fetch caller.
    async fn fill_cache(&self, request: Request, response: Response) {
        let storage = self.storage.clone();
        let cache_name = self.cache_name();

        let fill = async move {
            let outcome = match storage.open(&cache_name).await {
                Ok(store) => store.put(&request, response).await,
                Err(error) => Err(error),
            };
            if let Err(error) = outcome {
                warn!(cache = %cache_name, url = %request.url(), error = %error, "Cache fill failed");
            }
        };

        match self.config.fill_mode {
            CacheFillMode::Detached => {
                tokio::spawn(fill);
            }
            CacheFillMode::Awaited => fill.await,
        }
    }

    /// Counters for this version's store
    pub async fn stats(&self) -> Result<ProxyStats, DomainError> {
        let cache_name = self.cache_name();
        let entries = if self.storage.contains(&cache_name).await? {
            self.storage.open(&cache_name).await?.size().await?
        } else {
            0
        };

        Ok(ProxyStats {
            state: self.state()?,
            cache_name,
            entries,
        })
    }
}

/// Proxy statistics
#[derive(Debug, Clone)]
pub struct ProxyStats {
    /// Current lifecycle state
    pub state: LifecycleState,
    /// Name of the current version's store
    pub cache_name: String,
    /// Number of entries in the current version's store
    pub entries: usize,
}
