//! PMP Offline Proxy
//!
//! A cache-first proxy that keeps applications usable offline with support for:
//! - Versioned cache stores with an install/activate lifecycle
//! - Precaching an application shell manifest at install time
//! - Cache-first request interception with network fallback and cache fill
//! - A synthesized offline notice when the network is unreachable

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::DomainError;
pub use infrastructure::services::{CacheFillMode, OfflineCacheProxy, ProxyConfig, ProxyStats};

use std::sync::Arc;

use domain::{CacheStorage, NetworkClient};
use infrastructure::cache::InMemoryCacheStorage;
use infrastructure::network::HttpNetworkClient;

/// Create a proxy backed by in-memory cache stores and a real HTTP client
pub fn create_proxy(config: ProxyConfig) -> OfflineCacheProxy {
    let storage: Arc<dyn CacheStorage> = Arc::new(InMemoryCacheStorage::new());
    let network: Arc<dyn NetworkClient> = Arc::new(HttpNetworkClient::new(&config.scope));

    OfflineCacheProxy::new(storage, network, config)
}
