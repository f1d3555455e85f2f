//! Infrastructure services

mod proxy_service;

pub use proxy_service::{CacheFillMode, OfflineCacheProxy, ProxyConfig, ProxyStats};
