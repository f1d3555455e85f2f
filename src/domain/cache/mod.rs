//! Cache domain - Versioned request/response stores

mod store;

pub use store::{CacheStore, CacheStorage};

#[cfg(test)]
pub use store::mock::MockCacheStorage;
