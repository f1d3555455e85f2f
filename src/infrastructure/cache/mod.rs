//! Cache infrastructure - Cache storage implementations

mod in_memory;

pub use in_memory::{InMemoryCacheStorage, InMemoryCacheStore};
