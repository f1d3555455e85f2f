//! Domain layer - Core types and trait seams

pub mod cache;
pub mod error;
pub mod fetch;
pub mod lifecycle;

pub use cache::{CacheStore, CacheStorage};
pub use error::DomainError;
pub use fetch::{Method, NetworkClient, Request, Response, ResponseType};
pub use lifecycle::LifecycleState;
