//! Network infrastructure - Outbound fetch implementations

mod http;

pub use http::HttpNetworkClient;
