//! Fetch domain - Requests, responses, and the network seam

mod client;
mod request;
mod response;

pub use client::NetworkClient;
pub use request::{Method, Request};
pub use response::{Response, ResponseType};

#[cfg(test)]
pub use client::mock::MockNetworkClient;
