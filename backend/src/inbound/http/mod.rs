//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod extractors;
pub mod health;
pub mod pull_requests;
pub mod state;
pub mod stats;
pub mod teams;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;
