//! Pull request reviewer assignment service.
//!
//! The domain assigns reviewers from the author's team, keeps reviewer sets
//! valid across reassignment and team deactivation, and exposes the result
//! over a small JSON API.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
