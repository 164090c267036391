//! Extractor configuration for request bodies and query strings.
//!
//! Actix rejects malformed input with plain-text bodies by default. These
//! handlers turn payload and query failures into the shared JSON error
//! envelope, including identifier validation failures raised while
//! deserialising newtypes such as `UserId`.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use serde_json::json;

use crate::domain::Error;

fn invalid_body(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid request body: {err}"))
        .with_details(json!({ "code": "invalid_body" }))
        .into()
}

fn invalid_query(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid query string: {err}"))
        .with_details(json!({ "code": "invalid_query" }))
        .into()
}

/// JSON extractor settings shared by every handler.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(invalid_body)
}

/// Query extractor settings shared by every handler.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(invalid_query)
}
