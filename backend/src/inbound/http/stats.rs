//! Aggregate statistics handler.

use std::collections::BTreeMap;

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, ReviewStats};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Response body for `GET /stats`.
///
/// Both maps are keyed by plain strings so the JSON stays stable regardless
/// of how identifiers are modelled internally.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsBody {
    /// Reviewer relation rows per user id.
    pub reviewer_assignments: BTreeMap<String, u64>,
    /// Pull requests per status.
    pub pr_status: BTreeMap<String, u64>,
    pub total_assignments: u64,
}

impl From<ReviewStats> for StatsBody {
    fn from(stats: ReviewStats) -> Self {
        let total_assignments = stats.total_assignments();
        Self {
            reviewer_assignments: stats
                .reviewer_counts
                .into_iter()
                .map(|(user, count)| (user.to_string(), count))
                .collect(),
            pr_status: stats
                .status_counts
                .into_iter()
                .map(|(status, count)| (status.as_str().to_owned(), count))
                .collect(),
            total_assignments,
        }
    }
}

/// Reviewer assignment counts and pull request status counts.
#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Consistent snapshot of assignment counters", body = StatsBody),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["stats"],
    operation_id = "getStats"
)]
#[get("/stats")]
pub async fn get_stats(state: web::Data<HttpState>) -> ApiResult<web::Json<StatsBody>> {
    let stats = state.reviews.stats().await?;
    Ok(web::Json(stats.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PullRequestStatus, UserId};
    use crate::inbound::http::test_utils::{MockPorts, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[actix_web::test]
    async fn stats_are_flattened_to_string_keys() {
        let mut ports = MockPorts::default();
        ports.reviews.expect_stats().times(1).returning(|| {
            Ok(ReviewStats {
                reviewer_counts: BTreeMap::from([
                    (UserId::new("u2").expect("user id"), 2),
                    (UserId::new("u3").expect("user id"), 1),
                ]),
                status_counts: BTreeMap::from([
                    (PullRequestStatus::Open, 1),
                    (PullRequestStatus::Merged, 1),
                ]),
            })
        });
        let app = actix_test::init_service(test_app(ports).service(get_stats)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/stats").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["reviewerAssignments"], json!({"u2": 2, "u3": 1}));
        assert_eq!(body["prStatus"], json!({"OPEN": 1, "MERGED": 1}));
        assert_eq!(body["totalAssignments"], 3);
    }

    #[rstest]
    #[actix_web::test]
    async fn storage_outage_maps_to_service_unavailable() {
        let mut ports = MockPorts::default();
        ports
            .reviews
            .expect_stats()
            .returning(|| Err(Error::service_unavailable("database unreachable")));
        let app = actix_test::init_service(test_app(ports).service(get_stats)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/stats").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
