//! Driving port for read-only review queries.

use async_trait::async_trait;

use crate::domain::{Error, PullRequestSummary, ReviewStats, UserId};

/// Read side of the review workflow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewQuery: Send + Sync {
    /// Every pull request, in any status, the user reviews, ordered by id.
    ///
    /// An unknown user simply has no reviews.
    async fn reviewed_by(&self, user_id: &UserId) -> Result<Vec<PullRequestSummary>, Error>;

    /// Assignment counts per reviewer and pull request counts per status.
    async fn stats(&self) -> Result<ReviewStats, Error>;
}
