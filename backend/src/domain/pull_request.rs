//! Pull request entity and read models.
//!
//! ## Invariants
//! - The author never appears in `reviewers`.
//! - `merged_at` is `Some` exactly when `status` is [`PullRequestStatus::Merged`].
//! - Once merged, the reviewer set is frozen.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::UserId;
use super::identifier::string_identifier;

string_identifier! {
    /// Globally unique pull request identifier.
    PullRequestId, "pull request id"
}

string_identifier! {
    /// Pull request title.
    PullRequestName, "pull request name"
}

/// Lifecycle state of a pull request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestStatus {
    /// Under review; reviewers may change.
    Open,
    /// Merged; reviewers are frozen.
    Merged,
}

impl PullRequestStatus {
    /// Storage and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Merged => "MERGED",
        }
    }
}

impl fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pull request status: {0}")]
pub struct UnknownStatusError(pub String);

impl FromStr for PullRequestStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "MERGED" => Ok(Self::Merged),
            other => Err(UnknownStatusError(other.to_owned())),
        }
    }
}

/// Full pull request record including its reviewer set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub id: PullRequestId,
    pub name: PullRequestName,
    pub author_id: UserId,
    pub status: PullRequestStatus,
    #[schema(value_type = Vec<String>)]
    pub reviewers: BTreeSet<UserId>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// A freshly opened pull request with no reviewers yet.
    pub fn open(
        id: PullRequestId,
        name: PullRequestName,
        author_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            author_id,
            status: PullRequestStatus::Open,
            reviewers: BTreeSet::new(),
            created_at,
            merged_at: None,
        }
    }

    /// Whether the pull request has been merged.
    pub fn is_merged(&self) -> bool {
        self.status == PullRequestStatus::Merged
    }

    /// Whether `user_id` is currently assigned as a reviewer.
    pub fn has_reviewer(&self, user_id: &UserId) -> bool {
        self.reviewers.contains(user_id)
    }

    /// Project the list view used by reviewer queries.
    pub fn summary(&self) -> PullRequestSummary {
        PullRequestSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            author_id: self.author_id.clone(),
            status: self.status,
        }
    }
}

/// Compact pull request view without reviewers or timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestSummary {
    pub id: PullRequestId,
    pub name: PullRequestName,
    pub author_id: UserId,
    pub status: PullRequestStatus,
}

/// Aggregate counters over reviewer assignments and pull request states.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    /// Reviewer relation rows per user, across every pull request.
    #[schema(value_type = std::collections::BTreeMap<String, u64>)]
    pub reviewer_counts: BTreeMap<UserId, u64>,
    /// Pull requests per status.
    #[schema(value_type = std::collections::BTreeMap<String, u64>)]
    pub status_counts: BTreeMap<PullRequestStatus, u64>,
}

impl ReviewStats {
    /// Total number of reviewer relation rows represented by the snapshot.
    pub fn total_assignments(&self) -> u64 {
        self.reviewer_counts.values().sum()
    }
}
