//! Port for the team deactivation cascade.
//!
//! Selecting the team's active members, deactivating them and repairing the
//! reviewer sets that referenced them must commit together, so the whole
//! cascade is a single port call that adapters run inside one transaction.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{PullRequestId, TeamName, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by deactivation adapters.
    pub enum DeactivationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "deactivation repository connection failed: {message}",
        /// Query or mutation failed; nothing was committed.
        Query { message: String } => "deactivation repository query failed: {message}",
    }
}

/// What a cascade changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeactivationReport {
    /// Users flipped to inactive.
    pub deactivated: Vec<UserId>,
    /// Open pull requests whose reviewer set was rebuilt.
    pub repaired_pull_requests: Vec<PullRequestId>,
}

/// Atomic deactivation plus reviewer repair.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeactivationRepository: Send + Sync {
    /// In one transaction:
    ///
    /// 1. mark every user currently active in `team_name` inactive, selecting
    ///    them by team at write time;
    /// 2. for every OPEN pull request reviewed by any of them, delete all
    ///    reviewer relations and insert
    ///    [`crate::domain::cascade_reviewers`] computed from the currently
    ///    active members of the author's team.
    ///
    /// A team with no active members (or no such team) yields an empty
    /// report. Merged pull requests are never touched.
    async fn deactivate_and_repair(
        &self,
        team_name: &TeamName,
    ) -> Result<DeactivationReport, DeactivationRepositoryError>;
}
