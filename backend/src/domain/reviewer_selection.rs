//! Reviewer candidate pools and randomised selection.
//!
//! Pool construction is pure and shared by every adapter. Randomness comes
//! from a [`ReviewerPicker`] owned by the service instance, so tests can seed
//! it and assert exact outcomes.

use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::{PullRequest, User, UserId};

/// Reviewers selected when a pull request is opened.
pub const MAX_INITIAL_REVIEWERS: usize = 2;

/// Candidates for a new pull request: active teammates of the author.
///
/// `active_team` is expected to hold only active users; inactive entries are
/// skipped regardless.
pub fn creation_candidates(active_team: &[User], author_id: &UserId) -> Vec<UserId> {
    active_team
        .iter()
        .filter(|user| user.is_active && &user.id != author_id)
        .map(|user| user.id.clone())
        .collect()
}

/// Candidates to replace `replaced` on `pull_request`.
///
/// Draws from the replaced reviewer's active teammates, excluding the
/// replaced reviewer, the author, and anyone already reviewing.
pub fn reassignment_candidates(
    active_team: &[User],
    replaced: &UserId,
    pull_request: &PullRequest,
) -> Vec<UserId> {
    active_team
        .iter()
        .filter(|user| user.is_active)
        .map(|user| &user.id)
        .filter(|id| {
            *id != replaced && *id != &pull_request.author_id && !pull_request.has_reviewer(id)
        })
        .cloned()
        .collect()
}

/// Reviewer set rebuilt for an open pull request after a team deactivation.
///
/// Every active member of the author's team except the author. Not capped at
/// [`MAX_INITIAL_REVIEWERS`].
pub fn cascade_reviewers(active_author_team: &[User], author_id: &UserId) -> BTreeSet<UserId> {
    creation_candidates(active_author_team, author_id)
        .into_iter()
        .collect()
}

/// Seedable randomness source for reviewer selection.
///
/// The generator sits behind a mutex held only for the duration of one
/// selection, never across an `.await`.
#[derive(Debug)]
pub struct ReviewerPicker {
    rng: Mutex<StdRng>,
}

impl Default for ReviewerPicker {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl ReviewerPicker {
    /// Picker seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic picker for tests and reproducible deployments.
    ///
    /// # Examples
    /// ```
    /// use reviewer_service::domain::{ReviewerPicker, UserId};
    ///
    /// let ids: Vec<UserId> = ["b", "c", "d"]
    ///     .into_iter()
    ///     .map(|id| UserId::new(id).expect("valid id"))
    ///     .collect();
    /// let first = ReviewerPicker::seeded(7).sample(ids.clone(), 2);
    /// let second = ReviewerPicker::seeded(7).sample(ids, 2);
    /// assert_eq!(first, second);
    /// ```
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Pick `min(limit, candidates.len())` distinct ids uniformly at random.
    ///
    /// Uses a partial Fisher-Yates shuffle, so the input order does not bias
    /// the result.
    pub fn sample(&self, mut candidates: Vec<UserId>, limit: usize) -> Vec<UserId> {
        let amount = limit.min(candidates.len());
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let (chosen, _) = candidates.partial_shuffle(&mut *rng, amount);
        chosen.to_vec()
    }

    /// Pick one id uniformly at random, or `None` when the pool is empty.
    pub fn choose(&self, candidates: &[UserId]) -> Option<UserId> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        candidates.choose(&mut *rng).cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::domain::{PullRequestId, PullRequestName, TeamName, Username};
    use chrono::Utc;
    use rstest::{fixture, rstest};

    fn id(raw: &str) -> UserId {
        UserId::new(raw).expect("valid user id")
    }

    fn user(raw: &str, is_active: bool) -> User {
        User {
            id: id(raw),
            username: Username::new(format!("user-{raw}")).expect("valid username"),
            team_name: TeamName::new("core").expect("valid team"),
            is_active,
        }
    }

    #[fixture]
    fn core_team() -> Vec<User> {
        vec![user("a", true), user("b", true), user("c", true), user("d", true)]
    }

    #[rstest]
    fn creation_pool_excludes_author_and_inactive(mut core_team: Vec<User>) {
        core_team.push(user("e", false));
        let pool = creation_candidates(&core_team, &id("a"));
        assert_eq!(pool, vec![id("b"), id("c"), id("d")]);
    }

    #[rstest]
    fn reassignment_pool_excludes_replaced_author_and_current_reviewers(core_team: Vec<User>) {
        let mut pr = PullRequest::open(
            PullRequestId::new("pr1").expect("pr id"),
            PullRequestName::new("fix").expect("pr name"),
            id("a"),
            Utc::now(),
        );
        pr.reviewers = BTreeSet::from([id("b"), id("c")]);

        let pool = reassignment_candidates(&core_team, &id("b"), &pr);
        assert_eq!(pool, vec![id("d")]);
    }

    #[rstest]
    fn cascade_pool_is_not_capped(core_team: Vec<User>) {
        let repaired = cascade_reviewers(&core_team, &id("a"));
        assert_eq!(repaired.len(), 3);
        assert!(repaired.len() > MAX_INITIAL_REVIEWERS);
        assert!(!repaired.contains(&id("a")));
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(2, 2)]
    #[case(5, 2)]
    fn sample_returns_min_of_limit_and_pool(#[case] pool_size: usize, #[case] expected: usize) {
        let pool: Vec<UserId> = (0..pool_size).map(|n| id(&format!("u{n}"))).collect();
        let picked = ReviewerPicker::seeded(1).sample(pool, MAX_INITIAL_REVIEWERS);
        assert_eq!(picked.len(), expected);
        let distinct: BTreeSet<_> = picked.iter().collect();
        assert_eq!(distinct.len(), expected);
    }

    #[rstest]
    fn same_seed_gives_same_selection() {
        let pool = vec![id("b"), id("c"), id("d"), id("e")];
        let first = ReviewerPicker::seeded(42).sample(pool.clone(), 2);
        let second = ReviewerPicker::seeded(42).sample(pool, 2);
        assert_eq!(first, second);
    }

    #[rstest]
    fn choose_returns_none_for_empty_pool() {
        assert!(ReviewerPicker::seeded(3).choose(&[]).is_none());
    }

    #[rstest]
    fn sampling_reaches_every_candidate() {
        let picker = ReviewerPicker::seeded(9);
        let pool = vec![id("b"), id("c"), id("d")];
        let mut hits: HashMap<UserId, usize> = HashMap::new();
        for _ in 0..300 {
            for picked in picker.sample(pool.clone(), 2) {
                *hits.entry(picked).or_default() += 1;
            }
        }
        // Each candidate is expected 200 times; allow a wide margin.
        for candidate in &pool {
            let count = hits.get(candidate).copied().unwrap_or_default();
            assert!((120..=280).contains(&count), "{candidate} picked {count} times");
        }
    }
}
