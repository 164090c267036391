//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When the
//! migrations change, regenerate with `diesel print-schema` or edit by hand.

diesel::table! {
    /// Teams, keyed by their unique name.
    teams (name) {
        name -> Varchar,
    }
}

diesel::table! {
    /// Users; each belongs to exactly one team.
    users (user_id) {
        user_id -> Varchar,
        username -> Text,
        team_name -> Varchar,
        is_active -> Bool,
    }
}

diesel::table! {
    /// Pull requests. `merged_at` is set exactly when `status` is `MERGED`.
    pull_requests (pull_request_id) {
        pull_request_id -> Varchar,
        pull_request_name -> Text,
        author_id -> Varchar,
        /// Either `OPEN` or `MERGED` (enforced by a check constraint).
        status -> Varchar,
        created_at -> Timestamptz,
        merged_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Reviewer relation; the composite key forbids duplicate assignments.
    pull_request_reviewers (pull_request_id, user_id) {
        pull_request_id -> Varchar,
        user_id -> Varchar,
    }
}

diesel::joinable!(users -> teams (team_name));
diesel::joinable!(pull_requests -> users (author_id));
diesel::joinable!(pull_request_reviewers -> pull_requests (pull_request_id));
diesel::joinable!(pull_request_reviewers -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(teams, users, pull_requests, pull_request_reviewers);
