//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of the repository ports:
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: a process-local store used when no database is configured
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. Reviewer selection rules stay in
//! the domain; adapters only apply them inside their own transaction scope.

pub mod memory;
pub mod persistence;
