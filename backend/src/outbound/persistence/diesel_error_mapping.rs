//! Shared classification of pool and Diesel failures.
//!
//! Repositories turn a [`StorageFailure`] into their own port error so that
//! constraint violations keep their meaning (duplicate key, unknown parent
//! row) while everything else collapses to connection or query errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Storage outcome relevant to the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StorageFailure {
    /// The database could not be reached or dropped the connection.
    Connection(String),
    /// A primary key or unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key pointed at a missing row.
    ForeignKeyViolation { constraint: Option<String> },
    /// Any other failure.
    Query(String),
}

/// Extract a readable message from a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error, logging the raw details at debug level.
pub(crate) fn classify_diesel_error(error: DieselError) -> StorageFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = ?info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            StorageFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            StorageFailure::ForeignKeyViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StorageFailure::Connection("database connection closed".to_owned())
        }
        DieselError::DatabaseError(_, info) => StorageFailure::Query(info.message().to_owned()),
        DieselError::NotFound => StorageFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => StorageFailure::Query("database query error".to_owned()),
        other => StorageFailure::Query(other.to_string()),
    }
}
