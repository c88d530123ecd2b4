// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admit::RepositoryError;

/// Errors raised by the `SQLite` adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The database could not be opened.
    ConnectionFailed(String),
    /// The database path is not valid UTF-8.
    InvalidPath(String),
    /// A connection PRAGMA could not be applied.
    ConnectionSetup {
        pragma: &'static str,
        reason: String,
    },
    MigrationFailed(String),
    ForeignKeyEnforcementNotEnabled,
    /// A statement failed, including lock waits that outlasted the busy timeout.
    Query(String),
    /// A row written inside the current transaction could not be read back.
    MissingAfterInsert { table: &'static str, id: i64 },
    /// A stored row could not be turned back into a domain value.
    InvalidData(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed(msg) => write!(f, "Database connection failed: {msg}"),
            Self::InvalidPath(path) => write!(f, "Database path is not valid UTF-8: {path}"),
            Self::ConnectionSetup { pragma, reason } => {
                write!(f, "Failed to apply PRAGMA {pragma}: {reason}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::Query(msg) => write!(f, "Query failed: {msg}"),
            Self::MissingAfterInsert { table, id } => {
                write!(f, "Row {id} of {table} missing after insert")
            }
            Self::InvalidData(msg) => write!(f, "Invalid stored data: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        Self::Query(err.to_string())
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::ConnectionFailed(err.to_string())
    }
}

impl From<PersistenceError> for RepositoryError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::InvalidData(msg) => Self::InvalidData(msg),
            other => Self::Storage(other.to_string()),
        }
    }
}
