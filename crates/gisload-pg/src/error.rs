//! Error types for database round trips.

use thiserror::Error;

/// Failures surfaced by sessions and the operations built on them.
#[derive(Debug, Error)]
pub enum DbError {
    /// Could not reach or authenticate with the server.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The server rejected a statement (malformed SQL, missing relation,
    /// constraint violation, ...).
    #[error("operation failed: {0}")]
    Operational(String),

    /// The session was already closed.
    #[error("session is closed")]
    Closed,

    /// A local file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Row width does not match the column list.
    #[error("expected {expected} columns, found {found}")]
    Shape { expected: usize, found: usize },
}

impl DbError {
    pub fn connection(e: tokio_postgres::Error) -> Self {
        Self::Connection(e.to_string())
    }
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

impl From<tokio_postgres::Error> for DbError {
    fn from(e: tokio_postgres::Error) -> Self {
        match e.as_db_error() {
            Some(db) => Self::Operational(format!("{}: {}", db.severity(), db.message())),
            None if e.is_closed() => Self::Closed,
            None => Self::Operational(e.to_string()),
        }
    }
}

/// Convenience alias for results with [`DbError`].
pub type Result<T> = std::result::Result<T, DbError>;
