/// Error type returned by the station catalog and the query engine
use gsod_core::GsodError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    /// Invalid input: unknown station, bad range, unsupported combination
    #[error(transparent)]
    Gsod(#[from] GsodError),

    /// SQLite failed while executing a query
    #[error("Database query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl QueryError {
    /// The domain error, if this is one rather than a storage failure.
    pub fn as_gsod(&self) -> Option<&GsodError> {
        match self {
            QueryError::Gsod(e) => Some(e),
            QueryError::Sqlite(_) => None,
        }
    }
}

/// Type alias for Results using QueryError
pub type Result<T> = std::result::Result<T, QueryError>;
