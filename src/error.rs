//! Error types for store operations

use thiserror::Error;

/// Errors that can occur while building or executing store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failure establishing a backend session. Fatal to the operation,
    /// never retried.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Target table/collection absent, or a filtered delete/update matched
    /// zero rows on a backend that requires matches before mutating.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A connection parameter was required by the connection template but
    /// not supplied. Raised before any network call.
    #[error("Missing mandatory field: {0}")]
    MissingField(String),

    /// Request payload could not be parsed into the expected shape
    /// (unknown operator tag, bad row limit, empty update set, ...).
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The native driver raised during statement execution. The driver
    /// message is preserved verbatim for operator visibility.
    #[error("Backend error: {0}")]
    Backend(String),

    /// A bulk insert aborted partway through the row sequence. Rows before
    /// `row` remain applied; there is no transactional rollback.
    #[error("Bulk operation failed at row {row}: {source}")]
    PartialBulk {
        row: usize,
        #[source]
        source: Box<StoreError>,
    },

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn missing_field(msg: impl Into<String>) -> Self {
        Self::MissingField(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Wrap a row-level failure from a bulk insert, recording how far the
    /// sequence got before aborting.
    pub fn partial_bulk(row: usize, source: StoreError) -> Self {
        Self::PartialBulk {
            row,
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
