use thiserror::Error;

/// Closed set of failure kinds so handlers can react per kind instead of
/// matching on message strings.
#[derive(Debug, Error)]
pub enum BotError {
    /// The remote sheet could not be read (network, auth, API error).
    #[error("registry source unavailable: {0}")]
    SourceUnavailable(String),

    /// The fetched sheet no longer matches the expected column layout.
    #[error("sheet schema mismatch: expected at least {expected} columns in the header, got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    /// A callback payload that does not decode to a known action.
    #[error("invalid page payload: {0:?}")]
    InvalidPagePayload(String),

    /// Serialized export exceeds the transport's document size ceiling.
    #[error("export too large: {size} bytes (limit {limit})")]
    ExportTooLarge { size: usize, limit: usize },

    /// Non-admin invoking an admin-only action.
    #[error("unauthorized")]
    Unauthorized,

    #[error("telegram transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Local infrastructure failure (serialization, file I/O).
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
