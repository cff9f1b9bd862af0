use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tab {tab_id} not found")]
    TabNotFound { tab_id: i64 },

    #[error("Browser host error: {0}")]
    Host(String),

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Stored activity is corrupt: {reason}")]
    CorruptLedger { reason: String },

    #[error("Tracker is not running")]
    TrackerStopped,

    #[error("Could not determine project directories")]
    NoProjectDirs,
}

impl AppError {
    /// True for errors that only mean the browser state moved on before we asked.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::TabNotFound { .. } | AppError::Host(_))
    }
}
