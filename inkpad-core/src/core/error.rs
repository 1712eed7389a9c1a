//! Error types for the Inkpad core library.

use thiserror::Error;

/// All errors that can occur within the Inkpad core library.
///
/// Expected failure modes (missing documents, closed storage, bad blobs) are
/// carried as values; nothing in the core panics for them. Validation no-ops
/// such as an out-of-range index or an unknown object id are not errors at
/// all — the mutating method simply returns without effect.
#[derive(Debug, Error)]
pub enum InkpadError {
    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A document ID or title was requested that does not exist in storage.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// A page ID was requested that does not exist in storage.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// A storage operation was attempted before `initialize` or after `close`.
    #[error("Storage is not open")]
    StorageClosed,

    /// No usable location for the database file could be determined.
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document data could not be serialized or deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias that pins the error type to [`InkpadError`].
pub type Result<T> = std::result::Result<T, InkpadError>;

impl InkpadError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(e) => format!("Failed to access the notes database: {e}"),
            Self::DocumentNotFound(_) => "Document no longer exists".to_string(),
            Self::PageNotFound(_) => "Page no longer exists".to_string(),
            Self::StorageClosed => "The notes database is not open".to_string(),
            Self::InvalidPath(p) => format!("Cannot use storage location: {p}"),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_short_and_stable() {
        let e = InkpadError::StorageClosed;
        assert_eq!(e.user_message(), "The notes database is not open");

        let e = InkpadError::DocumentNotFound("abc".to_string());
        assert!(!e.user_message().contains("abc"), "ids are not user-facing");
    }
}
