use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status code: {0}")]
    Status(u16),

    #[error("Failed to parse document: {0}")]
    Document(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No chapters found")]
    NoChapters,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FolioError>;

/// Coarse classification of a failure, carried across the async boundary
/// where the error itself cannot be cloned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Could not read page: {0}")]
    Document(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No chapters found")]
    NoChapters,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Other(String),
}

impl ErrorKind {
    /// Transport failures are worth re-issuing; everything else will fail the same way.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Transport(_))
    }
}

impl FolioError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FolioError::Http(e) => ErrorKind::Transport(e.to_string()),
            FolioError::Status(code) => {
                ErrorKind::Transport(format!("unexpected status code: {}", code))
            }
            FolioError::Document(msg) => ErrorKind::Document(msg.clone()),
            FolioError::InvalidInput(msg) => ErrorKind::InvalidInput(msg.clone()),
            FolioError::NoChapters => ErrorKind::NoChapters,
            FolioError::Database(e) => ErrorKind::Storage(e.to_string()),
            FolioError::Io(e) => ErrorKind::Storage(e.to_string()),
            FolioError::Config(msg) | FolioError::Other(msg) => ErrorKind::Other(msg.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_retryable_transport() {
        let kind = FolioError::Status(503).kind();
        assert!(kind.is_retryable());
        assert_eq!(
            kind,
            ErrorKind::Transport("unexpected status code: 503".into())
        );
    }

    #[test]
    fn test_invalid_input_not_retryable() {
        let kind = FolioError::InvalidInput("abc".into()).kind();
        assert!(!kind.is_retryable());
        assert_eq!(kind.to_string(), "Invalid input: abc");
    }

    #[test]
    fn test_kind_messages() {
        assert_eq!(
            FolioError::Status(404).kind().to_string(),
            "Network error: unexpected status code: 404"
        );
        assert_eq!(ErrorKind::NoChapters.to_string(), "No chapters found");
        assert_eq!(ErrorKind::Other("boom".into()).to_string(), "boom");
    }

    #[test]
    fn test_document_and_no_chapters_not_retryable() {
        assert!(!FolioError::Document("empty".into()).kind().is_retryable());
        assert!(!FolioError::NoChapters.kind().is_retryable());
    }
}
