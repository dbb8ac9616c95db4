use thiserror::Error;

/// Application-wide error types for the harvester.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed (fetching a page).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Search-results or detail-page markup did not match the expected shape.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// CSV output failed.
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Invalid or missing configuration.
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true if the error originated on the wire rather than in
    /// local parsing or persistence.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            AppError::HttpError(_) | AppError::Timeout(_) | AppError::NetworkError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_errors() {
        assert!(AppError::NetworkError("reset".into()).is_network());
        assert!(AppError::Timeout(30).is_network());
        assert!(AppError::HttpError("HTTP 500".into()).is_network());
        assert!(!AppError::ParseError("no searchResults".into()).is_network());
        assert!(!AppError::DatabaseError("locked".into()).is_network());
    }

    #[test]
    fn test_display_messages() {
        let err = AppError::Timeout(30);
        assert_eq!(err.to_string(), "Request timed out after 30 seconds");

        let err = AppError::ParseError("missing data-id".into());
        assert!(err.to_string().contains("missing data-id"));
    }
}
