use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status} for {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Card {card_id} not found on board")]
    CardNotFound { card_id: u64 },

    #[error("List {list_id} not found on board")]
    ListNotFound { list_id: u64 },

    #[error("Board has not been loaded yet")]
    BoardNotLoaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BoardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BoardError::ApiError(_) | BoardError::HttpStatusError { .. } => ErrorCategory::Network,
            BoardError::SerializationError(_) | BoardError::IoError(_) => ErrorCategory::Data,
            BoardError::UrlError(_)
            | BoardError::ConfigValidationError { .. }
            | BoardError::InvalidConfigValueError { .. }
            | BoardError::MissingConfigError { .. } => ErrorCategory::Configuration,
            BoardError::CardNotFound { .. }
            | BoardError::ListNotFound { .. }
            | BoardError::BoardNotLoaded => ErrorCategory::State,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // a refetch usually resolves stale ids
            ErrorCategory::State => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BoardError::ApiError(_) => "Could not reach the board API".to_string(),
            BoardError::HttpStatusError { status, .. } => {
                format!("The board API rejected the request (HTTP {})", status)
            }
            BoardError::CardNotFound { card_id } => {
                format!("Card {} is no longer on this board", card_id)
            }
            BoardError::ListNotFound { list_id } => {
                format!("List {} is no longer on this board", list_id)
            }
            BoardError::BoardNotLoaded => "The board has not been loaded".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the API URL and token, then reload the board",
            ErrorCategory::Data => "Reload the board; the server returned unexpected data",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::State => "Reload the board and try the move again",
        }
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_category() {
        let missing = BoardError::CardNotFound { card_id: 7 };
        assert_eq!(missing.category(), ErrorCategory::State);
        assert_eq!(missing.severity(), ErrorSeverity::Low);

        let status = BoardError::HttpStatusError {
            status: 500,
            url: "http://localhost/board/1".to_string(),
        };
        assert_eq!(status.category(), ErrorCategory::Network);
        assert_eq!(status.severity(), ErrorSeverity::Medium);

        let config = BoardError::MissingConfigError {
            field: "board.id".to_string(),
        };
        assert_eq!(config.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_user_friendly_message() {
        let status = BoardError::HttpStatusError {
            status: 404,
            url: "http://localhost/board/1".to_string(),
        };
        assert_eq!(
            status.user_friendly_message(),
            "The board API rejected the request (HTTP 404)"
        );
    }
}
