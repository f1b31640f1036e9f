/// Error types for cmd-finder
///
/// This module defines all possible errors that can occur in the application.
/// Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Main error type for cmd-finder operations
#[derive(Error, Debug)]
pub enum FinderError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Query was empty after trimming
    #[error("Search query is required")]
    EmptyQuery,

    /// Query exceeds the maximum length
    #[error("Query exceeds maximum allowed length of {0} characters")]
    QueryTooLong(usize),

    /// Request body could not be read as a search request
    #[error("Malformed request: {0}")]
    InvalidRequest(String),

    /// Record id not present in the store or the current results
    #[error("Record not found: {0}")]
    RecordNotFound(i64),

    /// Export attempted with nothing in the working set
    #[error("Working set is empty")]
    EmptyWorkingSet,

    /// Record store could not be reached
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    /// A remote search request failed
    #[error("Search request failed: {0}")]
    Transport(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for cmd-finder operations
pub type Result<T> = std::result::Result<T, FinderError>;

impl FinderError {
    /// Convert FinderError to a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            FinderError::Database(e) => {
                format!("Database error occurred. Please try again. Details: {}", e)
            }
            FinderError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            FinderError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            FinderError::EmptyQuery => "Type something to search for".to_string(),
            FinderError::QueryTooLong(max) => {
                format!("Query too long: keep it under {} characters", max)
            }
            FinderError::InvalidRequest(msg) => {
                format!("Send a JSON body like {{\"query\": \"dir\"}}. Details: {}", msg)
            }
            FinderError::RecordNotFound(id) => {
                format!("No command with id {}", id)
            }
            FinderError::EmptyWorkingSet => {
                "Add at least one command before exporting the script".to_string()
            }
            FinderError::StoreUnavailable(msg) => {
                format!("Database disconnected: {}", msg)
            }
            FinderError::Transport(msg) => {
                format!("Search failed, try again. Details: {}", msg)
            }
            FinderError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
        }
    }

    /// True for errors caused by bad user input rather than a failure
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FinderError::EmptyQuery
                | FinderError::QueryTooLong(_)
                | FinderError::InvalidRequest(_)
                | FinderError::EmptyWorkingSet
        )
    }
}
