//! Error types for dsync-cli

use dsync_core::ErrorKind;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Exit code when another sync holds the dataset.
pub const EXIT_BUSY: i32 = 3;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from dsync-core
    #[error(transparent)]
    Core(#[from] dsync_core::Error),

    /// Error from dsync-git
    #[error(transparent)]
    Git(#[from] dsync_git::Error),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Core(err) if err.kind() == ErrorKind::Concurrency => EXIT_BUSY,
            _ => 1,
        }
    }
}
