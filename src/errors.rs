use thiserror::Error;

/// Errors produced while talking to the Puter API
#[derive(Error, Debug)]
pub enum PuterError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Response did not contain a result")]
    MissingResult,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Configuration save failed: {0}")]
    ConfigSaveFailed(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PuterError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PuterError::NotFound(_))
    }
}

/// Result type alias for Puter errors
pub type PuterResult<T> = Result<T, PuterError>;

/// Helper functions for input validation
pub mod util {
    use super::*;

    /// Validate an app name before it is sent to the server
    pub fn validate_app_name(name: &str) -> PuterResult<()> {
        if name.trim().is_empty() {
            return Err(PuterError::Validation(
                "App name must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
