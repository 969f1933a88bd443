use rmcp::ErrorData;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Query error: {0}")]
    Query(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    #[must_use]
    pub const fn is_query(&self) -> bool {
        matches!(self, Self::Query(_))
    }

    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Message as surfaced to the tool caller inside an `{error: …}` payload.
    #[must_use]
    pub fn tool_message(&self) -> String {
        match self {
            Self::Query(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Convert our Error type to rmcp `ErrorData`
impl From<Error> for ErrorData {
    fn from(err: Error) -> Self {
        match err {
            Error::Query(msg) => Self::internal_error(format!("Query error: {msg}"), None),
            Error::Config(msg) => Self::invalid_params(format!("Configuration error: {msg}"), None),
            Error::Transport(msg) => Self::internal_error(format!("Transport error: {msg}"), None),
            Error::Http(e) => Self::internal_error(format!("HTTP client error: {e}"), None),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
