//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::ComponentError;

/// Application errors wrap domain errors and add document/file context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Component(#[from] ComponentError),

    #[error("invalid layout document: {context}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    /// Create a JSON error with context.
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
