//! CLI-level errors (wraps application errors)

use std::io;

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::ComponentError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ComponentError> for CliError {
    fn from(e: ComponentError) -> Self {
        CliError::Application(ApplicationError::Component(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Component(ComponentError::StaleComponent) => {
                    crate::exitcode::SOFTWARE
                }
                ApplicationError::Component(_) => crate::exitcode::DATAERR,
                ApplicationError::Json { .. } => crate::exitcode::DATAERR,
                ApplicationError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                    crate::exitcode::NOINPUT
                }
                ApplicationError::Io { .. } => crate::exitcode::IOERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_missing_path_when_mapping_exit_code_then_data_error() {
        let err = CliError::from(ComponentError::PathNotFound("steps".to_string()));
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(err.to_string(), "component path not found: steps");
    }

    #[test]
    fn given_missing_file_when_mapping_exit_code_then_no_input() {
        let err = CliError::Application(ApplicationError::Io {
            context: "read layout: nope.json".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        });
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }

    #[test]
    fn given_usage_error_when_mapping_exit_code_then_usage() {
        assert_eq!(
            CliError::Usage("pick a root".to_string()).exit_code(),
            crate::exitcode::USAGE
        );
    }
}
