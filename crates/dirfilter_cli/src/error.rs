//! Error types for dirfilter_cli

use std::io;

/// Exit code for a completed action.
pub const N_EXIT_SUCCESS: u8 = 0;
/// Exit code for an action that finished with errors or only partially.
pub const N_EXIT_FAILURE: u8 = 1;
/// Exit code for a failure outside the normal action flow.
pub const N_EXIT_CRITICAL: u8 = 2;
/// Exit code after an operator interrupt.
pub const N_EXIT_INTERRUPTED: u8 = 130;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that stop the CLI before or around an action
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Interactive prompt error
    #[error("Interactive prompt error: {0}")]
    Dialoguer(dialoguer::Error),

    /// Operator pressed Ctrl+C while a prompt was active
    #[error("Operation interrupted by user.")]
    Interrupted,

    /// A command-line argument failed validation
    #[error("{message}")]
    InvalidInput { message: String },
}

impl From<dialoguer::Error> for CliError {
    fn from(error: dialoguer::Error) -> Self {
        match error {
            dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::Interrupted => Self::Interrupted,
            other => Self::Dialoguer(other),
        }
    }
}

impl CliError {
    /// Create a new invalid-input error with the given message
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidInput { .. } => N_EXIT_FAILURE,
            Self::Interrupted => N_EXIT_INTERRUPTED,
            Self::Io(_) | Self::Dialoguer(_) => N_EXIT_CRITICAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::invalid_input("bad").exit_code(), N_EXIT_FAILURE);
        assert_eq!(CliError::Interrupted.exit_code(), N_EXIT_INTERRUPTED);
        assert_eq!(
            CliError::from(io::Error::other("tty gone")).exit_code(),
            N_EXIT_CRITICAL
        );
    }

    #[test]
    fn test_interrupted_prompt_maps_to_interrupted() {
        let error = dialoguer::Error::IO(io::Error::new(io::ErrorKind::Interrupted, "ctrl-c"));
        assert!(matches!(CliError::from(error), CliError::Interrupted));

        let error = dialoguer::Error::IO(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert!(matches!(CliError::from(error), CliError::Dialoguer(_)));
    }
}
