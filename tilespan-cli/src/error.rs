//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use tilespan::error::{DecodeError, EncodeError};

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(std::io::Error),
    /// Failed to build an availability map from an inventory
    Encode(EncodeError),
    /// Failed to decode an availability map
    Decode(DecodeError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Decode(DecodeError::FormatMismatch { .. }) = self {
            eprintln!();
            eprintln!("The file may have been produced by a different encoder.");
            eprintln!("Re-encode the inventory with 'tilespan encode' to refresh it.");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Encode(e) => write!(f, "Failed to encode availability map: {}", e),
            CliError::Decode(e) => write!(f, "Failed to decode availability map: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::Encode(e) => Some(e),
            CliError::Decode(e) => Some(e),
        }
    }
}

impl From<EncodeError> for CliError {
    fn from(e: EncodeError) -> Self {
        CliError::Encode(e)
    }
}

impl From<DecodeError> for CliError {
    fn from(e: DecodeError) -> Self {
        CliError::Decode(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_error_display() {
        let err = CliError::from(EncodeError::EmptyInventory);
        let msg = err.to_string();
        assert!(msg.contains("Failed to encode"));
        assert!(msg.contains("inventory is empty"));
    }

    #[test]
    fn test_decode_error_display() {
        let err = CliError::from(DecodeError::FormatMismatch {
            found: "bogus/9".to_string(),
        });
        assert!(err.to_string().contains("bogus/9"));
    }
}
