use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Failed to read input '{}': {source}", .path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output '{}': {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid selector '{selector}' for {field}: {message}")]
    SelectorError {
        field: String,
        selector: String,
        message: String,
    },
}

impl EtlError {
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EtlError::ConfigError { .. }
                | EtlError::InvalidConfigValueError { .. }
                | EtlError::SelectorError { .. }
        )
    }

    /// Process exit code: 2 config, 3 input, 4 output.
    pub fn exit_code(&self) -> i32 {
        match self {
            e if e.is_config_error() => 2,
            EtlError::InputRead { .. } => 3,
            _ => 4,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::InputRead { .. } => {
                "Check that the saved HTML page exists and is a readable UTF-8 file"
            }
            EtlError::OutputWrite { .. } | EtlError::IoError(_) => {
                "Check that the output directory is writable and not an existing file"
            }
            EtlError::ZipError(_) | EtlError::CsvError(_) | EtlError::SerializationError(_) => {
                "Retry the export; if it persists, try another --format"
            }
            EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::SelectorError { .. } => {
                "Fix the command-line arguments or the field table in the --config file"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_kind() {
        let input = EtlError::InputRead {
            path: PathBuf::from("missing.htm"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let output = EtlError::OutputWrite {
            path: PathBuf::from("out/x.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let config = EtlError::ConfigError {
            message: "bad".to_string(),
        };

        assert_eq!(input.exit_code(), 3);
        assert_eq!(output.exit_code(), 4);
        assert_eq!(config.exit_code(), 2);
        assert!(input.to_string().contains("missing.htm"));
    }
}
