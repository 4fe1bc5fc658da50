//! Errors that abort an analysis.

use serde::Serialize;
use thiserror::Error;

/// Fatal engine errors. Either the whole report is produced or one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("unsupported file type {extension:?} for {filename} (expected .py, .js or .jsx)")]
    UnsupportedFileType { filename: String, extension: String },

    #[error("cannot read {filename}: {reason}")]
    ContentError { filename: String, reason: String },
}

impl EngineError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::UnsupportedFileType { .. } => "UNSUPPORTED_FILE_TYPE",
            EngineError::ContentError { .. } => "CONTENT_ERROR",
        }
    }

    /// JSON-serializable payload for transports and the CLI.
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            error: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// Why a file in a scan has no report.
///
/// Engine errors keep their codes; failures to read the file before it
/// reaches the engine are reported as `READ_ERROR`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("{reason}")]
    Read { reason: String },
}

impl ScanError {
    pub fn code(&self) -> &'static str {
        match self {
            ScanError::Engine(err) => err.code(),
            ScanError::Read { .. } => "READ_ERROR",
        }
    }

    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            error: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// `{"error": CODE, "message": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let unsupported = EngineError::UnsupportedFileType {
            filename: "notes.txt".to_string(),
            extension: "txt".to_string(),
        };
        assert_eq!(unsupported.code(), "UNSUPPORTED_FILE_TYPE");
        assert!(unsupported.to_string().contains("notes.txt"));

        let content = EngineError::ContentError {
            filename: "a.py".to_string(),
            reason: "contains NUL bytes".to_string(),
        };
        assert_eq!(content.code(), "CONTENT_ERROR");
    }

    #[test]
    fn test_payload_json() {
        let err = EngineError::ContentError {
            filename: "a.js".to_string(),
            reason: "not valid UTF-8".to_string(),
        };
        let json = serde_json::to_value(err.payload()).unwrap();
        assert_eq!(json["error"], "CONTENT_ERROR");
        assert_eq!(json["message"], "cannot read a.js: not valid UTF-8");
    }

    #[test]
    fn test_scan_error_codes() {
        let engine: ScanError = EngineError::ContentError {
            filename: "a.py".to_string(),
            reason: "contains NUL bytes".to_string(),
        }
        .into();
        assert_eq!(engine.code(), "CONTENT_ERROR");
        assert_eq!(engine.to_string(), "cannot read a.py: contains NUL bytes");

        let read = ScanError::Read {
            reason: "big.py is larger than 10 bytes".to_string(),
        };
        assert_eq!(read.code(), "READ_ERROR");
        assert_eq!(read.payload().message, "big.py is larger than 10 bytes");
    }
}
