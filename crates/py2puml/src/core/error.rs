//! Core error types for structure extraction and rendering
//!
//! Library code reports failures through [`Py2PumlError`]. The orchestration
//! and CLI layers wrap it in `anyhow` for context.

use std::path::PathBuf;

use thiserror::Error;

/// Core error type for py2puml
#[derive(Error, Debug)]
pub enum Py2PumlError {
    #[error("Cannot scan {}: {message}", .root.display())]
    Scan { root: PathBuf, message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("{message} (line {line}, column {column})")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("{message}")]
    Encoding { message: String },

    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Config error: {message}")]
    Config { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Extraction error: {message}")]
    Extraction { message: String },
}

impl Py2PumlError {
    /// Create a new scan error
    pub fn scan_error(root: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Scan {
            root: root.into(),
            message: message.into(),
        }
    }

    /// Create a new syntax error at a 1-based position
    pub fn syntax_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Syntax {
            message: message.into(),
            line,
            column,
        }
    }

    pub fn encoding_error(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn serialization_error(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    pub fn extraction_error(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    /// True for an I/O failure caused by missing read permission
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::Io { source } if source.kind() == std::io::ErrorKind::PermissionDenied)
    }
}

impl From<std::str::Utf8Error> for Py2PumlError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::encoding_error(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Py2PumlError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::encoding_error(err.utf8_error().to_string())
    }
}

impl From<serde_json::Error> for Py2PumlError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization_error(err.to_string())
    }
}

impl From<serde_yaml::Error> for Py2PumlError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::serialization_error(err.to_string())
    }
}
