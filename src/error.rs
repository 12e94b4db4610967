//! Error types for formatted text
//!
//! This module defines all custom error types used throughout the crate.
//! Error types are organized by category: rendering failures surface as
//! [`TextError`], malformed format specifiers as [`PatternError`], and the
//! locale and configuration layers have their own enums.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type returned when a text is resolved or rendered
#[derive(Error, Debug)]
pub enum TextError {
    /// The pattern contains conversion syntax the formatter rejects
    #[error(transparent)]
    MalformedPattern(#[from] PatternError),

    /// An argument cannot satisfy the conversion it is bound to
    #[error("Conversion '{conversion}' cannot format {found}")]
    ArgumentTypeMismatch {
        conversion: String,
        found: &'static str,
    },

    /// A specifier refers to an argument that was not supplied
    #[error("Missing argument for format specifier '{specifier}'")]
    MissingArgument { specifier: String },

    /// Error reading a text file
    #[error("Could not read text: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Text file is not valid UTF-8 or UTF-16
    #[error("Unable to read file as text. File may be binary or use unsupported encoding: {path}")]
    Encoding { path: PathBuf },

    /// Text file exceeds the configured size limit
    #[error("Text file too large: {path} ({size} bytes, max {max_size} bytes)")]
    TooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure reported by a custom text source
    #[error(transparent)]
    Resolution(#[from] anyhow::Error),
}

/// Coarse classification of a [`TextError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedPattern,
    /// An argument cannot be bound to its specifier, by type or because it
    /// was not supplied
    ArgumentTypeMismatch,
    /// Failure while resolving a pattern source or a deferred text argument
    Resolution,
}

impl TextError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TextError::MalformedPattern(_) => ErrorKind::MalformedPattern,
            TextError::ArgumentTypeMismatch { .. } | TextError::MissingArgument { .. } => {
                ErrorKind::ArgumentTypeMismatch
            }
            TextError::Read { .. }
            | TextError::Encoding { .. }
            | TextError::TooLarge { .. }
            | TextError::Io(_)
            | TextError::Resolution(_) => ErrorKind::Resolution,
        }
    }

    pub(crate) fn mismatch(conversion: impl Into<String>, found: &'static str) -> Self {
        TextError::ArgumentTypeMismatch {
            conversion: conversion.into(),
            found,
        }
    }
}

/// Malformed conversion syntax inside a pattern
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Conversion character is not recognized
    #[error("Unknown format conversion: '{0}'")]
    UnknownConversion(String),

    /// The same flag appears twice in one specifier
    #[error("Duplicate format flag: '{0}'")]
    DuplicateFlag(char),

    /// Flags that cannot be combined
    #[error("Illegal combination of format flags: '{0}'")]
    IllegalFlags(String),

    /// A flag is not valid for the conversion it precedes
    #[error("Flag '{flag}' is not valid for conversion '{conversion}'")]
    FlagsMismatch { flag: char, conversion: char },

    /// `-` or `0` given without a width
    #[error("Missing width for format specifier '{0}'")]
    MissingWidth(String),

    /// Precision given to a conversion that takes none
    #[error("Illegal precision {precision} for conversion '{conversion}'")]
    IllegalPrecision { precision: usize, conversion: char },

    /// Width given to a conversion that takes none, or too large to use
    #[error("Illegal width in format specifier '{0}'")]
    IllegalWidth(String),

    /// Explicit argument index is zero or too large
    #[error("Illegal argument index in format specifier '{0}'")]
    IllegalIndex(String),
}

/// Locale identifier errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    /// Tag is not a language[-COUNTRY] identifier
    #[error("Invalid locale tag: '{0}'")]
    InvalidTag(String),
}

/// Configuration related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error loading configuration file
    #[error("Could not load configuration: {path}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing configuration
    #[error("Invalid configuration format: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid configuration value
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// Configuration directory error
    #[error("Could not access configuration directory")]
    DirectoryError,
}

/// Result type alias for text resolution and rendering
pub type TextResult<T> = Result<T, TextError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_error_display() {
        let err = PatternError::UnknownConversion("$".to_string());
        assert!(err.to_string().contains("'$'"));
    }

    #[test]
    fn test_text_error_from_pattern_error() {
        let err: TextError = PatternError::DuplicateFlag('-').into();
        assert!(matches!(err, TextError::MalformedPattern(_)));
        assert_eq!(err.kind(), ErrorKind::MalformedPattern);
    }

    #[test]
    fn test_resolution_kinds() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(TextError::from(io).kind(), ErrorKind::Resolution);

        let custom = TextError::from(anyhow::anyhow!("backend offline"));
        assert_eq!(custom.kind(), ErrorKind::Resolution);
        assert_eq!(custom.to_string(), "backend offline");
    }

    #[test]
    fn test_missing_argument_is_a_mismatch() {
        let err = TextError::MissingArgument {
            specifier: "%2$s".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::ArgumentTypeMismatch);
        assert!(err.to_string().contains("%2$s"));
    }

    #[test]
    fn test_mismatch_display() {
        let err = TextError::mismatch("d", "date-time");
        assert_eq!(err.kind(), ErrorKind::ArgumentTypeMismatch);
        assert!(err.to_string().contains("date-time"));
    }
}
