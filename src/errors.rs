/*!
 * Error types for the ddloc application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;

use thiserror::Error;

use crate::xml_tools::sanitizer::LineSpan;

/// Errors raised inside the XML passes.
///
/// These never leave a pass's public methods: they are logged and turned into
/// process-exception events at that boundary.
#[derive(Error, Debug)]
pub enum XmlError {
    /// The input document could not be read
    #[error("Failed to read '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input document is not UTF-8
    #[error("'{}' is not valid UTF-8", path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Fewer translated lines than entries that need one
    #[error("translated text ran out of lines at entry '{entry_id}' ({consumed} used)")]
    TranslationsExhausted {
        /// Entry that was left without a translation
        entry_id: String,
        /// Number of translated lines consumed before running out
        consumed: usize,
    },

    /// An extracted entry no longer lines up with the sanitized document
    #[error("Entry '{entry_id}' does not match line {line_index} of the sanitized document")]
    MisalignedEntry {
        entry_id: String,
        line_index: usize,
    },

    /// An extracted entry line has lost its payload markup
    #[error("Entry on line {span} has no payload to substitute")]
    MissingPayload {
        span: LineSpan,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from one of the XML passes
    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Saving was requested before a preview was produced
    #[error("Nothing to save: no preview has been generated")]
    EmptyPreview,

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}
