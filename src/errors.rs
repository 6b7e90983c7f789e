/*!
 * Error types for the glossub application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when loading or querying a dictionary
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// Error reading the dictionary file
    #[error("Failed to read dictionary file: {0}")]
    ReadFailed(String),

    /// Error parsing the dictionary document
    #[error("Failed to parse dictionary: {0}")]
    ParseError(String),

    /// An entry is missing required data
    #[error("Invalid dictionary entry '{key}': {reason}")]
    InvalidEntry {
        /// Headword key of the offending entry
        key: String,
        /// What was wrong with it
        reason: String,
    },

    /// The dictionary header is missing or incomplete
    #[error("Invalid dictionary header: {0}")]
    InvalidHeader(String),

    /// The dictionary declares a language glossub does not know
    #[error("Unsupported dictionary language: {0}")]
    UnsupportedLanguage(String),
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The subtitle file contained no parsable captions
    #[error("No valid subtitle entries found in {0}")]
    NoEntries(String),

    /// The file was already produced by glossub
    #[error("File already carries the glossub signature: {0}")]
    AlreadyAnnotated(String),
}

/// Errors that can occur while annotating a caption
#[derive(Error, Debug)]
pub enum AnnotationError {
    /// The tokenizer violated its contract
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Caption-level failure, aborts only the current caption
    #[error("Failed to annotate caption {seq_num}: {message}")]
    Caption {
        /// Sequence number of the caption that failed
        seq_num: usize,
        /// Failure description
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the dictionary
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from annotation
    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),

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
