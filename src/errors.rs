//! Error types for the studynotes application.
//!
//! This module defines custom error types that categorize the failures
//! that can occur while persisting notes and driving the command line.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the studynotes application.
#[derive(Error, Debug)]
pub enum StudyError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The stored note collection could not be read or parsed.
    #[error("Failed to read notes from slot '{slot}': {message}")]
    PersistenceRead { slot: String, message: String },

    /// The key/value store rejected a write.
    #[error("Failed to write notes to slot '{slot}': {message}")]
    PersistenceWrite { slot: String, message: String },

    /// Note was not found when performing an operation.
    #[error("Note not found: {id}")]
    NoteNotFound { id: i64 },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    /// Generic application error with a custom message.
    #[error("{message}")]
    ApplicationError { message: String },

    #[error("{message}")]
    EditorError { message: String },
}
