//! Shared types for the studynotes application.
//!
//! This module contains the crate-wide result type and the command-line
//! subcommands.
use clap::Subcommand;

use crate::{NoteId, StudyError};

/// A specialized Result type for studynotes operations.
pub type Result<T> = std::result::Result<T, StudyError>;

/// Available subcommands for the studynotes application
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Add a new note
    Add {
        /// Topic of the note (defaults to "Untitled" when only content is given)
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// Key ideas, formulas, code snippets
        #[clap(short, long)]
        content: Option<String>,

        /// Write the content in an editor before saving
        #[clap(short, long)]
        edit: bool,
    },

    /// List notes, optionally filtered by a search term
    List {
        /// Case-insensitive substring matched against title and content
        #[clap(short, long)]
        search: Option<String>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Mark a note done, or pending again
    Toggle {
        /// ID of the note
        id: NoteId,
    },

    /// Delete a note by ID
    Delete {
        /// ID of the note to delete
        id: NoteId,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Run a focus session in the terminal
    Focus {
        /// Session length in minutes (1-180)
        #[clap(short, long)]
        minutes: Option<String>,
    },

    /// Show study statistics
    Stats,

    /// Open the interactive dashboard
    Shell,
}
