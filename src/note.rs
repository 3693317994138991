//! Core data structures for the studynotes application.
//!
//! This module contains the note record as it is stored in the persistence
//! slot, plus the draft that collects form input before a note exists.
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Identifier of a note, derived from the creation time in milliseconds.
pub type NoteId = i64;

/// Title given to notes created with only body content.
pub const UNTITLED: &str = "Untitled";

/// Represents a single study note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier for the note
    pub id: NoteId,
    /// Note title, never empty
    pub title: String,
    /// Free-text body, may be empty
    pub content: String,
    /// Human-readable creation time
    pub created_at: String,
    /// Whether the note has been marked done
    pub is_done: bool,
}

impl Note {
    /// Builds a note from raw form input.
    ///
    /// Returns `None` when both the title and the content are blank.
    pub fn from_input(id: NoteId, title: &str, content: &str, now: DateTime<Local>) -> Option<Self> {
        let title = title.trim();
        let content = content.trim();

        if title.is_empty() && content.is_empty() {
            return None;
        }

        Some(Note {
            id,
            title: if title.is_empty() {
                UNTITLED.to_string()
            } else {
                title.to_string()
            },
            content: content.to_string(),
            created_at: format_created_at(now),
            is_done: false,
        })
    }

    /// Case-insensitive substring match against title and content.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
    }

    /// Label of the action that flips this note's completion flag
    pub fn toggle_label(&self) -> &'static str {
        if self.is_done {
            "Mark pending"
        } else {
            "Mark done"
        }
    }
}

/// Pending note-form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.content.clear();
    }
}

/// Formats a creation timestamp like `6/10/2024, 3:04:05 PM`.
pub fn format_created_at(now: DateTime<Local>) -> String {
    now.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 10, 15, 4, 5).unwrap()
    }

    #[test]
    fn test_from_input_trims_and_defaults_title() {
        let note = Note::from_input(1, "   ", "  key ideas  ", fixed_time()).unwrap();
        assert_eq!(note.title, UNTITLED);
        assert_eq!(note.content, "key ideas");
        assert!(!note.is_done);
    }

    #[test]
    fn test_from_input_rejects_blank() {
        assert!(Note::from_input(1, "", "", fixed_time()).is_none());
        assert!(Note::from_input(1, " \t", "\n", fixed_time()).is_none());
    }

    #[test]
    fn test_created_at_format() {
        assert_eq!(format_created_at(fixed_time()), "6/10/2024, 3:04:05 PM");
    }

    #[test]
    fn test_serialized_keys_are_camel_case() {
        let note = Note::from_input(42, "OS", "", fixed_time()).unwrap();
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["id"], 42);
        assert_eq!(value["isDone"], false);
        assert_eq!(value["createdAt"], "6/10/2024, 3:04:05 PM");
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let note = Note::from_input(1, "OS – Deadlocks", "Banker's algorithm", fixed_time()).unwrap();
        assert!(note.matches("os"));
        assert!(note.matches("banker"));
        assert!(note.matches(""));
        assert!(!note.matches("paging"));
    }

    #[test]
    fn test_draft_blank_and_clear() {
        let mut draft = NoteDraft::new("Algorithms", "");
        assert!(!draft.is_blank());
        draft.clear();
        assert!(draft.is_blank());
        assert_eq!(draft, NoteDraft::default());
    }
}
