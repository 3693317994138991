//! Text rendering of notes and the focus timer.
//!
//! Every function here is a pure function of the state it is given.
use std::fmt::Write;

use console::style;

use crate::{count_label, Note, NoteFilter, StudyStatsProvider, TimerSnapshot};

pub const EMPTY_TEXT: &str = "No notes yet. Start by adding one.";

/// Width used for separators, bounded to keep lines readable.
pub fn separator_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
        .min(50)
}

pub fn render_note(note: &Note) -> String {
    let mut out = String::new();

    let title = if note.is_done {
        style(format!("[x] {}", note.title)).dim().to_string()
    } else {
        style(&note.title).bold().to_string()
    };
    let _ = writeln!(out, "{}", title);

    if !note.content.is_empty() {
        let _ = writeln!(out, "{}", note.content);
    }

    let _ = write!(
        out,
        "ID: {} | {} | [{}]",
        note.id,
        style(&note.created_at).dim(),
        note.toggle_label()
    );
    out
}

/// Header with the match count, then each note or the empty-state text.
pub fn render_notes(view: &NoteFilter<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Your notes ({})", count_label(view.count()));

    if view.is_empty() {
        let _ = writeln!(out, "{}", EMPTY_TEXT);
        return out;
    }

    let separator = "-".repeat(separator_width());
    for (i, note) in view.iter().enumerate() {
        if i > 0 {
            let _ = writeln!(out, "{}", separator);
        }
        let _ = writeln!(out, "{}", render_note(note));
    }
    out
}

pub fn render_timer(snapshot: &TimerSnapshot) -> String {
    format!(
        "Smart study mode  {}  [{}]  duration: {} min (input: {})",
        style(&snapshot.display).bold().cyan(),
        snapshot.button_label,
        snapshot.duration_minutes,
        snapshot.pending_minutes_input
    )
}

pub fn render_stats(stats: &dyn StudyStatsProvider) -> String {
    format!("This week  {}", style(stats.weekly_study_time()).bold())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FocusTimer, MemoryKvStore, NoteStore, PlaceholderStats, DEFAULT_SLOT};

    fn plain(s: &str) -> String {
        console::strip_ansi_codes(s).to_string()
    }

    #[test]
    fn test_render_empty_view() {
        let store = NoteStore::open(Box::new(MemoryKvStore::new()), DEFAULT_SLOT);
        let out = plain(&render_notes(&store.filter("")));
        assert!(out.contains("0 notes"));
        assert!(out.contains(EMPTY_TEXT));
    }

    #[test]
    fn test_render_notes_lists_matches() {
        let mut store = NoteStore::open(Box::new(MemoryKvStore::new()), DEFAULT_SLOT);
        store.create("OS – Deadlocks", "Coffman conditions");
        let id = store.create("", "loose thought").unwrap().id;
        store.toggle_done(id);

        let out = plain(&render_notes(&store.filter("")));
        assert!(out.contains("2 notes"));
        assert!(out.contains("OS – Deadlocks"));
        assert!(out.contains("Untitled"));
        assert!(out.contains("[Mark pending]"));
        assert!(out.contains("[Mark done]"));

        let out = plain(&render_notes(&store.filter("coffman")));
        assert!(out.contains("1 note\n") || out.contains("(1 note)"));
        assert!(!out.contains("Untitled"));
    }

    #[test]
    fn test_render_timer_and_stats() {
        let snapshot = TimerSnapshot::from(&FocusTimer::default());
        let out = plain(&render_timer(&snapshot));
        assert!(out.contains("25:00"));
        assert!(out.contains("[Start focus session]"));

        let out = plain(&render_stats(&PlaceholderStats::default()));
        assert_eq!(out, "This week  5h 30m");
    }
}
