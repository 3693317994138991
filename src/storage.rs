use chrono::{Local, Utc};
use log::{debug, error, info, trace, warn};

use crate::{KeyValueStore, Note, NoteDraft, NoteId, Result, StudyError};

/// Name of the slot holding the serialized note collection.
pub const DEFAULT_SLOT: &str = "ssn-notes";

/// A change applied to the note collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEvent {
    Created(Note),
    Toggled { id: NoteId, is_done: bool },
    Deleted(Note),
}

/// Callback invoked after every effective mutation.
pub type NoteListener = Box<dyn FnMut(&NoteEvent) + Send>;

/// Owns the ordered note collection (newest first) and keeps the
/// persistence slot in sync with it.
pub struct NoteStore {
    /// Backing key/value store
    kv: Box<dyn KeyValueStore>,

    /// Key of the slot inside `kv`
    slot: String,

    /// In-memory collection, the source of truth for the session
    notes: Vec<Note>,

    /// Highest id handed out or loaded so far
    last_id: NoteId,

    listeners: Vec<NoteListener>,
}

impl NoteStore {
    /// Opens the store and rehydrates the collection from `slot`.
    ///
    /// A missing slot yields an empty collection. A slot that cannot be read
    /// or parsed is reported through the log and also yields an empty
    /// collection; the store is usable either way.
    pub fn open(kv: Box<dyn KeyValueStore>, slot: impl Into<String>) -> Self {
        let slot = slot.into();
        let notes = match load_notes(kv.as_ref(), &slot) {
            Ok(notes) => {
                info!("Loaded {} notes from slot {}", notes.len(), slot);
                notes
            }
            Err(e) => {
                error!("{}", e);
                Vec::new()
            }
        };
        let last_id = notes.iter().map(|n| n.id).max().unwrap_or(0);

        Self {
            kv,
            slot,
            notes,
            last_id,
            listeners: Vec::new(),
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Registers a listener notified after each effective mutation.
    pub fn subscribe(&mut self, listener: NoteListener) {
        self.listeners.push(listener);
    }

    /// Creates a note from raw input and puts it at the front.
    ///
    /// Does nothing and returns `None` when both inputs are blank.
    pub fn create(&mut self, title: &str, content: &str) -> Option<&Note> {
        if title.trim().is_empty() && content.trim().is_empty() {
            debug!("Ignoring create with empty title and content");
            return None;
        }

        let id = self.next_id();
        let note = Note::from_input(id, title, content, Local::now())?;
        info!("Creating note {} ({})", note.id, note.title);

        self.notes.insert(0, note.clone());
        self.commit(NoteEvent::Created(note));
        self.notes.first()
    }

    /// Creates a note from the draft and clears the draft on success.
    pub fn create_from_draft(&mut self, draft: &mut NoteDraft) -> Option<NoteId> {
        let id = self.create(&draft.title, &draft.content).map(|note| note.id)?;
        draft.clear();
        Some(id)
    }

    /// Flips the completion flag of note `id`, returning the new value.
    pub fn toggle_done(&mut self, id: NoteId) -> Option<bool> {
        let Some(note) = self.notes.iter_mut().find(|n| n.id == id) else {
            debug!("Toggle ignored, note not found: {}", id);
            return None;
        };

        note.is_done = !note.is_done;
        let is_done = note.is_done;
        info!("Note {} marked {}", id, if is_done { "done" } else { "pending" });

        self.commit(NoteEvent::Toggled { id, is_done });
        Some(is_done)
    }

    /// Removes note `id`, returning it.
    pub fn delete(&mut self, id: NoteId) -> Option<Note> {
        let Some(index) = self.notes.iter().position(|n| n.id == id) else {
            debug!("Delete ignored, note not found: {}", id);
            return None;
        };

        let removed = self.notes.remove(index);
        info!("Deleted note {} ({})", removed.id, removed.title);

        self.commit(NoteEvent::Deleted(removed.clone()));
        Some(removed)
    }

    /// Returns a lazy view of notes whose title or content contains `query`,
    /// ignoring case. An empty query matches every note.
    pub fn filter(&self, query: &str) -> NoteFilter<'_> {
        NoteFilter {
            notes: &self.notes,
            needle: query.to_lowercase(),
        }
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Writes the whole collection to the slot.
    pub fn persist(&self) -> Result<()> {
        trace!("Serializing {} notes", self.notes.len());
        let json = serde_json::to_string(&self.notes)?;

        self.kv
            .set(&self.slot, &json)
            .map_err(|e| StudyError::PersistenceWrite {
                slot: self.slot.clone(),
                message: e.to_string(),
            })
    }

    fn commit(&mut self, event: NoteEvent) {
        // Memory stays authoritative when the write fails
        if let Err(e) = self.persist() {
            error!("{}", e);
        }

        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    fn next_id(&mut self) -> NoteId {
        let now = Utc::now().timestamp_millis();
        match self.last_id.checked_add(1) {
            Some(next) => {
                let id = now.max(next);
                self.last_id = id;
                id
            }
            None => {
                // No room above the highest id; take the nearest free one below now
                let mut id = now;
                while self.notes.iter().any(|n| n.id == id) {
                    id -= 1;
                }
                warn!("Note ids exhausted above {}, using {}", self.last_id, id);
                id
            }
        }
    }
}

/// Reads and validates the collection stored in `slot`.
pub fn load_notes(kv: &dyn KeyValueStore, slot: &str) -> Result<Vec<Note>> {
    let read_error = |message: String| StudyError::PersistenceRead {
        slot: slot.to_string(),
        message,
    };

    let Some(raw) = kv.get(slot).map_err(|e| read_error(e.to_string()))? else {
        debug!("Slot {} is empty", slot);
        return Ok(Vec::new());
    };

    let notes: Vec<Note> = serde_json::from_str(&raw).map_err(|e| read_error(e.to_string()))?;

    let mut seen = std::collections::HashSet::with_capacity(notes.len());
    for note in &notes {
        if note.title.trim().is_empty() {
            return Err(read_error(format!("note {} has an empty title", note.id)));
        }
        if !seen.insert(note.id) {
            warn!("Duplicate note id {} in slot {}", note.id, slot);
            return Err(read_error(format!("duplicate note id {}", note.id)));
        }
    }

    Ok(notes)
}

/// A restartable, case-insensitive substring view over a note collection.
#[derive(Debug, Clone)]
pub struct NoteFilter<'a> {
    notes: &'a [Note],
    needle: String,
}

impl<'a> NoteFilter<'a> {
    /// Starts a fresh pass over the matching notes.
    pub fn iter(&self) -> FilterIter<'a, '_> {
        FilterIter {
            inner: self.notes.iter(),
            needle: &self.needle,
        }
    }

    /// Number of matching notes.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<'a, 'f> IntoIterator for &'f NoteFilter<'a> {
    type Item = &'a Note;
    type IntoIter = FilterIter<'a, 'f>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct FilterIter<'a, 'f> {
    inner: std::slice::Iter<'a, Note>,
    needle: &'f str,
}

impl<'a> Iterator for FilterIter<'a, '_> {
    type Item = &'a Note;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = self.needle;
        self.inner.by_ref().find(|note| note.matches(needle))
    }
}
