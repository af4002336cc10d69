//! In-memory note store.
//!
//! Notes live only as long as the process. The store is cheap to clone and
//! shared across handlers through axum state.

use std::sync::Arc;

use civic_core::Note;
use tokio::sync::RwLock;

/// Ordered, in-memory list of notes.
#[derive(Debug, Clone, Default)]
pub struct NoteStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    notes: Vec<Note>,
    last_id: i64,
}

impl Inner {
    /// Millisecond timestamp, bumped past the previous id when the clock has
    /// not advanced.
    fn next_id(&mut self, now_ms: i64) -> i64 {
        let id = now_ms.max(self.last_id.saturating_add(1));
        self.last_id = id;
        id
    }
}

impl NoteStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All notes in insertion order.
    pub async fn list(&self) -> Vec<Note> {
        self.inner.read().await.notes.clone()
    }

    /// Append a note and return it.
    pub async fn create(&self, text: String) -> Note {
        self.create_at(chrono::Utc::now().timestamp_millis(), text)
            .await
    }

    async fn create_at(&self, now_ms: i64, text: String) -> Note {
        let mut inner = self.inner.write().await;
        let note = Note {
            id: inner.next_id(now_ms),
            text,
        };
        inner.notes.push(note.clone());
        note
    }

    /// Remove the note with `id`. Returns whether anything was removed.
    pub async fn delete(&self, id: i64) -> bool {
        let mut inner = self.inner.write().await;
        let before = inner.notes.len();
        inner.notes.retain(|note| note.id != id);
        inner.notes.len() != before
    }

    /// Number of stored notes.
    pub async fn len(&self) -> usize {
        self.inner.read().await.notes.len()
    }

    /// Returns `true` when no notes are stored.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.notes.is_empty()
    }
}
