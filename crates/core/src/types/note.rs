//! Note records served by the note-list service.

use serde::{Deserialize, Serialize};

/// A stored note. `id` is a millisecond timestamp unique within the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub text: String,
}

/// Request body for creating a note. A missing `text` is an empty note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewNote {
    #[serde(default)]
    pub text: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_note_missing_text() {
        let note: NewNote = serde_json::from_str("{}").unwrap();
        assert_eq!(note.text, "");
    }

    #[test]
    fn test_note_json_shape() {
        let note = Note {
            id: 1_700_000_000_000,
            text: "buy milk".to_owned(),
        };
        assert_eq!(
            serde_json::to_string(&note).unwrap(),
            r#"{"id":1700000000000,"text":"buy milk"}"#
        );
    }
}
