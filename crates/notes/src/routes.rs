//! Note endpoints.
//!
//! - `GET /notes` - all notes, oldest first
//! - `POST /notes` - append `{text}`, respond 201 with the stored note
//! - `DELETE /notes/{id}` - remove by id, always 204

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{delete, get},
};
use civic_core::{NewNote, Note};

use crate::error::ApiError;
use crate::store::NoteStore;

/// Build the note router.
pub fn routes() -> Router<NoteStore> {
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/{id}", delete(delete_note))
}

/// List every stored note.
pub async fn list_notes(State(store): State<NoteStore>) -> Json<Vec<Note>> {
    Json(store.list().await)
}

/// Store a new note.
///
/// A request without a JSON content type is treated as an empty object and
/// stores an empty note.
///
/// # Errors
///
/// Returns `ApiError::BadRequest` when a JSON body is malformed.
pub async fn create_note(
    State(store): State<NoteStore>,
    payload: Result<Json<NewNote>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let new_note = match payload {
        Ok(Json(new_note)) => new_note,
        Err(JsonRejection::MissingJsonContentType(_)) => NewNote::default(),
        Err(rejection) => return Err(rejection.into()),
    };
    let note = store.create(new_note.text).await;
    tracing::info!(note_id = note.id, "Note created");
    Ok((StatusCode::CREATED, Json(note)))
}

/// Delete a note. Unknown and unparsable ids are a no-op.
pub async fn delete_note(State(store): State<NoteStore>, Path(id): Path<String>) -> StatusCode {
    match parse_note_id(&id) {
        Some(id) => {
            let removed = store.delete(id).await;
            tracing::info!(note_id = id, removed, "Note delete requested");
        }
        None => tracing::debug!(raw_id = %id, "Ignoring delete for non-numeric note id"),
    }
    StatusCode::NO_CONTENT
}

/// Parse the leading integer of a path segment (`"12abc"` is 12).
fn parse_note_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['-', '+']));
    let digits_end = trimmed
        .char_indices()
        .skip(sign_len)
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(trimmed.len(), |(i, _)| i);
    trimmed.get(..digits_end)?.parse().ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{Request, header};

    use super::*;

    async fn json_payload(body: &'static str) -> Result<Json<NewNote>, JsonRejection> {
        let request = Request::builder()
            .method("POST")
            .uri("/notes")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        Json::<NewNote>::from_request(request, &()).await
    }

    #[test]
    fn test_parse_note_id() {
        assert_eq!(parse_note_id("1700000000000"), Some(1_700_000_000_000));
        assert_eq!(parse_note_id("12abc"), Some(12));
        assert_eq!(parse_note_id("-5"), Some(-5));
        assert_eq!(parse_note_id("abc"), None);
        assert_eq!(parse_note_id(""), None);
        assert_eq!(parse_note_id("-"), None);
    }

    #[tokio::test]
    async fn test_create_returns_created() {
        let store = NoteStore::new();
        let payload = json_payload(r#"{"text":"buy milk"}"#).await;
        let (status, Json(note)) = create_note(State(store.clone()), payload).await.unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(note.text, "buy milk");
        assert!(note.id > 0);
        assert_eq!(store.list().await, vec![note]);
    }

    #[tokio::test]
    async fn test_create_without_text_stores_empty_note() {
        let store = NoteStore::new();
        let (_, Json(note)) = create_note(State(store), json_payload("{}").await)
            .await
            .unwrap();
        assert_eq!(note.text, "");
    }

    #[tokio::test]
    async fn test_create_without_content_type_stores_empty_note() {
        let store = NoteStore::new();
        let request = Request::builder()
            .method("POST")
            .uri("/notes")
            .body(Body::from("text=buy milk"))
            .unwrap();
        let payload = Json::<NewNote>::from_request(request, &()).await;

        let (status, Json(note)) = create_note(State(store.clone()), payload).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(note.text, "");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_malformed_json_is_bad_request() {
        let store = NoteStore::new();
        let result = create_note(State(store.clone()), json_payload("{\"text\":").await).await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_always_no_content() {
        let store = NoteStore::new();
        let note = store.create("buy milk".to_owned()).await;

        let status = delete_note(State(store.clone()), Path("999".to_owned())).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(store.len().await, 1);

        let status = delete_note(State(store.clone()), Path("not-a-number".to_owned())).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(store.len().await, 1);

        let status = delete_note(State(store.clone()), Path(note.id.to_string())).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_buy_milk_lifecycle() {
        let store = NoteStore::new();

        let payload = json_payload(r#"{"text":"buy milk"}"#).await;
        let (status, Json(note)) = create_note(State(store.clone()), payload).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(listed) = list_notes(State(store.clone())).await;
        assert_eq!(listed, vec![note.clone()]);

        let status = delete_note(State(store.clone()), Path(note.id.to_string())).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let Json(listed) = list_notes(State(store)).await;
        assert!(listed.is_empty());
    }
}
