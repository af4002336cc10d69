//! Message board route handlers.
//!
//! Admins read every channel and post to the admin channel; officers read
//! and post to their department's channel.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use civic_core::{Channel, Role};

use crate::db::MessageRepository;
use crate::error::{AppError, Result, StoreContext};
use crate::middleware::Signed;
use crate::models::{CurrentUser, Message};
use crate::state::AppState;

use super::officer_department;

/// Body of `POST /api/messages`.
#[derive(Debug, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub text: String,
}

/// Channel the user posts to, `None` when they read every channel.
async fn own_channel(state: &AppState, user: &CurrentUser) -> Result<Option<Channel>> {
    match user.role() {
        Role::Admin => Ok(None),
        Role::Officer => Ok(Some(Channel::Department(
            officer_department(state, user).await?,
        ))),
        Role::Citizen | Role::Unknown => Err(AppError::Forbidden(
            "Messages are available to officers and admins only.".to_owned(),
        )),
    }
}

/// `GET /api/messages`
pub async fn list(
    Signed(user): Signed,
    State(state): State<AppState>,
) -> Result<Json<Vec<Message>>> {
    let messages = MessageRepository::new(state.pool());
    let list = match own_channel(&state, &user).await? {
        None => messages.list_all().await,
        Some(channel) => messages.list_channel(channel).await,
    }
    .context("load messages")?;
    Ok(Json(list))
}

/// `POST /api/messages`
#[tracing::instrument(skip_all, fields(sender = %user.email))]
pub async fn post(
    Signed(user): Signed,
    State(state): State<AppState>,
    payload: std::result::Result<Json<MessageForm>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(form) = payload?;
    let text = form.text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("Message cannot be empty.".to_owned()));
    }

    let channel = own_channel(&state, &user).await?.unwrap_or(Channel::Admin);
    let message = MessageRepository::new(state.pool())
        .post(channel, &user.email, text)
        .await
        .context("send message")?;

    tracing::info!(message_id = %message.id, channel = channel.as_str(), "Message posted");

    Ok((StatusCode::CREATED, Json(message)))
}
