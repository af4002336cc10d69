//! Message board repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use civic_core::{Channel, Email, MessageId};

use super::{RepositoryError, parse_column};
use crate::models::Message;

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: i32,
    channel: String,
    sender_email: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MessageRow> for Message {
    type Error = RepositoryError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MessageId::new(row.id),
            channel: parse_column("channel", &row.channel)?,
            sender: parse_column("sender_email", &row.sender_email)?,
            text: row.body,
            created_at: row.created_at,
        })
    }
}

/// Repository for the message board.
pub struct MessageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MessageRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every message across channels, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r"
            SELECT id, channel, sender_email, body, created_at
            FROM portal.message
            ORDER BY created_at, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Message::try_from).collect()
    }

    /// Messages of one channel, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_channel(&self, channel: Channel) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r"
            SELECT id, channel, sender_email, body, created_at
            FROM portal.message
            WHERE channel = $1
            ORDER BY created_at, id
            ",
        )
        .bind(channel.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Message::try_from).collect()
    }

    /// Post a message stamped with the server time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn post(
        &self,
        channel: Channel,
        sender: &Email,
        text: &str,
    ) -> Result<Message, RepositoryError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r"
            INSERT INTO portal.message (channel, sender_email, body)
            VALUES ($1, $2, $3)
            RETURNING id, channel, sender_email, body, created_at
            ",
        )
        .bind(channel.as_str())
        .bind(sender.as_str())
        .bind(text)
        .fetch_one(self.pool)
        .await?;

        Message::try_from(row)
    }
}
