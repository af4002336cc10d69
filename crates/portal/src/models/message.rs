//! Message board domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use civic_core::{Channel, Email, MessageId};

/// A message posted to a department or admin channel.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub channel: Channel,
    pub sender: Email,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
