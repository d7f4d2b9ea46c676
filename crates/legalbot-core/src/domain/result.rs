use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ChatId;

/// Identifier assigned to a stored result by the result store.
pub type ResultId = i64;

/// A completion result persisted for a chat.
///
/// Records are immutable once saved; history is removed per chat, never per record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResult {
    pub id: ResultId,
    pub chat_id: ChatId,
    pub data: String,
    pub created_at: DateTime<Utc>,
}
