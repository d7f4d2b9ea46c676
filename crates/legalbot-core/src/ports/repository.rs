use async_trait::async_trait;

use crate::domain::{ChatId, ResultId, StoredResult};
use crate::error::RepoError;

/// Persistence for completion results, keyed by chat.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Persist a result for `chat` and return its id.
    async fn save(&self, chat: ChatId, data: &str) -> Result<ResultId, RepoError>;

    /// Find a single result by id.
    async fn find_by_id(&self, id: ResultId) -> Result<Option<StoredResult>, RepoError>;

    /// Up to `limit` results for `chat`, most recent first.
    async fn recent(&self, chat: ChatId, limit: u64) -> Result<Vec<StoredResult>, RepoError>;

    /// Delete every result stored for `chat`.
    async fn delete_history(&self, chat: ChatId) -> Result<(), RepoError>;
}
