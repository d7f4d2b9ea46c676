//! In-memory result store - used when no database is configured.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use legalbot_core::domain::{ChatId, ResultId, StoredResult};
use legalbot_core::error::RepoError;
use legalbot_core::ports::ResultStore;

/// In-memory result store backed by an append-only vector.
///
/// Note: Data is lost on process restart.
pub struct InMemoryResultStore {
    results: RwLock<Vec<StoredResult>>,
    next_id: AtomicI64,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self {
            results: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryResultStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn save(&self, chat: ChatId, data: &str) -> Result<ResultId, RepoError> {
        let mut results = self.results.write().await;
        // Taken under the write lock so vector order matches id order
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        results.push(StoredResult {
            id,
            chat_id: chat,
            data: data.to_string(),
            created_at: Utc::now(),
        });

        tracing::debug!(chat_id = %chat, result_id = id, "Result saved in memory");
        Ok(id)
    }

    async fn find_by_id(&self, id: ResultId) -> Result<Option<StoredResult>, RepoError> {
        let results = self.results.read().await;
        Ok(results.iter().find(|r| r.id == id).cloned())
    }

    async fn recent(&self, chat: ChatId, limit: u64) -> Result<Vec<StoredResult>, RepoError> {
        let results = self.results.read().await;
        Ok(results
            .iter()
            .rev()
            .filter(|r| r.chat_id == chat)
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn delete_history(&self, chat: ChatId) -> Result<(), RepoError> {
        let mut results = self.results.write().await;
        results.retain(|r| r.chat_id != chat);
        tracing::debug!(chat_id = %chat, "History deleted from memory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_find() {
        let store = InMemoryResultStore::new();
        let id = store.save(ChatId(123), "hi").await.unwrap();

        let found = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.chat_id, ChatId(123));
        assert_eq!(found.data, "hi");
    }

    #[tokio::test]
    async fn test_recent_is_most_recent_first() {
        let store = InMemoryResultStore::new();
        let first = store.save(ChatId(1), "a").await.unwrap();
        store.save(ChatId(2), "other chat").await.unwrap();
        let second = store.save(ChatId(1), "b").await.unwrap();
        let third = store.save(ChatId(1), "c").await.unwrap();

        let ids: Vec<_> = store
            .recent(ChatId(1), 5)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![third, second, first]);

        let limited = store.recent(ChatId(1), 2).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].id, third);
    }

    #[tokio::test]
    async fn test_delete_history_only_touches_one_chat() {
        let store = InMemoryResultStore::new();
        store.save(ChatId(1), "a").await.unwrap();
        let kept = store.save(ChatId(2), "b").await.unwrap();

        store.delete_history(ChatId(1)).await.unwrap();

        assert!(store.recent(ChatId(1), 5).await.unwrap().is_empty());
        assert!(store.find_by_id(kept).await.unwrap().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_keep_id_order() {
        let store = std::sync::Arc::new(InMemoryResultStore::new());
        let handles: Vec<_> = (0..64)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.save(ChatId(1), &i.to_string()).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let ids: Vec<_> = store
            .recent(ChatId(1), 64)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        let expected: Vec<ResultId> = (1..=64).rev().collect();
        assert_eq!(ids, expected);
    }
}
