//! PostgreSQL result store.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use legalbot_core::domain::{ChatId, ResultId, StoredResult};
use legalbot_core::error::RepoError;
use legalbot_core::ports::ResultStore;

use super::entity::bot_result::{self, Entity as BotResult};

/// Result store backed by the `bot_results` table.
pub struct PostgresResultStore {
    db: DbConn,
}

impl PostgresResultStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn db_error(op: &str, err: DbErr) -> RepoError {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
            RepoError::Connection(format!("{op}: {err}"))
        }
        _ => RepoError::Query(format!("{op}: {err}")),
    }
}

#[async_trait]
impl ResultStore for PostgresResultStore {
    async fn save(&self, chat: ChatId, data: &str) -> Result<ResultId, RepoError> {
        let model = bot_result::ActiveModel {
            id: NotSet,
            chat_id: Set(chat.get()),
            data: Set(data.to_string()),
            created_at: NotSet,
        }
        .insert(&self.db)
        .await
        .map_err(|e| db_error("save result", e))?;

        tracing::info!(chat_id = %chat, result_id = model.id, "Result saved");
        Ok(model.id)
    }

    async fn find_by_id(&self, id: ResultId) -> Result<Option<StoredResult>, RepoError> {
        let result = BotResult::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| db_error("get result", e))?;

        Ok(result.map(Into::into))
    }

    async fn recent(&self, chat: ChatId, limit: u64) -> Result<Vec<StoredResult>, RepoError> {
        let results = BotResult::find()
            .filter(bot_result::Column::ChatId.eq(chat.get()))
            .order_by_desc(bot_result::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| db_error("recent results", e))?;

        tracing::debug!(chat_id = %chat, count = results.len(), "Recent results loaded");
        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn delete_history(&self, chat: ChatId) -> Result<(), RepoError> {
        let result = BotResult::delete_many()
            .filter(bot_result::Column::ChatId.eq(chat.get()))
            .exec(&self.db)
            .await
            .map_err(|e| db_error("delete history", e))?;

        tracing::info!(chat_id = %chat, deleted = result.rows_affected, "History deleted");
        Ok(())
    }
}
