//! Bot result entity for SeaORM.

use sea_orm::entity::prelude::*;

use legalbot_core::domain::{ChatId, StoredResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bot_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub chat_id: i64,
    #[sea_orm(column_type = "Text")]
    pub data: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to domain StoredResult.
impl From<Model> for StoredResult {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            chat_id: ChatId(model.chat_id),
            data: model.data,
            created_at: model.created_at.into(),
        }
    }
}
