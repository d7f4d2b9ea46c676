use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BotResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BotResults::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BotResults::ChatId).big_integer().not_null())
                    .col(ColumnDef::new(BotResults::Data).text().not_null())
                    .col(
                        ColumnDef::new(BotResults::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Serves "latest results for a chat" and per-chat deletion.
        manager
            .create_index(
                Index::create()
                    .name("idx_bot_results_chat_id_id")
                    .table(BotResults::Table)
                    .col(BotResults::ChatId)
                    .col(BotResults::Id)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BotResults::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BotResults {
    Table,
    Id,
    ChatId,
    Data,
    CreatedAt,
}
