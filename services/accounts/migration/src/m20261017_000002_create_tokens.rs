use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tokens::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tokens::Token).string_len(255).not_null())
                    .col(ColumnDef::new(Tokens::Kind).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Tokens::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tokens::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Tokens::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(Tokens::IsUsed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Tokens::Table, Tokens::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Bearer lookups go by token string.
        manager
            .create_index(
                Index::create()
                    .table(Tokens::Table)
                    .col(Tokens::Token)
                    .name("idx_tokens_token")
                    .to_owned(),
            )
            .await?;

        // Reset lookups take the newest token per user and kind.
        manager
            .create_index(
                Index::create()
                    .table(Tokens::Table)
                    .col(Tokens::UserId)
                    .col(Tokens::Kind)
                    .col(Tokens::CreatedAt)
                    .name("idx_tokens_user_id_kind_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tokens::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tokens {
    Table,
    Id,
    Token,
    Kind,
    CreatedAt,
    ExpiresAt,
    UserId,
    IsUsed,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
