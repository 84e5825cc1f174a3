use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Characters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Characters::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Characters::UserId).integer().not_null())
                    .col(ColumnDef::new(Characters::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Characters::Faction).string_len(50).not_null())
                    .col(ColumnDef::new(Characters::Race).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Characters::CharacterClass)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Characters::Level)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Characters::Experience)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Characters::Gold)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Characters::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Characters::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Characters::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Characters::Table, Characters::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // sea-query has no partial index builder.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_characters_one_active_per_user \
                 ON characters (user_id) WHERE is_active",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Characters::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Characters {
    Table,
    Id,
    UserId,
    Name,
    Faction,
    Race,
    CharacterClass,
    Level,
    Experience,
    Gold,
    CreatedAt,
    UpdatedAt,
    IsActive,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
