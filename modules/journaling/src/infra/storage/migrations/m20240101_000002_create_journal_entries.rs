use sea_orm_migration::prelude::*;

pub const USER_DATE_INDEX: &str = "idx_journal_entries_user_date";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // no FK to users: owners are resolved per request and may lack a profile row
        manager
            .create_table(
                Table::create()
                    .table(JournalEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JournalEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JournalEntries::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(JournalEntries::Title)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(JournalEntries::Content).text().not_null())
                    .col(ColumnDef::new(JournalEntries::EntryDate).date().not_null())
                    .col(ColumnDef::new(JournalEntries::MoodRating).integer().null())
                    .col(ColumnDef::new(JournalEntries::EnergyLevel).integer().null())
                    .col(ColumnDef::new(JournalEntries::Tags).string_len(500).null())
                    .col(
                        ColumnDef::new(JournalEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JournalEntries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(USER_DATE_INDEX)
                    .table(JournalEntries::Table)
                    .col(JournalEntries::UserId)
                    .col(JournalEntries::EntryDate)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(USER_DATE_INDEX)
                    .table(JournalEntries::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(JournalEntries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum JournalEntries {
    Table,
    Id,
    UserId,
    Title,
    Content,
    EntryDate,
    MoodRating,
    EnergyLevel,
    Tags,
    CreatedAt,
    UpdatedAt,
}
