//! Create `lode_entry` table.
//!
//! One row per resolved key. The key itself is the primary key so writes can
//! upsert on it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LodeEntry::Table)
                    .if_not_exists()
                    .col(string_len(LodeEntry::Key, 512).primary_key())
                    .col(text(LodeEntry::Value).not_null())
                    .col(timestamp_with_time_zone(LodeEntry::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(LodeEntry::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum LodeEntry { Table, Key, Value, UpdatedAt }
