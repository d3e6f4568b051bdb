//! Create blocked_dates table
//!
//! Manually authored days removed from availability, optionally scoped
//! to a single machine.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlockedDates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlockedDates::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BlockedDates::Date).date().not_null())
                    .col(ColumnDef::new(BlockedDates::MachineId).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blocked_dates_date")
                    .table(BlockedDates::Table)
                    .col(BlockedDates::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BlockedDates::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum BlockedDates {
    Table,
    Id,
    Date,
    MachineId,
}
