//! Create reservations table
//!
//! Stores machine rental reservations through their payment lifecycle.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::ProductId).string().not_null())
                    .col(ColumnDef::new(Reservations::StartDate).date().not_null())
                    .col(ColumnDef::new(Reservations::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(Reservations::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Reservations::CustomerName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::CustomerEmail)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::CustomerPhone)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::Fulfillment)
                            .string()
                            .not_null()
                            .default("pickup"),
                    )
                    .col(ColumnDef::new(Reservations::DeliveryAddress).string())
                    .col(ColumnDef::new(Reservations::Notes).string())
                    .col(
                        ColumnDef::new(Reservations::TotalAmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::DepositAmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reservations::CheckoutSessionId).string())
                    .col(ColumnDef::new(Reservations::PaymentIntentId).string())
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_status")
                    .table(Reservations::Table)
                    .col(Reservations::Status)
                    .to_owned(),
            )
            .await?;

        // Overlap queries filter on both span endpoints
        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_span")
                    .table(Reservations::Table)
                    .col(Reservations::StartDate)
                    .col(Reservations::EndDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    ProductId,
    StartDate,
    EndDate,
    Status,
    CustomerName,
    CustomerEmail,
    CustomerPhone,
    Fulfillment,
    DeliveryAddress,
    Notes,
    TotalAmountCents,
    DepositAmountCents,
    CheckoutSessionId,
    PaymentIntentId,
    CreatedAt,
}
