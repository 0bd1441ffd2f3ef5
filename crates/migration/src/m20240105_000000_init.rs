//! Initial schema migration.
//!
//! Creates the complete schema for BookKeeper:
//!
//! - `labels`: income/expenditure categories, soft-deleted only
//! - `expenditures`: outgoing payments, each tagged with an expenditure label
//! - `incomes`: incoming payments, each tagged with an income label
//!
//! Amounts are stored as their canonical decimal string so they round-trip
//! exactly through SQLite.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Labels {
    Table,
    Id,
    Name,
    IsIncome,
    IsDeleted,
    CreatedOnUtc,
    UpdatedOnUtc,
}

#[derive(Iden)]
enum Expenditures {
    Table,
    Id,
    PaymentName,
    Amount,
    PaymentDateOnUtc,
    LabelId,
    CreatedOnUtc,
    UpdatedOnUtc,
}

#[derive(Iden)]
enum Incomes {
    Table,
    Id,
    IncomeName,
    Amount,
    IncomeDateOnUtc,
    LabelId,
    CreatedOnUtc,
    UpdatedOnUtc,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Labels
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Labels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Labels::Id)
                            .string_len(500)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Labels::Name).string_len(500).not_null())
                    .col(ColumnDef::new(Labels::IsIncome).boolean().not_null())
                    .col(
                        ColumnDef::new(Labels::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Labels::CreatedOnUtc).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Labels::UpdatedOnUtc).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-labels-created_on_utc")
                    .table(Labels::Table)
                    .col(Labels::CreatedOnUtc)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Expenditures
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenditures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenditures::Id)
                            .string_len(500)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Expenditures::PaymentName)
                            .string_len(500)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenditures::Amount).string().not_null())
                    .col(
                        ColumnDef::new(Expenditures::PaymentDateOnUtc)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Expenditures::LabelId)
                            .string_len(500)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Expenditures::CreatedOnUtc)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenditures::UpdatedOnUtc).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenditures-label_id")
                            .from(Expenditures::Table, Expenditures::LabelId)
                            .to(Labels::Table, Labels::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenditures-created_on_utc")
                    .table(Expenditures::Table)
                    .col(Expenditures::CreatedOnUtc)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Incomes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Incomes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Incomes::Id)
                            .string_len(500)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Incomes::IncomeName)
                            .string_len(500)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Incomes::Amount).string().not_null())
                    .col(ColumnDef::new(Incomes::IncomeDateOnUtc).date().not_null())
                    .col(ColumnDef::new(Incomes::LabelId).string_len(500).not_null())
                    .col(
                        ColumnDef::new(Incomes::CreatedOnUtc)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Incomes::UpdatedOnUtc).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-incomes-label_id")
                            .from(Incomes::Table, Incomes::LabelId)
                            .to(Labels::Table, Labels::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-incomes-created_on_utc")
                    .table(Incomes::Table)
                    .col(Incomes::CreatedOnUtc)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Incomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenditures::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Labels::Table).to_owned())
            .await?;
        Ok(())
    }
}
