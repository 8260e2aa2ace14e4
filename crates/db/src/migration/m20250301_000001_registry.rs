//! Registry schema: countries, banks and SWIFT codes.
//!
//! Built with the schema builder so the same migration runs on Postgres and
//! SQLite. Parent rows are protected by `ON DELETE RESTRICT`; the repository
//! removes them explicitly once their last child is gone.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Countries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Countries::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Countries::Iso2Code)
                            .string_len(2)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Countries::Name).string_len(100).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Banks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Banks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Banks::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Banks::CountryId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_banks_country")
                            .from(Banks::Table, Banks::CountryId)
                            .to(Countries::Table, Countries::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Get-or-create of a bank conflicts on this pair.
        manager
            .create_index(
                Index::create()
                    .name("uq_banks_name_country")
                    .table(Banks::Table)
                    .col(Banks::Name)
                    .col(Banks::CountryId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SwiftCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SwiftCodes::SwiftCode)
                            .string_len(11)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SwiftCodes::BankId).uuid().not_null())
                    .col(ColumnDef::new(SwiftCodes::Address).string_len(255).not_null())
                    .col(ColumnDef::new(SwiftCodes::IsHeadquarter).boolean().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_swift_codes_bank")
                            .from(SwiftCodes::Table, SwiftCodes::BankId)
                            .to(Banks::Table, Banks::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_swift_codes_bank")
                    .table(SwiftCodes::Table)
                    .col(SwiftCodes::BankId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SwiftCodes::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Banks::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Countries::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Countries {
    Table,
    Id,
    Iso2Code,
    Name,
}

#[derive(DeriveIden)]
enum Banks {
    Table,
    Id,
    Name,
    CountryId,
}

#[derive(DeriveIden)]
enum SwiftCodes {
    Table,
    SwiftCode,
    BankId,
    Address,
    IsHeadquarter,
}
