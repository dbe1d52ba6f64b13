use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users_table::Migration),
            Box::new(m20250101_000002_create_clients_table::Migration),
            Box::new(m20250101_000003_create_products_table::Migration),
            Box::new(m20250101_000004_create_invoice_tables::Migration),
            Box::new(m20250101_000005_create_proforma_tables::Migration),
            Box::new(m20250101_000006_create_delivery_note_tables::Migration),
        ]
    }
}

mod m20250101_000001_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Users::Username)
                                .string_len(150)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::Email).string().null())
                        .col(ColumnDef::new(Users::FirstName).string().null())
                        .col(ColumnDef::new(Users::LastName).string().null())
                        .col(
                            ColumnDef::new(Users::Role)
                                .string_len(20)
                                .not_null()
                                .default("agent"),
                        )
                        .col(ColumnDef::new(Users::Phone).string_len(20).null())
                        .col(ColumnDef::new(Users::PasswordHash).text().not_null())
                        .col(
                            ColumnDef::new(Users::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Users {
        Table,
        Id,
        Username,
        Email,
        FirstName,
        LastName,
        Role,
        Phone,
        PasswordHash,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250101_000002_create_clients_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_clients_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Clients::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Clients::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Clients::Name).string().not_null())
                        .col(ColumnDef::new(Clients::Phone).string_len(20).null())
                        .col(ColumnDef::new(Clients::Email).string().null())
                        .col(ColumnDef::new(Clients::Address).text().null())
                        .col(ColumnDef::new(Clients::TaxId).string_len(50).null())
                        .col(
                            ColumnDef::new(Clients::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Clients::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_clients_name")
                        .table(Clients::Table)
                        .col(Clients::Name)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Clients::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Clients {
        Table,
        Id,
        Name,
        Phone,
        Email,
        Address,
        TaxId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250101_000003_create_products_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000003_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::Description).text().null())
                        .col(ColumnDef::new(Products::UnitPrice).decimal().not_null())
                        .col(
                            ColumnDef::new(Products::TaxRate)
                                .decimal()
                                .not_null()
                                .default(18),
                        )
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Products {
        Table,
        Id,
        Name,
        Description,
        UnitPrice,
        TaxRate,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250101_000004_create_invoice_tables {
    use sea_orm_migration::prelude::*;

    use super::m20250101_000001_create_users_table::Users;
    use super::m20250101_000002_create_clients_table::Clients;
    use super::m20250101_000003_create_products_table::Products;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000004_create_invoice_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Invoices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Invoices::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Invoices::Number).string_len(20).not_null())
                        .col(ColumnDef::new(Invoices::ClientId).big_integer().not_null())
                        .col(
                            ColumnDef::new(Invoices::CreatedBy)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Invoices::Status)
                                .string_len(20)
                                .not_null()
                                .default("draft"),
                        )
                        .col(ColumnDef::new(Invoices::Date).date().not_null())
                        .col(ColumnDef::new(Invoices::DueDate).date().null())
                        .col(ColumnDef::new(Invoices::Notes).text().null())
                        .col(
                            ColumnDef::new(Invoices::TotalBeforeTax)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Invoices::TotalTax)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Invoices::TotalWithTax)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Invoices::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Invoices::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoices_client")
                                .from(Invoices::Table, Invoices::ClientId)
                                .to(Clients::Table, Clients::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoices_created_by")
                                .from(Invoices::Table, Invoices::CreatedBy)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            // The numbering service relies on this to reject the
            // read-then-write race; creation retries on conflict.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_invoices_number")
                        .table(Invoices::Table)
                        .col(Invoices::Number)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoices_client_id")
                        .table(Invoices::Table)
                        .col(Invoices::ClientId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoices_date")
                        .table(Invoices::Table)
                        .col(Invoices::Date)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InvoiceItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InvoiceItems::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(InvoiceItems::InvoiceId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InvoiceItems::ProductId)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(InvoiceItems::Description)
                                .string_len(500)
                                .not_null(),
                        )
                        .col(ColumnDef::new(InvoiceItems::Quantity).decimal().not_null())
                        .col(
                            ColumnDef::new(InvoiceItems::UnitPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InvoiceItems::TaxRate).decimal().not_null())
                        .col(
                            ColumnDef::new(InvoiceItems::TotalBeforeTax)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InvoiceItems::TotalTax)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InvoiceItems::TotalWithTax)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoice_items_invoice")
                                .from(InvoiceItems::Table, InvoiceItems::InvoiceId)
                                .to(Invoices::Table, Invoices::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoice_items_product")
                                .from(InvoiceItems::Table, InvoiceItems::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoice_items_invoice_id")
                        .table(InvoiceItems::Table)
                        .col(InvoiceItems::InvoiceId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InvoiceItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Invoices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Invoices {
        Table,
        Id,
        Number,
        ClientId,
        CreatedBy,
        Status,
        Date,
        DueDate,
        Notes,
        TotalBeforeTax,
        TotalTax,
        TotalWithTax,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum InvoiceItems {
        Table,
        Id,
        InvoiceId,
        ProductId,
        Description,
        Quantity,
        UnitPrice,
        TaxRate,
        TotalBeforeTax,
        TotalTax,
        TotalWithTax,
    }
}

mod m20250101_000005_create_proforma_tables {
    use sea_orm_migration::prelude::*;

    use super::m20250101_000001_create_users_table::Users;
    use super::m20250101_000002_create_clients_table::Clients;
    use super::m20250101_000003_create_products_table::Products;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000005_create_proforma_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Proformas::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Proformas::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Proformas::Number).string_len(20).not_null())
                        .col(
                            ColumnDef::new(Proformas::ClientId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Proformas::CreatedBy)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Proformas::Status)
                                .string_len(20)
                                .not_null()
                                .default("draft"),
                        )
                        .col(ColumnDef::new(Proformas::Date).date().not_null())
                        .col(ColumnDef::new(Proformas::ValidityDate).date().null())
                        .col(ColumnDef::new(Proformas::Notes).text().null())
                        .col(
                            ColumnDef::new(Proformas::TotalBeforeTax)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Proformas::TotalTax)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Proformas::TotalWithTax)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Proformas::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Proformas::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_proformas_client")
                                .from(Proformas::Table, Proformas::ClientId)
                                .to(Clients::Table, Clients::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_proformas_created_by")
                                .from(Proformas::Table, Proformas::CreatedBy)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_proformas_number")
                        .table(Proformas::Table)
                        .col(Proformas::Number)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_proformas_client_id")
                        .table(Proformas::Table)
                        .col(Proformas::ClientId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProformaItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProformaItems::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ProformaItems::ProformaId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProformaItems::ProductId)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ProformaItems::Description)
                                .string_len(500)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProformaItems::Quantity)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProformaItems::UnitPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProformaItems::TaxRate).decimal().not_null())
                        .col(
                            ColumnDef::new(ProformaItems::TotalBeforeTax)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProformaItems::TotalTax)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProformaItems::TotalWithTax)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_proforma_items_proforma")
                                .from(ProformaItems::Table, ProformaItems::ProformaId)
                                .to(Proformas::Table, Proformas::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_proforma_items_product")
                                .from(ProformaItems::Table, ProformaItems::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_proforma_items_proforma_id")
                        .table(ProformaItems::Table)
                        .col(ProformaItems::ProformaId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProformaItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Proformas::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Proformas {
        Table,
        Id,
        Number,
        ClientId,
        CreatedBy,
        Status,
        Date,
        ValidityDate,
        Notes,
        TotalBeforeTax,
        TotalTax,
        TotalWithTax,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum ProformaItems {
        Table,
        Id,
        ProformaId,
        ProductId,
        Description,
        Quantity,
        UnitPrice,
        TaxRate,
        TotalBeforeTax,
        TotalTax,
        TotalWithTax,
    }
}

mod m20250101_000006_create_delivery_note_tables {
    use sea_orm_migration::prelude::*;

    use super::m20250101_000001_create_users_table::Users;
    use super::m20250101_000002_create_clients_table::Clients;
    use super::m20250101_000003_create_products_table::Products;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000006_create_delivery_note_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DeliveryNotes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeliveryNotes::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(DeliveryNotes::Number)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryNotes::ClientId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryNotes::CreatedBy)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DeliveryNotes::Date).date().not_null())
                        .col(
                            ColumnDef::new(DeliveryNotes::PaymentMethod)
                                .string_len(20)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryNotes::DeliveredBy)
                                .string_len(100)
                                .null(),
                        )
                        .col(ColumnDef::new(DeliveryNotes::Notes).text().null())
                        .col(
                            ColumnDef::new(DeliveryNotes::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryNotes::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_delivery_notes_client")
                                .from(DeliveryNotes::Table, DeliveryNotes::ClientId)
                                .to(Clients::Table, Clients::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_delivery_notes_created_by")
                                .from(DeliveryNotes::Table, DeliveryNotes::CreatedBy)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_delivery_notes_number")
                        .table(DeliveryNotes::Table)
                        .col(DeliveryNotes::Number)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(DeliveryNoteItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeliveryNoteItems::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(DeliveryNoteItems::DeliveryNoteId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryNoteItems::ProductId)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryNoteItems::Description)
                                .string_len(500)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryNoteItems::Quantity)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryNoteItems::Observation)
                                .string_len(500)
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_delivery_note_items_note")
                                .from(
                                    DeliveryNoteItems::Table,
                                    DeliveryNoteItems::DeliveryNoteId,
                                )
                                .to(DeliveryNotes::Table, DeliveryNotes::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_delivery_note_items_product")
                                .from(DeliveryNoteItems::Table, DeliveryNoteItems::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_delivery_note_items_note_id")
                        .table(DeliveryNoteItems::Table)
                        .col(DeliveryNoteItems::DeliveryNoteId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DeliveryNoteItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(DeliveryNotes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum DeliveryNotes {
        Table,
        Id,
        Number,
        ClientId,
        CreatedBy,
        Date,
        PaymentMethod,
        DeliveredBy,
        Notes,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum DeliveryNoteItems {
        Table,
        Id,
        DeliveryNoteId,
        ProductId,
        Description,
        Quantity,
        Observation,
    }
}
