use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sellable item from the catalog. Line items may reference a product or
/// describe a one-off item with no catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Decimal,
    /// Tax rate in percent, validated against the configured allow-list
    pub tax_rate: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::invoice_item::Entity")]
    InvoiceItems,
    #[sea_orm(has_many = "super::proforma_item::Entity")]
    ProformaItems,
    #[sea_orm(has_many = "super::delivery_note_item::Entity")]
    DeliveryNoteItems,
}

impl Related<super::invoice_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceItems.def()
    }
}

impl Related<super::proforma_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProformaItems.def()
    }
}

impl Related<super::delivery_note_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryNoteItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
