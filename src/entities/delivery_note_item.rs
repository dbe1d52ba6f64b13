use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Delivery note line item: quantity and description only, no prices.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "delivery_note_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub delivery_note_id: i64,
    pub product_id: Option<i64>,
    pub description: String,
    pub quantity: Decimal,
    pub observation: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::delivery_note::Entity",
        from = "Column::DeliveryNoteId",
        to = "super::delivery_note::Column::Id",
        on_delete = "Cascade"
    )]
    DeliveryNote,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::delivery_note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryNote.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
