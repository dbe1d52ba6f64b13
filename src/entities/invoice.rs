use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "finalized")]
    Finalized,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Finalized => "finalized",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    /// Explicit transition table. `paid` and `cancelled` are terminal;
    /// a paid invoice cannot be cancelled.
    pub fn can_transition_to(&self, target: InvoiceStatus) -> bool {
        use InvoiceStatus::*;
        matches!(
            (self, target),
            (Draft, Finalized) | (Draft, Paid) | (Finalized, Paid) | (Draft, Cancelled)
                | (Finalized, Cancelled)
        )
    }

    /// Statuses counted as "pending" on the dashboard.
    pub fn is_pending(&self) -> bool {
        matches!(self, InvoiceStatus::Draft | InvoiceStatus::Finalized)
    }
}

/// Invoice header. The three totals are cached aggregates over the items
/// and must be refreshed after any item mutation.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub number: String,
    pub client_id: i64,
    pub created_by: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub total_before_tax: Decimal,
    pub total_tax: Decimal,
    pub total_with_tax: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    CreatedBy,
    #[sea_orm(has_many = "super::invoice_item::Entity")]
    Items,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedBy.def()
    }
}

impl Related<super::invoice_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::InvoiceStatus::*;

    #[test]
    fn transition_table_guards_terminal_states() {
        assert!(Draft.can_transition_to(Finalized));
        assert!(Finalized.can_transition_to(Paid));
        assert!(Draft.can_transition_to(Cancelled));
        assert!(Finalized.can_transition_to(Cancelled));

        assert!(!Paid.can_transition_to(Cancelled));
        assert!(!Paid.can_transition_to(Finalized));
        assert!(!Cancelled.can_transition_to(Draft));
        assert!(!Finalized.can_transition_to(Finalized));
    }

    #[test]
    fn pending_covers_draft_and_finalized() {
        assert!(Draft.is_pending());
        assert!(Finalized.is_pending());
        assert!(!Paid.is_pending());
        assert!(!Cancelled.is_pending());
    }
}
