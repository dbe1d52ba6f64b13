use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ProformaStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "converted")]
    Converted,
}

impl ProformaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProformaStatus::Draft => "draft",
            ProformaStatus::Sent => "sent",
            ProformaStatus::Accepted => "accepted",
            ProformaStatus::Rejected => "rejected",
            ProformaStatus::Converted => "converted",
        }
    }

    /// Explicit transition table for the quote workflow. Conversion is
    /// handled separately and is allowed from any non-converted status.
    pub fn can_transition_to(&self, target: ProformaStatus) -> bool {
        use ProformaStatus::*;
        matches!(
            (self, target),
            (Draft, Sent) | (Sent, Accepted) | (Sent, Rejected)
        )
    }

    /// Statuses counted as "pending" in monthly stats.
    pub fn is_pending(&self) -> bool {
        matches!(self, ProformaStatus::Draft | ProformaStatus::Sent)
    }
}

/// Proforma (quote) header. Same monetary shape as an invoice; `converted`
/// is terminal and guarded against re-conversion.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "proformas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub number: String,
    pub client_id: i64,
    pub created_by: i64,
    pub status: ProformaStatus,
    pub date: NaiveDate,
    pub validity_date: Option<NaiveDate>,
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
    #[sea_orm(has_many = "super::proforma_item::Entity")]
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

impl Related<super::proforma_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::ProformaStatus::*;

    #[test]
    fn quote_workflow_transitions() {
        assert!(Draft.can_transition_to(Sent));
        assert!(Sent.can_transition_to(Accepted));
        assert!(Sent.can_transition_to(Rejected));

        assert!(!Draft.can_transition_to(Accepted));
        assert!(!Accepted.can_transition_to(Rejected));
        assert!(!Converted.can_transition_to(Sent));
    }
}
