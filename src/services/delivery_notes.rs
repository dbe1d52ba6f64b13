//! Delivery notes: the goods-movement document. Same engine as the other
//! documents minus money, plus a payment-method tag.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::db::DbPool;
use crate::entities::delivery_note::PaymentMethod;
use crate::entities::{client, delivery_note, delivery_note_item, product};
use crate::errors::ServiceError;
use crate::services::clock::Clock;
use crate::services::numbering::{self, DocumentKind};
use crate::services::totals;
use crate::services::{Page, Pagination};

const NUMBER_ASSIGN_ATTEMPTS: u32 = 3;

/// One requested line: quantity and description, no prices. Description
/// defaults to the referenced product's name; item rules are enforced by
/// the resolver.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryItemInput {
    pub product_id: Option<i64>,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub observation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDeliveryNoteInput {
    pub client_id: i64,
    /// Pre-assigned number (imports); assigned from the sequence if absent.
    pub number: Option<String>,
    pub date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    pub delivered_by: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<DeliveryItemInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDeliveryNoteInput {
    pub client_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    pub delivered_by: Option<String>,
    pub notes: Option<String>,
    pub items: Option<Vec<DeliveryItemInput>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeliveryNoteFilter {
    pub client: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct DeliveryNoteDetail {
    #[serde(flatten)]
    pub delivery_note: delivery_note::Model,
    pub client: client::Model,
    pub items: Vec<delivery_note_item::Model>,
}

#[derive(Debug, Clone)]
struct ResolvedDeliveryItem {
    product_id: Option<i64>,
    description: String,
    quantity: Decimal,
    observation: Option<String>,
}

async fn resolve_delivery_items<C: ConnectionTrait>(
    conn: &C,
    items: &[DeliveryItemInput],
) -> Result<Vec<ResolvedDeliveryItem>, ServiceError> {
    let mut resolved = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let position = index + 1;
        if item.quantity <= Decimal::ZERO {
            return Err(ServiceError::Validation(format!(
                "Item {position}: quantity must be positive"
            )));
        }
        if !totals::amount_in_bounds(item.quantity) {
            return Err(ServiceError::Validation(format!(
                "Item {position}: quantity exceeds the accepted maximum"
            )));
        }

        let catalog = match item.product_id {
            Some(product_id) => Some(
                product::Entity::find_by_id(product_id)
                    .one(conn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::Validation(format!(
                            "Item {position}: product {product_id} does not exist"
                        ))
                    })?,
            ),
            None => None,
        };

        let description = item
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .or_else(|| catalog.as_ref().map(|p| p.name.clone()))
            .ok_or_else(|| {
                ServiceError::Validation(format!(
                    "Item {position}: description is required without a product"
                ))
            })?;

        resolved.push(ResolvedDeliveryItem {
            product_id: item.product_id,
            description,
            quantity: item.quantity,
            observation: item.observation.clone(),
        });
    }

    Ok(resolved)
}

#[derive(Clone)]
pub struct DeliveryNoteService {
    db: Arc<DbPool>,
    clock: Arc<dyn Clock>,
}

impl DeliveryNoteService {
    pub fn new(db: Arc<DbPool>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    #[instrument(skip(self, input), fields(client_id = input.client_id))]
    pub async fn create(
        &self,
        created_by: i64,
        input: CreateDeliveryNoteInput,
    ) -> Result<DeliveryNoteDetail, ServiceError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_create(created_by, &input).await {
                Err(err)
                    if err.is_unique_violation()
                        && input.number.is_none()
                        && attempt < NUMBER_ASSIGN_ATTEMPTS =>
                {
                    warn!(attempt, "delivery note number collision, retrying");
                }
                Err(err) if err.is_unique_violation() => {
                    return Err(ServiceError::Conflict(
                        "Could not assign a unique delivery note number".to_string(),
                    ));
                }
                other => return other,
            }
        }
    }

    async fn try_create(
        &self,
        created_by: i64,
        input: &CreateDeliveryNoteInput,
    ) -> Result<DeliveryNoteDetail, ServiceError> {
        let txn = self.db.begin().await?;

        let client = client::Entity::find_by_id(input.client_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::Validation(format!("Client {} does not exist", input.client_id))
            })?;

        let date = input.date.unwrap_or_else(|| self.clock.today());
        let number = match &input.number {
            Some(number) => number.clone(),
            None => numbering::next_number(&txn, DocumentKind::DeliveryNote, date.year()).await?,
        };

        let resolved = resolve_delivery_items(&txn, &input.items).await?;

        let now = Utc::now();
        let header = delivery_note::ActiveModel {
            number: Set(number),
            client_id: Set(client.id),
            created_by: Set(created_by),
            date: Set(date),
            payment_method: Set(input.payment_method),
            delivered_by: Set(input.delivered_by.clone()),
            notes: Set(input.notes.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(resolved.len());
        for line in resolved {
            items.push(
                delivery_note_item::ActiveModel {
                    delivery_note_id: Set(header.id),
                    product_id: Set(line.product_id),
                    description: Set(line.description),
                    quantity: Set(line.quantity),
                    observation: Set(line.observation),
                    ..Default::default()
                }
                .insert(&txn)
                .await?,
            );
        }

        txn.commit().await?;
        info!(delivery_note_id = header.id, number = %header.number, "delivery note created");

        Ok(DeliveryNoteDetail {
            delivery_note: header,
            client,
            items,
        })
    }

    pub async fn get(&self, id: i64) -> Result<DeliveryNoteDetail, ServiceError> {
        let header = self.find_header(id).await?;
        self.load_detail(header).await
    }

    async fn find_header(&self, id: i64) -> Result<delivery_note::Model, ServiceError> {
        delivery_note::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Delivery note {id} not found")))
    }

    async fn load_detail(
        &self,
        header: delivery_note::Model,
    ) -> Result<DeliveryNoteDetail, ServiceError> {
        let client = header
            .find_related(client::Entity)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::Internal("Delivery note has no client row".to_string()))?;
        let items = header
            .find_related(delivery_note_item::Entity)
            .order_by_asc(delivery_note_item::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(DeliveryNoteDetail {
            delivery_note: header,
            client,
            items,
        })
    }

    pub async fn list(
        &self,
        filter: DeliveryNoteFilter,
        page: Pagination,
    ) -> Result<Page<delivery_note::Model>, ServiceError> {
        let mut query = delivery_note::Entity::find()
            .order_by_desc(delivery_note::Column::Date)
            .order_by_desc(delivery_note::Column::Id);

        if let Some(client_id) = filter.client {
            query = query.filter(delivery_note::Column::ClientId.eq(client_id));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(delivery_note::Column::Date.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(delivery_note::Column::Date.lte(end));
        }

        let paginator = query.paginate(&*self.db, page.per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.zero_based()).await?;

        Ok(Page::new(items, total, page))
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i64,
        input: UpdateDeliveryNoteInput,
    ) -> Result<DeliveryNoteDetail, ServiceError> {
        let txn = self.db.begin().await?;

        let header = delivery_note::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Delivery note {id} not found")))?;

        if let Some(client_id) = input.client_id {
            client::Entity::find_by_id(client_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::Validation(format!("Client {client_id} does not exist"))
                })?;
        }

        let mut active: delivery_note::ActiveModel = header.into();
        if let Some(client_id) = input.client_id {
            active.client_id = Set(client_id);
        }
        if let Some(date) = input.date {
            active.date = Set(date);
        }
        if input.payment_method.is_some() {
            active.payment_method = Set(input.payment_method);
        }
        if input.delivered_by.is_some() {
            active.delivered_by = Set(input.delivered_by.clone());
        }
        if input.notes.is_some() {
            active.notes = Set(input.notes.clone());
        }

        if let Some(items) = &input.items {
            let resolved = resolve_delivery_items(&txn, items).await?;

            delivery_note_item::Entity::delete_many()
                .filter(delivery_note_item::Column::DeliveryNoteId.eq(id))
                .exec(&txn)
                .await?;
            for line in resolved {
                delivery_note_item::ActiveModel {
                    delivery_note_id: Set(id),
                    product_id: Set(line.product_id),
                    description: Set(line.description),
                    quantity: Set(line.quantity),
                    observation: Set(line.observation),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }
        }

        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        self.load_detail(updated).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let header = self.find_header(id).await?;

        let txn = self.db.begin().await?;
        delivery_note_item::Entity::delete_many()
            .filter(delivery_note_item::Column::DeliveryNoteId.eq(id))
            .exec(&txn)
            .await?;
        delivery_note::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(delivery_note_id = id, number = %header.number, "delivery note deleted");
        Ok(())
    }
}
