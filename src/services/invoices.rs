//! Invoice lifecycle: creation with number assignment, wholesale item
//! replacement, status transitions and the monthly dashboard.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::entities::invoice::InvoiceStatus;
use crate::entities::{client, invoice, invoice_item, product};
use crate::errors::ServiceError;
use crate::services::clock::Clock;
use crate::services::numbering::{self, DocumentKind};
use crate::services::totals::{self, LineTotals};
use crate::services::{Page, Pagination};

/// Creation retries on a duplicate number before giving up. Two clients
/// racing for the same sequence slot is resolved on the first retry; more
/// than this many collisions means something else is wrong.
const NUMBER_ASSIGN_ATTEMPTS: u32 = 3;

/// One requested line. When `product_id` is set, description, unit price
/// and tax rate default to the catalog values; explicit values win. Item
/// rules (positive quantity, allow-listed tax rate, non-negative price)
/// are enforced by [`resolve_items`].
#[derive(Debug, Clone, Deserialize)]
pub struct ItemInput {
    pub product_id: Option<i64>,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceInput {
    pub client_id: i64,
    /// Pre-assigned number (imports); assigned from the sequence if absent.
    pub number: Option<String>,
    pub date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub items: Vec<ItemInput>,
}

/// Full-replacement header update; `items`, when present, replaces every
/// existing line.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInvoiceInput {
    pub client_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub items: Option<Vec<ItemInput>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceFilter {
    pub client: Option<i64>,
    pub status: Option<InvoiceStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Invoice with its client and lines eagerly loaded.
#[derive(Debug, Serialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: invoice::Model,
    pub client: client::Model,
    pub items: Vec<invoice_item::Model>,
}

/// Current-month read side.
#[derive(Debug, Serialize)]
pub struct InvoiceDashboard {
    pub month: String,
    pub invoice_count: u64,
    pub total_amount: Decimal,
    pub paid_count: u64,
    pub paid_amount: Decimal,
    pub pending_count: u64,
}

/// A line with its pricing resolved against the catalog and its totals
/// computed. Shared with the proforma engine.
#[derive(Debug, Clone)]
pub struct ResolvedItem {
    pub product_id: Option<i64>,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub tax_rate: Decimal,
    pub totals: LineTotals,
}

/// Resolve requested lines against the catalog and validate pricing.
pub async fn resolve_items<C: ConnectionTrait>(
    conn: &C,
    config: &AppConfig,
    items: &[ItemInput],
) -> Result<Vec<ResolvedItem>, ServiceError> {
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

        let unit_price = item
            .unit_price
            .or_else(|| catalog.as_ref().map(|p| p.unit_price))
            .ok_or_else(|| {
                ServiceError::Validation(format!(
                    "Item {position}: unit price is required without a product"
                ))
            })?;
        if unit_price < Decimal::ZERO {
            return Err(ServiceError::Validation(format!(
                "Item {position}: unit price must not be negative"
            )));
        }
        if !totals::amount_in_bounds(unit_price) {
            return Err(ServiceError::Validation(format!(
                "Item {position}: unit price exceeds the accepted maximum"
            )));
        }

        let tax_rate = item
            .tax_rate
            .or_else(|| catalog.as_ref().map(|p| p.tax_rate))
            .unwrap_or(Decimal::ZERO);
        if !config.tax_rate_allowed(tax_rate) {
            return Err(ServiceError::Validation(format!(
                "Item {position}: tax rate {tax_rate}% is not an accepted rate"
            )));
        }

        let line = totals::line_totals(item.quantity, unit_price, tax_rate);
        resolved.push(ResolvedItem {
            product_id: item.product_id,
            description,
            quantity: item.quantity,
            unit_price,
            tax_rate,
            totals: line,
        });
    }

    Ok(resolved)
}

/// First and one-past-last day of the month containing `today`.
pub fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today.with_day(1).unwrap_or(today);
    let end = if start.month() == 12 {
        NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
    }
    .unwrap_or(start);
    (start, end)
}

#[derive(Clone)]
pub struct InvoiceService {
    db: Arc<DbPool>,
    config: AppConfig,
    clock: Arc<dyn Clock>,
}

impl InvoiceService {
    pub fn new(db: Arc<DbPool>, config: AppConfig, clock: Arc<dyn Clock>) -> Self {
        Self { db, config, clock }
    }

    /// Create an invoice with its lines in one transaction. Number
    /// assignment retries on a duplicate-number conflict.
    #[instrument(skip(self, input), fields(client_id = input.client_id))]
    pub async fn create(
        &self,
        created_by: i64,
        input: CreateInvoiceInput,
    ) -> Result<InvoiceDetail, ServiceError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_create(created_by, &input).await {
                Err(err)
                    if err.is_unique_violation()
                        && input.number.is_none()
                        && attempt < NUMBER_ASSIGN_ATTEMPTS =>
                {
                    warn!(attempt, "invoice number collision, retrying");
                }
                Err(err) if err.is_unique_violation() => {
                    return Err(ServiceError::Conflict(
                        "Could not assign a unique invoice number".to_string(),
                    ));
                }
                other => return other,
            }
        }
    }

    async fn try_create(
        &self,
        created_by: i64,
        input: &CreateInvoiceInput,
    ) -> Result<InvoiceDetail, ServiceError> {
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
            None => numbering::next_number(&txn, DocumentKind::Invoice, date.year()).await?,
        };

        let resolved = resolve_items(&txn, &self.config, &input.items).await?;
        let document = totals::sum_lines(resolved.iter().map(|r| r.totals));

        let now = Utc::now();
        let header = invoice::ActiveModel {
            number: Set(number),
            client_id: Set(client.id),
            created_by: Set(created_by),
            status: Set(InvoiceStatus::Draft),
            date: Set(date),
            due_date: Set(input.due_date),
            notes: Set(input.notes.clone()),
            total_before_tax: Set(document.before_tax),
            total_tax: Set(document.tax),
            total_with_tax: Set(document.with_tax),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(resolved.len());
        for line in resolved {
            items.push(
                invoice_item::ActiveModel {
                    invoice_id: Set(header.id),
                    product_id: Set(line.product_id),
                    description: Set(line.description),
                    quantity: Set(line.quantity),
                    unit_price: Set(line.unit_price),
                    tax_rate: Set(line.tax_rate),
                    total_before_tax: Set(line.totals.before_tax),
                    total_tax: Set(line.totals.tax),
                    total_with_tax: Set(line.totals.with_tax),
                    ..Default::default()
                }
                .insert(&txn)
                .await?,
            );
        }

        txn.commit().await?;
        info!(invoice_id = header.id, number = %header.number, "invoice created");

        Ok(InvoiceDetail {
            invoice: header,
            client,
            items,
        })
    }

    pub async fn get(&self, id: i64) -> Result<InvoiceDetail, ServiceError> {
        let header = self.find_header(id).await?;
        self.load_detail(header).await
    }

    async fn find_header(&self, id: i64) -> Result<invoice::Model, ServiceError> {
        invoice::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Invoice {id} not found")))
    }

    async fn load_detail(&self, header: invoice::Model) -> Result<InvoiceDetail, ServiceError> {
        let client = header
            .find_related(client::Entity)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::Internal("Invoice has no client row".to_string()))?;
        let items = header
            .find_related(invoice_item::Entity)
            .order_by_asc(invoice_item::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(InvoiceDetail {
            invoice: header,
            client,
            items,
        })
    }

    /// List invoices newest first with optional client/status/date filters.
    pub async fn list(
        &self,
        filter: InvoiceFilter,
        page: Pagination,
    ) -> Result<Page<invoice::Model>, ServiceError> {
        let mut query = invoice::Entity::find()
            .order_by_desc(invoice::Column::Date)
            .order_by_desc(invoice::Column::Id);

        if let Some(client_id) = filter.client {
            query = query.filter(invoice::Column::ClientId.eq(client_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(invoice::Column::Status.eq(status));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(invoice::Column::Date.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(invoice::Column::Date.lte(end));
        }

        let paginator = query.paginate(&*self.db, page.per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.zero_based()).await?;

        Ok(Page::new(items, total, page))
    }

    /// Update header fields; an items list replaces every existing line
    /// and the cached totals are recomputed, all in one transaction.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i64,
        input: UpdateInvoiceInput,
    ) -> Result<InvoiceDetail, ServiceError> {
        let txn = self.db.begin().await?;

        let header = invoice::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Invoice {id} not found")))?;

        if let Some(client_id) = input.client_id {
            client::Entity::find_by_id(client_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::Validation(format!("Client {client_id} does not exist"))
                })?;
        }

        let mut active: invoice::ActiveModel = header.into();
        if let Some(client_id) = input.client_id {
            active.client_id = Set(client_id);
        }
        if let Some(date) = input.date {
            active.date = Set(date);
        }
        if input.due_date.is_some() {
            active.due_date = Set(input.due_date);
        }
        if input.notes.is_some() {
            active.notes = Set(input.notes.clone());
        }

        if let Some(items) = &input.items {
            let resolved = resolve_items(&txn, &self.config, items).await?;
            let document = totals::sum_lines(resolved.iter().map(|r| r.totals));

            invoice_item::Entity::delete_many()
                .filter(invoice_item::Column::InvoiceId.eq(id))
                .exec(&txn)
                .await?;
            for line in resolved {
                invoice_item::ActiveModel {
                    invoice_id: Set(id),
                    product_id: Set(line.product_id),
                    description: Set(line.description),
                    quantity: Set(line.quantity),
                    unit_price: Set(line.unit_price),
                    tax_rate: Set(line.tax_rate),
                    total_before_tax: Set(line.totals.before_tax),
                    total_tax: Set(line.totals.tax),
                    total_with_tax: Set(line.totals.with_tax),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }

            active.total_before_tax = Set(document.before_tax);
            active.total_tax = Set(document.tax);
            active.total_with_tax = Set(document.with_tax);
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
        invoice_item::Entity::delete_many()
            .filter(invoice_item::Column::InvoiceId.eq(id))
            .exec(&txn)
            .await?;
        invoice::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(invoice_id = id, number = %header.number, "invoice deleted");
        Ok(())
    }

    pub async fn finalize(&self, id: i64) -> Result<invoice::Model, ServiceError> {
        self.transition(id, InvoiceStatus::Finalized).await
    }

    pub async fn mark_paid(&self, id: i64) -> Result<invoice::Model, ServiceError> {
        self.transition(id, InvoiceStatus::Paid).await
    }

    pub async fn cancel(&self, id: i64) -> Result<invoice::Model, ServiceError> {
        self.transition(id, InvoiceStatus::Cancelled).await
    }

    /// Apply one transition from the table; anything else conflicts and
    /// mutates nothing.
    #[instrument(skip(self))]
    async fn transition(
        &self,
        id: i64,
        target: InvoiceStatus,
    ) -> Result<invoice::Model, ServiceError> {
        let header = self.find_header(id).await?;

        if !header.status.can_transition_to(target) {
            return Err(ServiceError::Conflict(format!(
                "Invoice {} cannot move from {} to {}",
                header.number,
                header.status.as_str(),
                target.as_str()
            )));
        }

        let number = header.number.clone();
        let mut active: invoice::ActiveModel = header.into();
        active.status = Set(target);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&*self.db).await?;

        info!(invoice_id = id, number = %number, status = target.as_str(), "invoice status changed");
        Ok(updated)
    }

    /// Current-month figures for the dashboard.
    pub async fn dashboard(&self) -> Result<InvoiceDashboard, ServiceError> {
        let today = self.clock.today();
        let (start, end) = month_bounds(today);

        let monthly = invoice::Entity::find()
            .filter(invoice::Column::Date.gte(start))
            .filter(invoice::Column::Date.lt(end))
            .all(&*self.db)
            .await?;

        let mut total_amount = Decimal::ZERO;
        let mut paid_count = 0u64;
        let mut paid_amount = Decimal::ZERO;
        let mut pending_count = 0u64;
        for inv in &monthly {
            total_amount += inv.total_with_tax;
            match inv.status {
                InvoiceStatus::Paid => {
                    paid_count += 1;
                    paid_amount += inv.total_with_tax;
                }
                status if status.is_pending() => pending_count += 1,
                _ => {}
            }
        }

        Ok(InvoiceDashboard {
            month: format!("{:04}-{:02}", today.year(), today.month()),
            invoice_count: monthly.len() as u64,
            total_amount,
            paid_count,
            paid_amount,
            pending_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_cover_the_calendar_month() {
        let (start, end) = month_bounds(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
    }

    #[test]
    fn month_bounds_roll_over_december() {
        let (start, end) = month_bounds(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }
}
