//! Proforma (quote) lifecycle: the same document engine as invoices plus
//! the sent/accepted/rejected workflow and one-shot conversion into an
//! invoice.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::entities::invoice::InvoiceStatus;
use crate::entities::proforma::ProformaStatus;
use crate::entities::{client, invoice, invoice_item, proforma, proforma_item};
use crate::errors::ServiceError;
use crate::services::clock::Clock;
use crate::services::invoices::{month_bounds, resolve_items, InvoiceDetail, ItemInput};
use crate::services::numbering::{self, DocumentKind};
use crate::services::totals;
use crate::services::{Page, Pagination};

const NUMBER_ASSIGN_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProformaInput {
    pub client_id: i64,
    /// Pre-assigned number (imports); assigned from the sequence if absent.
    pub number: Option<String>,
    pub date: Option<NaiveDate>,
    pub validity_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub items: Vec<ItemInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProformaInput {
    pub client_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub validity_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub items: Option<Vec<ItemInput>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProformaFilter {
    pub client: Option<i64>,
    pub status: Option<ProformaStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct ProformaDetail {
    #[serde(flatten)]
    pub proforma: proforma::Model,
    pub client: client::Model,
    pub items: Vec<proforma_item::Model>,
}

/// Current-month quote figures.
#[derive(Debug, Serialize)]
pub struct ProformaStats {
    pub month: String,
    pub proforma_count: u64,
    pub total_amount: Decimal,
    pub accepted_count: u64,
    pub pending_count: u64,
    pub converted_count: u64,
}

#[derive(Clone)]
pub struct ProformaService {
    db: Arc<DbPool>,
    config: AppConfig,
    clock: Arc<dyn Clock>,
}

impl ProformaService {
    pub fn new(db: Arc<DbPool>, config: AppConfig, clock: Arc<dyn Clock>) -> Self {
        Self { db, config, clock }
    }

    #[instrument(skip(self, input), fields(client_id = input.client_id))]
    pub async fn create(
        &self,
        created_by: i64,
        input: CreateProformaInput,
    ) -> Result<ProformaDetail, ServiceError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_create(created_by, &input).await {
                Err(err)
                    if err.is_unique_violation()
                        && input.number.is_none()
                        && attempt < NUMBER_ASSIGN_ATTEMPTS =>
                {
                    warn!(attempt, "proforma number collision, retrying");
                }
                Err(err) if err.is_unique_violation() => {
                    return Err(ServiceError::Conflict(
                        "Could not assign a unique proforma number".to_string(),
                    ));
                }
                other => return other,
            }
        }
    }

    async fn try_create(
        &self,
        created_by: i64,
        input: &CreateProformaInput,
    ) -> Result<ProformaDetail, ServiceError> {
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
            None => numbering::next_number(&txn, DocumentKind::Proforma, date.year()).await?,
        };

        let resolved = resolve_items(&txn, &self.config, &input.items).await?;
        let document = totals::sum_lines(resolved.iter().map(|r| r.totals));

        let now = Utc::now();
        let header = proforma::ActiveModel {
            number: Set(number),
            client_id: Set(client.id),
            created_by: Set(created_by),
            status: Set(ProformaStatus::Draft),
            date: Set(date),
            validity_date: Set(input.validity_date),
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
                proforma_item::ActiveModel {
                    proforma_id: Set(header.id),
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
        info!(proforma_id = header.id, number = %header.number, "proforma created");

        Ok(ProformaDetail {
            proforma: header,
            client,
            items,
        })
    }

    pub async fn get(&self, id: i64) -> Result<ProformaDetail, ServiceError> {
        let header = self.find_header(id).await?;
        self.load_detail(header).await
    }

    async fn find_header(&self, id: i64) -> Result<proforma::Model, ServiceError> {
        proforma::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Proforma {id} not found")))
    }

    async fn load_detail(&self, header: proforma::Model) -> Result<ProformaDetail, ServiceError> {
        let client = header
            .find_related(client::Entity)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::Internal("Proforma has no client row".to_string()))?;
        let items = header
            .find_related(proforma_item::Entity)
            .order_by_asc(proforma_item::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(ProformaDetail {
            proforma: header,
            client,
            items,
        })
    }

    pub async fn list(
        &self,
        filter: ProformaFilter,
        page: Pagination,
    ) -> Result<Page<proforma::Model>, ServiceError> {
        let mut query = proforma::Entity::find()
            .order_by_desc(proforma::Column::Date)
            .order_by_desc(proforma::Column::Id);

        if let Some(client_id) = filter.client {
            query = query.filter(proforma::Column::ClientId.eq(client_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(proforma::Column::Status.eq(status));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(proforma::Column::Date.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(proforma::Column::Date.lte(end));
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
        input: UpdateProformaInput,
    ) -> Result<ProformaDetail, ServiceError> {
        let txn = self.db.begin().await?;

        let header = proforma::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Proforma {id} not found")))?;

        if let Some(client_id) = input.client_id {
            client::Entity::find_by_id(client_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::Validation(format!("Client {client_id} does not exist"))
                })?;
        }

        let mut active: proforma::ActiveModel = header.into();
        if let Some(client_id) = input.client_id {
            active.client_id = Set(client_id);
        }
        if let Some(date) = input.date {
            active.date = Set(date);
        }
        if input.validity_date.is_some() {
            active.validity_date = Set(input.validity_date);
        }
        if input.notes.is_some() {
            active.notes = Set(input.notes.clone());
        }

        if let Some(items) = &input.items {
            let resolved = resolve_items(&txn, &self.config, items).await?;
            let document = totals::sum_lines(resolved.iter().map(|r| r.totals));

            proforma_item::Entity::delete_many()
                .filter(proforma_item::Column::ProformaId.eq(id))
                .exec(&txn)
                .await?;
            for line in resolved {
                proforma_item::ActiveModel {
                    proforma_id: Set(id),
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
        proforma_item::Entity::delete_many()
            .filter(proforma_item::Column::ProformaId.eq(id))
            .exec(&txn)
            .await?;
        proforma::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(proforma_id = id, number = %header.number, "proforma deleted");
        Ok(())
    }

    pub async fn mark_sent(&self, id: i64) -> Result<proforma::Model, ServiceError> {
        self.transition(id, ProformaStatus::Sent).await
    }

    pub async fn accept(&self, id: i64) -> Result<proforma::Model, ServiceError> {
        self.transition(id, ProformaStatus::Accepted).await
    }

    pub async fn reject(&self, id: i64) -> Result<proforma::Model, ServiceError> {
        self.transition(id, ProformaStatus::Rejected).await
    }

    #[instrument(skip(self))]
    async fn transition(
        &self,
        id: i64,
        target: ProformaStatus,
    ) -> Result<proforma::Model, ServiceError> {
        let header = self.find_header(id).await?;

        if !header.status.can_transition_to(target) {
            return Err(ServiceError::Conflict(format!(
                "Proforma {} cannot move from {} to {}",
                header.number,
                header.status.as_str(),
                target.as_str()
            )));
        }

        let number = header.number.clone();
        let mut active: proforma::ActiveModel = header.into();
        active.status = Set(target);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&*self.db).await?;

        info!(proforma_id = id, number = %number, status = target.as_str(), "proforma status changed");
        Ok(updated)
    }

    /// Convert a proforma into a draft invoice. The source flips to
    /// `converted` and a second attempt conflicts without creating
    /// anything; the whole operation is one transaction.
    #[instrument(skip(self))]
    pub async fn convert_to_invoice(
        &self,
        id: i64,
        created_by: i64,
    ) -> Result<InvoiceDetail, ServiceError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_convert(id, created_by).await {
                Err(err) if err.is_unique_violation() && attempt < NUMBER_ASSIGN_ATTEMPTS => {
                    warn!(attempt, "invoice number collision during conversion, retrying");
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

    async fn try_convert(&self, id: i64, created_by: i64) -> Result<InvoiceDetail, ServiceError> {
        let txn = self.db.begin().await?;

        let source = proforma::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Proforma {id} not found")))?;

        if source.status == ProformaStatus::Converted {
            return Err(ServiceError::Conflict(format!(
                "Proforma {} has already been converted",
                source.number
            )));
        }

        let client = client::Entity::find_by_id(source.client_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::Internal("Proforma has no client row".to_string()))?;

        let source_items = proforma_item::Entity::find()
            .filter(proforma_item::Column::ProformaId.eq(id))
            .order_by_asc(proforma_item::Column::Id)
            .all(&txn)
            .await?;

        let date = self.clock.today();
        let number = numbering::next_number(&txn, DocumentKind::Invoice, date.year()).await?;

        let notes = match &source.notes {
            Some(text) if !text.is_empty() => {
                format!("Converted from proforma {}\n{}", source.number, text)
            }
            _ => format!("Converted from proforma {}", source.number),
        };

        let now = Utc::now();
        let header = invoice::ActiveModel {
            number: Set(number),
            client_id: Set(source.client_id),
            created_by: Set(created_by),
            status: Set(InvoiceStatus::Draft),
            date: Set(date),
            due_date: Set(None),
            notes: Set(Some(notes)),
            total_before_tax: Set(source.total_before_tax),
            total_tax: Set(source.total_tax),
            total_with_tax: Set(source.total_with_tax),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(source_items.len());
        for line in &source_items {
            items.push(
                invoice_item::ActiveModel {
                    invoice_id: Set(header.id),
                    product_id: Set(line.product_id),
                    description: Set(line.description.clone()),
                    quantity: Set(line.quantity),
                    unit_price: Set(line.unit_price),
                    tax_rate: Set(line.tax_rate),
                    total_before_tax: Set(line.total_before_tax),
                    total_tax: Set(line.total_tax),
                    total_with_tax: Set(line.total_with_tax),
                    ..Default::default()
                }
                .insert(&txn)
                .await?,
            );
        }

        let source_number = source.number.clone();
        let mut source_active: proforma::ActiveModel = source.into();
        source_active.status = Set(ProformaStatus::Converted);
        source_active.updated_at = Set(now);
        source_active.update(&txn).await?;

        txn.commit().await?;
        info!(
            proforma_number = %source_number,
            invoice_number = %header.number,
            "proforma converted to invoice"
        );

        Ok(InvoiceDetail {
            invoice: header,
            client,
            items,
        })
    }

    /// Current-month figures for the quote pipeline.
    pub async fn stats(&self) -> Result<ProformaStats, ServiceError> {
        let today = self.clock.today();
        let (start, end) = month_bounds(today);

        let monthly = proforma::Entity::find()
            .filter(proforma::Column::Date.gte(start))
            .filter(proforma::Column::Date.lt(end))
            .all(&*self.db)
            .await?;

        let mut total_amount = Decimal::ZERO;
        let mut accepted_count = 0u64;
        let mut pending_count = 0u64;
        let mut converted_count = 0u64;
        for quote in &monthly {
            total_amount += quote.total_with_tax;
            match quote.status {
                ProformaStatus::Accepted => accepted_count += 1,
                ProformaStatus::Converted => converted_count += 1,
                status if status.is_pending() => pending_count += 1,
                _ => {}
            }
        }

        Ok(ProformaStats {
            month: format!("{:04}-{:02}", today.year(), today.month()),
            proforma_count: monthly.len() as u64,
            total_amount,
            accepted_count,
            pending_count,
            converted_count,
        })
    }
}
