use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::entities::{delivery_note_item, invoice_item, product, proforma_item};
use crate::errors::ServiceError;
use crate::services::totals;
use crate::services::{Page, Pagination};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub tax_rate: Decimal,
}

/// Full-replacement update payload (PUT semantics).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProductInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub tax_rate: Decimal,
}

/// Product catalog CRUD. Prices must be non-negative and tax rates must
/// sit on the configured allow-list. Deletion is refused while any line
/// item references the product.
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DbPool>,
    config: AppConfig,
}

impl ProductService {
    pub fn new(db: Arc<DbPool>, config: AppConfig) -> Self {
        Self { db, config }
    }

    fn check_pricing(&self, unit_price: Decimal, tax_rate: Decimal) -> Result<(), ServiceError> {
        if unit_price < Decimal::ZERO {
            return Err(ServiceError::Validation(
                "Unit price must not be negative".to_string(),
            ));
        }
        if !totals::amount_in_bounds(unit_price) {
            return Err(ServiceError::Validation(
                "Unit price exceeds the accepted maximum".to_string(),
            ));
        }
        if !self.config.tax_rate_allowed(tax_rate) {
            return Err(ServiceError::Validation(format!(
                "Tax rate {tax_rate}% is not an accepted rate"
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateProductInput) -> Result<product::Model, ServiceError> {
        input.validate()?;
        self.check_pricing(input.unit_price, input.tax_rate)?;

        let now = Utc::now();
        let created = product::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            unit_price: Set(input.unit_price),
            tax_rate: Set(input.tax_rate),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(product_id = created.id, "product created");
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<product::Model, ServiceError> {
        product::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {id} not found")))
    }

    /// List products, optionally filtered by a name search.
    pub async fn list(
        &self,
        search: Option<&str>,
        page: Pagination,
    ) -> Result<Page<product::Model>, ServiceError> {
        let mut query = product::Entity::find().order_by_asc(product::Column::Name);
        if let Some(needle) = search.filter(|s| !s.is_empty()) {
            query = query.filter(product::Column::Name.contains(needle));
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
        input: UpdateProductInput,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;
        self.check_pricing(input.unit_price, input.tax_rate)?;

        let existing = self.get(id).await?;
        let mut active: product::ActiveModel = existing.into();

        active.name = Set(input.name);
        active.description = Set(input.description);
        active.unit_price = Set(input.unit_price);
        active.tax_rate = Set(input.tax_rate);
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }

    /// Delete a product. Refused with a conflict while any document line
    /// still references it; historical lines keep their copied price data.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;

        let invoice_lines = invoice_item::Entity::find()
            .filter(invoice_item::Column::ProductId.eq(id))
            .count(&*self.db)
            .await?;
        let proforma_lines = proforma_item::Entity::find()
            .filter(proforma_item::Column::ProductId.eq(id))
            .count(&*self.db)
            .await?;
        let delivery_lines = delivery_note_item::Entity::find()
            .filter(delivery_note_item::Column::ProductId.eq(id))
            .count(&*self.db)
            .await?;

        let references = invoice_lines + proforma_lines + delivery_lines;
        if references > 0 {
            return Err(ServiceError::Conflict(format!(
                "Product {} is referenced by {} document line(s) and cannot be deleted",
                existing.name, references
            )));
        }

        product::Entity::delete_by_id(id).exec(&*self.db).await?;
        info!(product_id = id, "product deleted");
        Ok(())
    }
}
