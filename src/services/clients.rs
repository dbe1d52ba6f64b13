use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{client, delivery_note, invoice, proforma};
use crate::errors::ServiceError;
use crate::services::{Page, Pagination};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClientInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,
}

/// Full-replacement update payload (PUT semantics): omitted optional
/// fields clear the stored value.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateClientInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,
}

/// Customer directory CRUD. Deletion is refused while any document still
/// references the client, keeping document history intact.
#[derive(Clone)]
pub struct ClientService {
    db: Arc<DbPool>,
}

impl ClientService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateClientInput) -> Result<client::Model, ServiceError> {
        input.validate()?;

        let now = Utc::now();
        let created = client::ActiveModel {
            name: Set(input.name),
            phone: Set(input.phone),
            email: Set(input.email),
            address: Set(input.address),
            tax_id: Set(input.tax_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(client_id = created.id, "client created");
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<client::Model, ServiceError> {
        client::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Client {id} not found")))
    }

    /// List clients, optionally filtered by a case-insensitive name search.
    pub async fn list(
        &self,
        search: Option<&str>,
        page: Pagination,
    ) -> Result<Page<client::Model>, ServiceError> {
        let mut query = client::Entity::find().order_by_asc(client::Column::Name);
        if let Some(needle) = search.filter(|s| !s.is_empty()) {
            query = query.filter(client::Column::Name.contains(needle));
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
        input: UpdateClientInput,
    ) -> Result<client::Model, ServiceError> {
        input.validate()?;

        let existing = self.get(id).await?;
        let mut active: client::ActiveModel = existing.into();

        active.name = Set(input.name);
        active.phone = Set(input.phone);
        active.email = Set(input.email);
        active.address = Set(input.address);
        active.tax_id = Set(input.tax_id);
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }

    /// Delete a client. Refused with a conflict while any invoice, proforma
    /// or delivery note references it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;

        let invoice_count = invoice::Entity::find()
            .filter(invoice::Column::ClientId.eq(id))
            .count(&*self.db)
            .await?;
        let proforma_count = proforma::Entity::find()
            .filter(proforma::Column::ClientId.eq(id))
            .count(&*self.db)
            .await?;
        let delivery_count = delivery_note::Entity::find()
            .filter(delivery_note::Column::ClientId.eq(id))
            .count(&*self.db)
            .await?;

        let references = invoice_count + proforma_count + delivery_count;
        if references > 0 {
            return Err(ServiceError::Conflict(format!(
                "Client {} is referenced by {} document(s) and cannot be deleted",
                existing.name, references
            )));
        }

        client::Entity::delete_by_id(id).exec(&*self.db).await?;
        info!(client_id = id, "client deleted");
        Ok(())
    }
}
