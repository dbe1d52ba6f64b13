//! Account management: admin CRUD plus self-service password change.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::auth::password;
use crate::db::DbPool;
use crate::entities::user::{self, UserRole};
use crate::entities::{delivery_note, invoice, proforma};
use crate::errors::ServiceError;
use crate::services::{Page, Pagination};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(email)]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(email)]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordInput {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordInput {
    pub new_password: String,
}

#[derive(Clone)]
pub struct UserService {
    db: Arc<DbPool>,
}

impl UserService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn create(&self, input: CreateUserInput) -> Result<user::Model, ServiceError> {
        input.validate()?;

        let taken = user::Entity::find()
            .filter(user::Column::Username.eq(input.username.as_str()))
            .one(&*self.db)
            .await?;
        if taken.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Username {} is already taken",
                input.username
            )));
        }

        let now = Utc::now();
        let created = user::ActiveModel {
            username: Set(input.username),
            email: Set(input.email),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            phone: Set(input.phone),
            role: Set(input.role),
            password_hash: Set(password::hash_password(&input.password)?),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(user_id = created.id, "user created");
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<user::Model, ServiceError> {
        user::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {id} not found")))
    }

    pub async fn list(&self, page: Pagination) -> Result<Page<user::Model>, ServiceError> {
        let paginator = user::Entity::find()
            .order_by_asc(user::Column::Username)
            .paginate(&*self.db, page.per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.zero_based()).await?;

        Ok(Page::new(items, total, page))
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i64,
        input: UpdateUserInput,
    ) -> Result<user::Model, ServiceError> {
        input.validate()?;

        let existing = self.get(id).await?;
        let mut active: user::ActiveModel = existing.into();

        if input.email.is_some() {
            active.email = Set(input.email);
        }
        if input.first_name.is_some() {
            active.first_name = Set(input.first_name);
        }
        if input.last_name.is_some() {
            active.last_name = Set(input.last_name);
        }
        if input.phone.is_some() {
            active.phone = Set(input.phone);
        }
        if let Some(role) = input.role {
            active.role = Set(role);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }

    /// Delete an account. Refused while any document records the account
    /// as its creator; deactivate instead to lock someone out.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;

        let invoices = invoice::Entity::find()
            .filter(invoice::Column::CreatedBy.eq(id))
            .count(&*self.db)
            .await?;
        let proformas = proforma::Entity::find()
            .filter(proforma::Column::CreatedBy.eq(id))
            .count(&*self.db)
            .await?;
        let deliveries = delivery_note::Entity::find()
            .filter(delivery_note::Column::CreatedBy.eq(id))
            .count(&*self.db)
            .await?;

        let references = invoices + proformas + deliveries;
        if references > 0 {
            return Err(ServiceError::Conflict(format!(
                "User {} created {} document(s) and cannot be deleted; deactivate the account instead",
                existing.username, references
            )));
        }

        user::Entity::delete_by_id(id).exec(&*self.db).await?;
        info!(user_id = id, "user deleted");
        Ok(())
    }

    /// Self-service password change: the old password must verify and the
    /// new one must meet the minimum length. Nothing changes otherwise.
    #[instrument(skip(self, input))]
    pub async fn change_password(
        &self,
        id: i64,
        input: ChangePasswordInput,
    ) -> Result<(), ServiceError> {
        let account = self.get(id).await?;

        if !password::verify_password(&input.old_password, &account.password_hash) {
            return Err(ServiceError::Conflict(
                "Current password is incorrect".to_string(),
            ));
        }
        Self::check_password_strength(&input.new_password)?;

        let mut active: user::ActiveModel = account.into();
        active.password_hash = Set(password::hash_password(&input.new_password)?);
        active.updated_at = Set(Utc::now());
        active.update(&*self.db).await?;

        info!(user_id = id, "password changed");
        Ok(())
    }

    /// Administrative reset: no old-password check.
    #[instrument(skip(self, input))]
    pub async fn reset_password(
        &self,
        id: i64,
        input: ResetPasswordInput,
    ) -> Result<(), ServiceError> {
        let account = self.get(id).await?;
        Self::check_password_strength(&input.new_password)?;

        let mut active: user::ActiveModel = account.into();
        active.password_hash = Set(password::hash_password(&input.new_password)?);
        active.updated_at = Set(Utc::now());
        active.update(&*self.db).await?;

        info!(user_id = id, "password reset");
        Ok(())
    }

    fn check_password_strength(candidate: &str) -> Result<(), ServiceError> {
        if candidate.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServiceError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }

    /// Create the first admin account when the user table is empty.
    /// Called at startup with the configured bootstrap credentials.
    pub async fn bootstrap_admin(
        &self,
        username: &str,
        password_plain: &str,
    ) -> Result<Option<user::Model>, ServiceError> {
        let existing = user::Entity::find().count(&*self.db).await?;
        if existing > 0 {
            return Ok(None);
        }

        let created = self
            .create(CreateUserInput {
                username: username.to_string(),
                password: password_plain.to_string(),
                email: None,
                first_name: None,
                last_name: None,
                phone: None,
                role: UserRole::Admin,
            })
            .await?;

        info!(username = %created.username, "bootstrap admin account created");
        Ok(Some(created))
    }
}
