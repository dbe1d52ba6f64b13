//! Token issuance and validation.
//!
//! Bearer-token authentication with an HS256 access/refresh pair. Handlers
//! obtain the calling user through the [`AuthenticatedUser`] extractor.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::user::{self, UserRole};
use crate::errors::ServiceError;

pub mod password;

const TOKEN_USE_ACCESS: &str = "access";
const TOKEN_USE_REFRESH: &str = "refresh";

/// Claim structure for issued tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    pub username: String,
    pub role: UserRole,
    /// "access" or "refresh"
    pub token_use: String,
    /// Unique identifier for this token
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Token pair returned by login and refresh.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Authentication configuration.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_expiration: std::time::Duration,
    pub refresh_token_expiration: std::time::Duration,
}

/// Issues and validates token pairs against the user table.
#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
    db: Arc<DbPool>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DbPool>) -> Self {
        Self { config, db }
    }

    /// Check credentials and issue a token pair.
    pub async fn login(&self, username: &str, pass: &str) -> Result<TokenPair, ServiceError> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await?;

        // Verify against a constant dummy hash when the user is unknown so
        // both paths cost one argon2 verification.
        let Some(account) = found else {
            let _ = password::verify_password(pass, DUMMY_HASH);
            return Err(ServiceError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        };

        if !password::verify_password(pass, &account.password_hash) {
            return Err(ServiceError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }
        if !account.is_active {
            return Err(ServiceError::Unauthorized(
                "Account is disabled".to_string(),
            ));
        }

        self.generate_token_pair(&account)
    }

    /// Issue a fresh pair from a valid refresh token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ServiceError> {
        let claims = self.decode(refresh_token)?;
        if claims.token_use != TOKEN_USE_REFRESH {
            return Err(ServiceError::Unauthorized(
                "Not a refresh token".to_string(),
            ));
        }

        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| ServiceError::Unauthorized("Malformed token subject".to_string()))?;

        let account = user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Unknown account".to_string()))?;

        if !account.is_active {
            return Err(ServiceError::Unauthorized(
                "Account is disabled".to_string(),
            ));
        }

        self.generate_token_pair(&account)
    }

    /// Validate an access token and return the current user identity.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentUser, ServiceError> {
        let claims = self.decode(token)?;
        if claims.token_use != TOKEN_USE_ACCESS {
            return Err(ServiceError::Unauthorized(
                "Not an access token".to_string(),
            ));
        }
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| ServiceError::Unauthorized("Malformed token subject".to_string()))?;

        Ok(CurrentUser {
            id: user_id,
            username: claims.username,
            role: claims.role,
        })
    }

    pub fn generate_token_pair(&self, account: &user::Model) -> Result<TokenPair, ServiceError> {
        let now = Utc::now();
        let access_exp = now
            + ChronoDuration::from_std(self.config.access_token_expiration)
                .map_err(|_| ServiceError::Internal("Invalid token duration".to_string()))?;
        let refresh_exp = now
            + ChronoDuration::from_std(self.config.refresh_token_expiration)
                .map_err(|_| ServiceError::Internal("Invalid token duration".to_string()))?;

        let access_claims = Claims {
            sub: account.id.to_string(),
            username: account.username.clone(),
            role: account.role.clone(),
            token_use: TOKEN_USE_ACCESS.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: access_exp.timestamp(),
        };
        let refresh_claims = Claims {
            sub: account.id.to_string(),
            username: account.username.clone(),
            role: account.role.clone(),
            token_use: TOKEN_USE_REFRESH.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: refresh_exp.timestamp(),
        };

        let key = EncodingKey::from_secret(self.config.jwt_secret.as_bytes());
        let header = Header::new(Algorithm::HS256);
        let access_token = encode(&header, &access_claims, &key)
            .map_err(|e| ServiceError::Internal(format!("token creation failed: {e}")))?;
        let refresh_token = encode(&header, &refresh_claims, &key)
            .map_err(|e| ServiceError::Internal(format!("token creation failed: {e}")))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_expiration.as_secs() as i64,
        })
    }

    fn decode(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                ServiceError::Unauthorized("Token has expired".to_string())
            }
            _ => ServiceError::Unauthorized("Invalid token".to_string()),
        })
    }
}

// Any valid PHC string works here; it only has to be verifiable.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$MDAwMDAwMDAwMDAwMDAwMA$7mB9mBMoRMPRZqBmJHWjJ9hhCD3GiL2Fi1rtTNy2IX8";

/// Identity of the authenticated caller, extracted from the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn require_admin(&self) -> Result<(), ServiceError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(
                "Administrator role required".to_string(),
            ))
        }
    }
}

/// Extractor alias used by handlers.
pub type AuthenticatedUser = CurrentUser;

#[async_trait]
impl FromRequestParts<crate::AppState> for CurrentUser {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &crate::AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ServiceError::Unauthorized("Missing Authorization header".to_string())
            })?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or_else(|| ServiceError::Unauthorized("Expected a bearer token".to_string()))?;

        state.auth.authenticate(token).await
    }
}
