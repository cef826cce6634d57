//! Authentication service for user registration, login, and token management

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::{PublicUser, User};
use std::sync::Arc;
use validator::Validate;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::store::Store;

const BCRYPT_COST: u32 = 10;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: Arc<Store>,
    jwt_secret: String,
    token_expiry: i64,
}

/// Input for creating an account
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SignupInput {
    #[validate(length(min = 1))]
    #[serde(default)]
    pub name: String,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub email: String,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(length(min = 1))]
    #[serde(default)]
    pub email: String,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub password: String,
}

/// Response after a successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(store: Arc<Store>, config: &Config) -> Self {
        Self {
            store,
            jwt_secret: config.jwt.secret.clone(),
            token_expiry: config.jwt.expiry_seconds,
        }
    }

    /// Register a new user
    pub async fn signup(&self, input: SignupInput) -> AppResult<PublicUser> {
        input
            .validate()
            .map_err(|_| AppError::Validation("name,email,password required".to_string()))?;

        let email = input.email.trim().to_lowercase();
        if self.store.users.find_by_email(&email).await?.is_some() {
            tracing::warn!("signup: user already exists for {}", email);
            return Err(AppError::UserExists);
        }

        // Hash password
        let password = input.password;
        let password_hash = tokio::task::spawn_blocking(move || hash(password, BCRYPT_COST))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = User {
            id: Utc::now().timestamp_millis(),
            name: input.name,
            email,
            password_hash,
        };

        // Another signup may have claimed the email while we were hashing
        let user = self
            .store
            .users
            .insert(user)
            .await?
            .ok_or(AppError::UserExists)?;

        tracing::info!("signup: created user {} id={}", user.email, user.id);
        Ok(PublicUser::from(&user))
    }

    /// Authenticate user with email and password
    pub async fn login(&self, input: LoginInput) -> AppResult<LoginResponse> {
        input
            .validate()
            .map_err(|_| AppError::Validation("email,password required".to_string()))?;

        let email = input.email.trim().to_lowercase();
        let Some(user) = self.store.users.find_by_email(&email).await? else {
            tracing::warn!("login: user not found for {}", email);
            return Err(AppError::InvalidCredentials);
        };

        // Verify password
        let password = input.password;
        let password_hash = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || verify(password, &password_hash))
            .await
            .map_err(|e| AppError::Internal(format!("Login failed: {}", e)))?
            .map_err(|e| {
                tracing::error!("login: bcrypt compare error: {}", e);
                AppError::Internal("Login failed".to_string())
            })?;

        if !valid {
            tracing::warn!("login: invalid password for {}", email);
            return Err(AppError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        Ok(LoginResponse {
            token,
            user: PublicUser::from(&user),
        })
    }

    /// Sign a token for `user`
    pub fn issue_token(&self, user: &User) -> AppResult<String> {
        issue_token(user, &self.jwt_secret, self.token_expiry)
    }
}

/// Sign an HS256 token carrying the user's id, email and name
pub fn issue_token(user: &User, secret: &str, expiry_seconds: i64) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(expiry_seconds)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Verify signature and expiry
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}
