//! Authentication Handlers
//!
//! Registration, login, and current-user info

use std::time::Duration;

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Role, User, UserCreate};
use crate::db::repository::UserRepository;
use crate::utils::validation::{
    MAX_PASSWORD_LEN, MAX_USERNAME_LEN, MIN_PASSWORD_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            username: user.username,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Register handler
///
/// Creates a credential record; the caller logs in separately.
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<UserCreate>,
) -> AppResult<Json<AppResponse<UserInfo>>> {
    validate_required_text(&req.username, "username", MAX_USERNAME_LEN)?;
    if req.password.len() < MIN_PASSWORD_LEN || req.password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters"
        )));
    }

    let repo = UserRepository::new(state.get_db());
    let user = repo.create(req).await?;

    tracing::info!(username = %user.username, role = %user.role, "User registered");

    Ok(ok_with_message(
        UserInfo::from(user),
        "Registration successful",
    ))
}

/// Login handler
///
/// Authenticates credentials and returns a JWT carrying `{id, username, role}`
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo.find_by_username(&req.username).await?;

    // Fixed delay before checking the result, to blunt timing attacks
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message prevents username enumeration
    let user = match user {
        Some(u) => {
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                tracing::warn!(username = %req.username, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            tracing::warn!(username = %req.username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();

    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &user.username, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        user_id = %user_id,
        username = %user.username,
        role = %user.role,
        "User logged in"
    );

    Ok(Json(LoginResponse {
        token,
        user: UserInfo::from(user),
    }))
}

/// Current user info, read fresh from the database
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<UserInfo>> {
    let repo = UserRepository::new(state.get_db());
    let stored = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User no longer exists"))?;

    Ok(Json(UserInfo::from(stored)))
}
