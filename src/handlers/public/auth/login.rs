// handlers/public/auth/login.rs - POST /login

use axum::{extract::rejection::JsonRejection, Json};
use serde::{Deserialize, Serialize};

use crate::auth::{generate_jwt, verify_password, Claims};
use crate::config;
use crate::database::users::{find_user_by_email, UserProfile};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub token_type: &'static str,
    /// Seconds
    pub expires_in: u64,
    pub user: UserProfile,
}

/**
 * POST /login - Exchange email and password for a bearer token
 *
 * Expected Input:
 * ```json
 * { "email": "priya@example.com", "password": "..." }
 * ```
 *
 * An unknown email and a wrong password both answer 401 "Invalid credentials".
 */
pub async fn login(body: Result<Json<LoginRequest>, JsonRejection>) -> ApiResult<LoginResponse> {
    let Json(request) = body.map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;

    let email = request.email.as_deref().map(str::trim).unwrap_or_default();
    let password = request.password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::validation_error("Email and password are required", None));
    }

    let pool = DatabaseManager::pool()?;
    let Some(user) = find_user_by_email(&pool, email).await? else {
        tracing::info!("Login failed: unknown email");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    let hash = user.password.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| {
            tracing::error!("Password verification task failed: {}", e);
            ApiError::internal_server_error("Authentication service error")
        })??;

    if !verified {
        tracing::info!("Login failed for user {}", user.id);
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let security = &config::config().security;
    let claims = Claims::new(user.id, user.email.clone());
    let token = generate_jwt(&claims, &security.jwt_secret)?;

    tracing::info!("User {} logged in", user.id);
    Ok(ApiResponse::success(LoginResponse {
        message: "Login successful",
        token,
        token_type: "Bearer",
        expires_in: security.jwt_expiry_hours * 3600,
        user: user.into(),
    }))
}
