// handlers/public/auth/signup.rs - POST /signup

use std::collections::HashMap;

use axum::{extract::rejection::JsonRejection, Json};
use serde::Deserialize;

use crate::auth::{hash_password, validate_email_format, validate_password_strength};
use crate::config;
use crate::database::manager::FailureClass;
use crate::database::users::{insert_user, NewUser, UserProfile};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// Fields are optional so that missing ones come back as field errors
/// instead of a JSON rejection.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone_number: Option<String>,
    pub designation: Option<String>,
    pub client_name: Option<String>,
}

/**
 * POST /signup - Create an account
 *
 * Expected Input:
 * ```json
 * {
 *   "name": "Priya Raman",
 *   "email": "priya@example.com",
 *   "password": "at least 8 chars",
 *   "phone_number": "optional",
 *   "designation": "optional",
 *   "client_name": "optional"
 * }
 * ```
 *
 * Responds 201 with the stored profile (never the hash), 409 when the email
 * is already registered, 403 when signup is disabled.
 */
pub async fn signup(body: Result<Json<SignupRequest>, JsonRejection>) -> ApiResult<UserProfile> {
    let security = &config::config().security;
    if !security.allow_signup {
        return Err(ApiError::forbidden("Signup is disabled"));
    }

    let Json(request) = body.map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;
    let (new_user, password) = validate_signup(request)?;

    let cost = security.bcrypt_cost;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| {
            tracing::error!("Password hashing task failed: {}", e);
            ApiError::internal_server_error("Authentication service error")
        })??;

    let pool = DatabaseManager::pool()?;
    let user = insert_user(&pool, NewUser { password_hash, ..new_user })
        .await
        .map_err(|e| match e.class() {
            FailureClass::UniqueViolation => ApiError::conflict("Email already registered"),
            _ => ApiError::from(e),
        })?;

    tracing::info!("Registered user {}", user.id);
    Ok(ApiResponse::created(user.into()))
}

/// Check the request shape, returning the user (hash still empty) and the plain password
fn validate_signup(request: SignupRequest) -> Result<(NewUser, String), ApiError> {
    let mut field_errors = HashMap::new();

    let name = non_blank(request.name);
    if name.is_none() {
        field_errors.insert("name".to_string(), "Name is required".to_string());
    }

    let email = non_blank(request.email);
    match &email {
        None => {
            field_errors.insert("email".to_string(), "Email is required".to_string());
        }
        Some(email) => {
            if let Err(msg) = validate_email_format(email) {
                field_errors.insert("email".to_string(), msg);
            }
        }
    }

    let password = request.password.unwrap_or_default();
    if let Err(msg) = validate_password_strength(&password) {
        field_errors.insert("password".to_string(), msg);
    }

    match (name, email) {
        (Some(name), Some(email)) if field_errors.is_empty() => Ok((
            NewUser {
                name,
                email,
                phone_number: non_blank(request.phone_number),
                designation: non_blank(request.designation),
                client_name: non_blank(request.client_name),
                password_hash: String::new(),
            },
            password,
        )),
        _ => Err(ApiError::validation_error("Invalid signup request", Some(field_errors))),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            name: Some(name.into()),
            email: Some(email.into()),
            password: Some(password.into()),
            phone_number: Some("  ".into()),
            designation: None,
            client_name: Some("Kyndryl".into()),
        }
    }

    #[test]
    fn accepts_complete_request() {
        let (user, password) = validate_signup(request(" Priya ", "priya@example.com", "longpassword")).unwrap();
        assert_eq!(user.name, "Priya");
        assert_eq!(user.phone_number, None);
        assert_eq!(user.client_name.as_deref(), Some("Kyndryl"));
        assert_eq!(password, "longpassword");
    }

    #[test]
    fn reports_every_bad_field() {
        let err = validate_signup(request("", "not-an-email", "short")).unwrap_err();
        match err {
            ApiError::ValidationError { field_errors: Some(fields), .. } => {
                assert!(fields.contains_key("name"));
                assert_eq!(fields["email"], "Invalid email format");
                assert!(fields.contains_key("password"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
