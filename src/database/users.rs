use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;

/// Row from the `users` table
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub designation: Option<String>,
    pub client_name: Option<String>,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user; never carries the password hash
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub designation: Option<String>,
    pub client_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone_number: user.phone_number,
            designation: user.designation,
            client_name: user.client_name,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub designation: Option<String>,
    pub client_name: Option<String>,
    pub password_hash: String,
}

const USER_COLUMNS: &str = "id, name, email, phone_number, designation, client_name, password, created_at";

pub async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE lower(email) = lower($1)",
        USER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn insert_user(pool: &PgPool, new_user: NewUser) -> Result<User, DatabaseError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (email, name, phone_number, designation, client_name, password) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {}",
        USER_COLUMNS
    ))
    .bind(&new_user.email)
    .bind(&new_user.name)
    .bind(&new_user.phone_number)
    .bind(&new_user.designation)
    .bind(&new_user.client_name)
    .bind(&new_user.password_hash)
    .fetch_one(pool)
    .await?;

    Ok(user)
}
