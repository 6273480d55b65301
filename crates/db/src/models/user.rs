//! User entity model and DTOs.

use beacon_core::snapshot::UserContact;
use beacon_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub surname: String,
    pub national_id: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub address: String,
    pub photo: Option<String>,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub surname: String,
    pub national_id: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub photo: Option<String>,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            surname: user.surname,
            national_id: user.national_id,
            email: user.email,
            phone: user.phone,
            address: user.address,
            photo: user.photo,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<&User> for UserContact {
    fn from(user: &User) -> Self {
        Self {
            name: Some(user.name.clone()),
            surname: Some(user.surname.clone()),
            email: Some(user.email.clone()),
            phone: Some(user.phone.clone()),
            address: Some(user.address.clone()),
            photo: user.photo.clone(),
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub name: String,
    pub surname: String,
    pub national_id: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub address: String,
    pub photo: Option<String>,
    pub role: String,
}
