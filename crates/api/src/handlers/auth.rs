//! Handlers for the `/auth` resource: registration, login and user reads.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use beacon_core::error::CoreError;
use beacon_core::registration::Registration;
use beacon_core::roles::role_for_new_user;
use beacon_core::types::DbId;
use beacon_db::models::user::{CreateUser, UserResponse};
use beacon_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::storage::{discard_photo, save_photo};

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: DbId,
    pub role: String,
}

/// POST /api/auth/register
///
/// Multipart form with the registration fields and an optional `photo`
/// file. The first user to register becomes an admin.
pub async fn register(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<RegisterResponse>>)> {
    let mut input = Registration::default();
    let mut photo: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "photo" {
            let file_name = field.file_name().unwrap_or("").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            if !file_name.is_empty() && !data.is_empty() {
                photo = Some((file_name, data.to_vec()));
            }
            continue;
        }

        let target = match name.as_str() {
            "name" => &mut input.name,
            "surname" => &mut input.surname,
            "nationalId" => &mut input.national_id,
            "email" => &mut input.email,
            "phone" => &mut input.phone,
            "password" => &mut input.password,
            "address" => &mut input.address,
            _ => continue,
        };
        *target = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
    }

    input.normalize();
    input.check()?;

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "A user with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let existing_users = UserRepo::count(&state.pool).await?;
    let role = role_for_new_user(existing_users);

    let photo_path = match &photo {
        Some((file_name, data)) => {
            Some(save_photo(&state.config.uploads, file_name, data).await?)
        }
        None => None,
    };

    let created = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name,
            surname: input.surname,
            national_id: input.national_id,
            email: input.email,
            phone: input.phone,
            password_hash,
            address: input.address,
            photo: photo_path.clone(),
            role: role.to_string(),
        },
    )
    .await;

    let user = match created {
        Ok(user) => user,
        Err(e) => {
            if let Some(path) = &photo_path {
                discard_photo(&state.config.uploads, path).await;
            }
            return Err(e.into());
        }
    };

    tracing::info!(user_id = user.id, role = %user.role, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: RegisterResponse {
                id: user.id,
                role: user.role,
            },
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginRequest>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(DataResponse {
        data: LoginResponse {
            token,
            role: user.role,
        },
    }))
}

/// GET /api/auth/latest
pub async fn latest(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::latest(&state.pool)
        .await?
        .ok_or_else(|| CoreError::NothingFound("No users registered".into()))?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// GET /api/auth/oldest
pub async fn oldest(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::oldest(&state.pool)
        .await?
        .ok_or_else(|| CoreError::NothingFound("No users registered".into()))?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// GET /api/auth/user/{id}
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "user", id })?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// GET /api/auth/users
pub async fn list_users(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    if users.is_empty() {
        return Err(CoreError::NothingFound("No users registered".into()).into());
    }
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}
