//! Handlers for registration and login.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users` | Body: [`RegisterBody`]; 409 on duplicate email |
//! | `POST` | `/auth/login` | Body: [`LoginBody`]; 401 on bad credentials |
//!
//! Passwords are hashed with argon2 before they reach the store; login
//! verifies against the stored PHC string, never by string comparison.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use gearshed_core::{
  store::InventoryStore,
  user::{NewUser, PublicUser},
};
use rand_core::OsRng;
use serde::Deserialize;

use crate::error::ApiError;

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub name:     String,
  pub email:    String,
  pub password: String,
  /// Defaults to `"student"` when unset.
  pub role:     Option<String>,
}

/// `POST /users`
pub async fn register<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InventoryStore,
{
  if body.name.trim().is_empty()
    || body.email.trim().is_empty()
    || body.password.is_empty()
  {
    return Err(ApiError::BadRequest(
      "name, email, and password are required".to_string(),
    ));
  }

  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(body.password.as_bytes(), &salt)
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))?
    .to_string();

  let user = store
    .add_user(NewUser {
      name:          body.name,
      email:         body.email,
      password_hash: hash,
      role:          body.role,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::Conflict("email already registered".to_string()))?;

  Ok((StatusCode::CREATED, Json(PublicUser::from(user))))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

/// `POST /auth/login` — returns the public user on success. Unknown
/// emails and failed verifications are indistinguishable to the caller.
pub async fn login<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<PublicUser>, ApiError>
where
  S: InventoryStore,
{
  if body.email.trim().is_empty() || body.password.is_empty() {
    return Err(ApiError::BadRequest(
      "email and password are required".to_string(),
    ));
  }

  let user = store
    .find_user_by_email(&body.email)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(ApiError::Unauthorized)?;

  let parsed_hash =
    PasswordHash::new(&user.password_hash).map_err(|_| ApiError::Unauthorized)?;
  Argon2::default()
    .verify_password(body.password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Ok(Json(PublicUser::from(user)))
}
