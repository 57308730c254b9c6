//! JSON REST API for gearshed.
//!
//! Exposes an axum [`Router`] backed by any
//! [`gearshed_core::store::InventoryStore`]. TLS, CORS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = gearshed_api::api_router(store.clone());
//! ```

pub mod error;
pub mod materials;
pub mod movements;
pub mod users;

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::State,
  routing::{get, post},
};
use gearshed_core::store::InventoryStore;
use serde_json::json;

pub use error::ApiError;

/// `GET /health` — issues a `SELECT 1` against the store.
async fn health<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: InventoryStore,
{
  store
    .ping()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(json!({ "status": "ok" })))
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: InventoryStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Health
    .route("/health", get(health::<S>))
    // Users
    .route("/users", post(users::register::<S>))
    .route("/auth/login", post(users::login::<S>))
    // Materials
    .route(
      "/materials",
      get(materials::list::<S>).post(materials::create::<S>),
    )
    .route(
      "/materials/{id}",
      get(materials::get_one::<S>)
        .put(materials::update_one::<S>)
        .delete(materials::delete_one::<S>),
    )
    // Movements
    .route(
      "/movements",
      get(movements::list::<S>).post(movements::create::<S>),
    )
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
