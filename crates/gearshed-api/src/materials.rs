//! Handlers for `/materials` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/materials` | Optional `?q=<substr>`, case-insensitive |
//! | `POST`   | `/materials` | Body: [`CreateMaterialBody`]; name required |
//! | `GET`    | `/materials/:id` | 404 if not found |
//! | `PUT`    | `/materials/:id` | Partial update; absent fields keep prior values |
//! | `DELETE` | `/materials/:id` | 409 while movements reference the material |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use gearshed_core::{
  material::{Material, MaterialPatch, NewMaterial},
  store::{DeleteOutcome, InventoryStore},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Name-substring filter, matched case-insensitively.
  pub q: Option<String>,
}

/// `GET /materials[?q=<substr>]` — alphabetically ordered by name.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Material>>, ApiError>
where
  S: InventoryStore,
{
  let materials = store
    .list_materials(params.q)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(materials))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateMaterialBody {
  pub name:             String,
  #[serde(default)]
  pub quantity:         i64,
  #[serde(default)]
  pub minimum_quantity: i64,
}

/// `POST /materials` — quantities default to zero.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateMaterialBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InventoryStore,
{
  let input = NewMaterial {
    name:             body.name,
    quantity:         body.quantity,
    minimum_quantity: body.minimum_quantity,
  };
  input
    .validate()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let material = store
    .add_material(input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(material)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /materials/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Material>, ApiError>
where
  S: InventoryStore,
{
  let material = store
    .get_material(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("material {id} not found")))?;
  Ok(Json(material))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMaterialBody {
  pub name:             Option<String>,
  pub quantity:         Option<i64>,
  pub minimum_quantity: Option<i64>,
}

/// `PUT /materials/:id` — each field independently optional.
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateMaterialBody>,
) -> Result<Json<Material>, ApiError>
where
  S: InventoryStore,
{
  let patch = MaterialPatch {
    name:             body.name,
    quantity:         body.quantity,
    minimum_quantity: body.minimum_quantity,
  };
  patch
    .validate()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let material = store
    .update_material(id, patch)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("material {id} not found")))?;
  Ok(Json(material))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /materials/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: InventoryStore,
{
  match store
    .delete_material(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
  {
    DeleteOutcome::Deleted => Ok(Json(json!({ "message": "material deleted" }))),
    DeleteOutcome::NotFound => {
      Err(ApiError::NotFound(format!("material {id} not found")))
    }
    DeleteOutcome::InUse => Err(ApiError::Conflict(
      "material has recorded movements".to_string(),
    )),
  }
}
