//! Handlers for `/movements` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/movements` | Body: [`RecordMovementBody`]; returns `{movement, material}` |
//! | `GET`  | `/movements` | Optional `?material_id=<uuid>`; newest first |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use gearshed_core::{
  movement::{LedgerEntry, MovementKind, NewMovement},
  store::InventoryStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── Record ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /movements`. The kind tag is parsed
/// case-insensitively; `moved_at` and `status` are defaulted by the store
/// when unset.
#[derive(Debug, Deserialize)]
pub struct RecordMovementBody {
  pub material_id: Uuid,
  pub user_id:     Uuid,
  pub kind:        MovementKind,
  pub quantity:    i64,
  pub moved_at:    Option<DateTime<Utc>>,
  pub due_back:    Option<DateTime<Utc>>,
  pub status:      Option<String>,
}

impl From<RecordMovementBody> for NewMovement {
  fn from(b: RecordMovementBody) -> Self {
    NewMovement {
      material_id: b.material_id,
      user_id:     b.user_id,
      kind:        b.kind,
      quantity:    b.quantity,
      moved_at:    b.moved_at,
      due_back:    b.due_back,
      status:      b.status,
    }
  }
}

/// `POST /movements` — the movement transaction.
///
/// Returns 201 with the created movement and the updated material; the
/// material carries the freshly computed below-minimum flag so callers
/// can warn about low stock without a second query.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<RecordMovementBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InventoryStore,
{
  let material_id = body.material_id;
  let input = NewMovement::from(body);
  input
    .validate()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let recorded = store
    .record_movement(input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("material {material_id} not found")))?;

  Ok((StatusCode::CREATED, Json(recorded)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub material_id: Option<Uuid>,
}

/// `GET /movements[?material_id=<uuid>]` — enriched with material and
/// user names, ordered by movement time descending.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<LedgerEntry>>, ApiError>
where
  S: InventoryStore,
{
  let entries = store
    .list_movements(params.material_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(entries))
}
