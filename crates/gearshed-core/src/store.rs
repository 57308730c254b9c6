//! The `InventoryStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g.
//! `gearshed-store-sqlite`). The API layer depends on this abstraction,
//! not on any concrete backend, and each operation receives the store
//! handle explicitly — there is no ambient connection state.

use std::future::Future;

use uuid::Uuid;

use crate::{
  material::{Material, MaterialPatch, NewMaterial},
  movement::{LedgerEntry, NewMovement, RecordedMovement},
  user::{NewUser, User},
};

// ─── Delete outcome ──────────────────────────────────────────────────────────

/// Outcome of [`InventoryStore::delete_material`].
///
/// Deletion is refused while movements still reference the material:
/// movements are an immutable ledger, and deleting their material would
/// either destroy history (cascade) or silently orphan it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
  Deleted,
  NotFound,
  /// At least one movement references the material.
  InUse,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a gearshed inventory store backend.
///
/// Reads recompute derived state (the below-minimum flag) on every call;
/// nothing derived is ever persisted. The movement write path is the one
/// multi-statement unit and must be atomic — see [`record_movement`].
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
///
/// [`record_movement`]: InventoryStore::record_movement
pub trait InventoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Materials ─────────────────────────────────────────────────────────

  /// Create and persist a new material. Unset quantities start at zero.
  fn add_material(
    &self,
    input: NewMaterial,
  ) -> impl Future<Output = Result<Material, Self::Error>> + Send + '_;

  /// Retrieve a material by id. Returns `None` if not found.
  fn get_material(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Material>, Self::Error>> + Send + '_;

  /// List materials ordered by name ascending, optionally restricted to
  /// names containing `name_filter` (case-insensitive substring).
  fn list_materials(
    &self,
    name_filter: Option<String>,
  ) -> impl Future<Output = Result<Vec<Material>, Self::Error>> + Send + '_;

  /// Apply a partial update; fields left `None` keep their prior values.
  /// Returns `None` if the material does not exist.
  fn update_material(
    &self,
    id: Uuid,
    patch: MaterialPatch,
  ) -> impl Future<Output = Result<Option<Material>, Self::Error>> + Send + '_;

  /// Delete a material, unless movements still reference it.
  fn delete_material(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<DeleteOutcome, Self::Error>> + Send + '_;

  // ── Movements ─────────────────────────────────────────────────────────

  /// Apply the movement's signed delta to the material balance and append
  /// the movement row, as one indivisible unit against the shared store.
  ///
  /// `None` means the referenced material does not exist; in that case
  /// nothing was committed — no balance change, no movement row. The
  /// delta is applied as a single in-place `quantity = quantity + delta`
  /// statement, never as a read followed by a write of a computed value,
  /// so concurrent movements against one material cannot lose updates.
  fn record_movement(
    &self,
    input: NewMovement,
  ) -> impl Future<Output = Result<Option<RecordedMovement>, Self::Error>> + Send + '_;

  /// Movement history enriched with material and user names, ordered by
  /// movement time descending; same-instant entries resolve to
  /// most-recently-inserted first.
  fn list_movements(
    &self,
    material_filter: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<LedgerEntry>, Self::Error>> + Send + '_;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Register a user. Returns `None` when the email is already taken; the
  /// uniqueness check and the insert happen in one serialized unit.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Credential lookup for login. Returns the stored user including the
  /// password hash; callers verify and then strip it.
  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Health ────────────────────────────────────────────────────────────

  /// Cheap connectivity check backing the health endpoint.
  fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
