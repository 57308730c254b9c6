//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Movement kinds are stored as their
//! normalized lowercase tags.

use chrono::{DateTime, Utc};
use gearshed_core::{
  material::Material,
  movement::{LedgerEntry, Movement, MovementKind},
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── MovementKind ────────────────────────────────────────────────────────────

pub fn encode_kind(k: MovementKind) -> &'static str { k.as_str() }

pub fn decode_kind(s: &str) -> Result<MovementKind> {
  Ok(MovementKind::parse(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `materials` row. `below_minimum` comes
/// from the `(quantity < minimum_quantity)` SELECT expression, so it is
/// fresh on every read.
pub struct RawMaterial {
  pub material_id:      String,
  pub name:             String,
  pub quantity:         i64,
  pub minimum_quantity: i64,
  pub below_minimum:    bool,
  pub created_at:       String,
}

impl RawMaterial {
  pub fn into_material(self) -> Result<Material> {
    Ok(Material {
      material_id:      decode_uuid(&self.material_id)?,
      name:             self.name,
      quantity:         self.quantity,
      minimum_quantity: self.minimum_quantity,
      below_minimum:    self.below_minimum,
      created_at:       decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `movements` row.
pub struct RawMovement {
  pub movement_id: String,
  pub material_id: String,
  pub user_id:     String,
  pub kind:        String,
  pub quantity:    i64,
  pub moved_at:    String,
  pub due_back:    Option<String>,
  pub status:      String,
}

impl RawMovement {
  pub fn into_movement(self) -> Result<Movement> {
    Ok(Movement {
      movement_id: decode_uuid(&self.movement_id)?,
      material_id: decode_uuid(&self.material_id)?,
      user_id:     decode_uuid(&self.user_id)?,
      kind:        decode_kind(&self.kind)?,
      quantity:    self.quantity,
      moved_at:    decode_dt(&self.moved_at)?,
      due_back:    self.due_back.as_deref().map(decode_dt).transpose()?,
      status:      self.status,
    })
  }
}

/// A movement row joined with the material and user names.
pub struct RawLedgerEntry {
  pub movement:      RawMovement,
  pub material_name: String,
  pub user_name:     String,
}

impl RawLedgerEntry {
  pub fn into_entry(self) -> Result<LedgerEntry> {
    Ok(LedgerEntry {
      movement:      self.movement.into_movement()?,
      material_name: self.material_name,
      user_name:     self.user_name,
    })
  }
}

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub role:          String,
  pub created_at:    String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      name:          self.name,
      email:         self.email,
      password_hash: self.password_hash,
      role:          self.role,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
