//! Movement — an immutable record of a loan or return affecting one
//! material's quantity.
//!
//! Movements are never updated or deleted; no such operation exists
//! anywhere in the workspace. The balance change and the movement row are
//! committed together or not at all.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::{Error, Result, material::Material};

// ─── MovementKind ────────────────────────────────────────────────────────────

/// Direction of a stock movement. Loans take stock out of the shed;
/// returns bring it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementKind {
  Loan,
  Return,
}

impl MovementKind {
  /// The lowercase tag stored in the database and emitted on the wire.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Loan => "loan",
      Self::Return => "return",
    }
  }

  /// Parse a tag, case-insensitively. Anything but the two recognized
  /// values is rejected.
  pub fn parse(tag: &str) -> Result<Self> {
    match tag.to_ascii_lowercase().as_str() {
      "loan" => Ok(Self::Loan),
      "return" => Ok(Self::Return),
      _ => Err(Error::UnknownMovementKind(tag.to_owned())),
    }
  }

  /// The signed delta this kind applies to a material balance.
  ///
  /// The stored movement quantity is always the unsigned magnitude; the
  /// sign is reconstructable from the kind alone.
  pub fn signed_delta(self, quantity: i64) -> i64 {
    match self {
      Self::Loan => -quantity.abs(),
      Self::Return => quantity.abs(),
    }
  }

  /// Status text used when the caller supplies none.
  pub fn default_status(self) -> &'static str {
    match self {
      Self::Loan => "loaned",
      Self::Return => "returned",
    }
  }
}

impl std::str::FromStr for MovementKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

impl std::fmt::Display for MovementKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// Manual serde impls: the wire accepts any casing ("LOAN", "Loan", ...)
// but serialization is always the normalized lowercase tag.

impl Serialize for MovementKind {
  fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for MovementKind {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
    let tag = String::deserialize(deserializer)?;
    Self::parse(&tag).map_err(serde::de::Error::custom)
  }
}

// ─── Movement ────────────────────────────────────────────────────────────────

/// An immutable loan/return record. Once written, no field ever changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
  pub movement_id: Uuid,
  pub material_id: Uuid,
  /// The actor who took or brought back the stock.
  pub user_id:     Uuid,
  pub kind:        MovementKind,
  /// Unsigned magnitude; direction lives in `kind`.
  pub quantity:    i64,
  pub moved_at:    DateTime<Utc>,
  /// When a loan is expected back. Meaningless for returns.
  pub due_back:    Option<DateTime<Utc>>,
  /// Free text; defaults per kind ("loaned" / "returned").
  pub status:      String,
}

// ─── NewMovement ─────────────────────────────────────────────────────────────

/// Input to [`crate::store::InventoryStore::record_movement`].
///
/// `moved_at` defaults to the current instant and `status` to the kind's
/// default when left unset.
#[derive(Debug, Clone)]
pub struct NewMovement {
  pub material_id: Uuid,
  pub user_id:     Uuid,
  pub kind:        MovementKind,
  pub quantity:    i64,
  pub moved_at:    Option<DateTime<Utc>>,
  pub due_back:    Option<DateTime<Utc>>,
  pub status:      Option<String>,
}

impl NewMovement {
  /// Convenience constructor with all optional fields unset.
  pub fn new(material_id: Uuid, user_id: Uuid, kind: MovementKind, quantity: i64) -> Self {
    Self {
      material_id,
      user_id,
      kind,
      quantity,
      moved_at: None,
      due_back: None,
      status: None,
    }
  }

  /// Reject malformed input before any storage is touched.
  ///
  /// Callers must hand over a strictly positive quantity; the store still
  /// takes the absolute value when computing the delta, but relying on
  /// that is not part of the contract.
  pub fn validate(&self) -> Result<()> {
    if self.quantity <= 0 {
      return Err(Error::NonPositiveQuantity(self.quantity));
    }
    Ok(())
  }
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// Result of the movement transaction: the appended record plus the
/// updated material, whose `below_minimum` flag reflects the post-update
/// quantity so callers can warn about low stock without a second query.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedMovement {
  pub movement: Movement,
  pub material: Material,
}

/// A movement enriched with the referenced material's and user's names,
/// as returned by the ledger query.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
  pub movement:      Movement,
  pub material_name: String,
  pub user_name:     String,
}
