//! Material — a trackable stock item with a current quantity and a minimum
//! threshold.
//!
//! The quantity is mutated only through the movement transaction (see
//! [`crate::store::InventoryStore::record_movement`]) or a direct edit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// A stock item as returned by every read path.
///
/// `below_minimum` is derived — `quantity < minimum_quantity` — and is
/// recomputed by the store on each read. It never has a column of its own,
/// so it cannot go stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
  pub material_id:      Uuid,
  pub name:             String,
  pub quantity:         i64,
  pub minimum_quantity: i64,
  pub below_minimum:    bool,
  pub created_at:       DateTime<Utc>,
}

/// Input to [`crate::store::InventoryStore::add_material`].
/// Quantities left unset start at zero.
#[derive(Debug, Clone, Default)]
pub struct NewMaterial {
  pub name:             String,
  pub quantity:         i64,
  pub minimum_quantity: i64,
}

impl NewMaterial {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), quantity: 0, minimum_quantity: 0 }
  }

  /// Reject malformed input before any storage is touched.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::EmptyName);
    }
    Ok(())
  }
}

/// Partial update for a material. Fields left `None` keep their prior
/// values.
#[derive(Debug, Clone, Default)]
pub struct MaterialPatch {
  pub name:             Option<String>,
  pub quantity:         Option<i64>,
  pub minimum_quantity: Option<i64>,
}

impl MaterialPatch {
  /// A patch that would touch a name must not blank it out.
  pub fn validate(&self) -> Result<()> {
    if let Some(name) = &self.name
      && name.trim().is_empty()
    {
      return Err(Error::EmptyName);
    }
    Ok(())
  }
}
