//! User — the actor referenced by every movement.
//!
//! Out of the core stock logic except as the actor reference; kept here so
//! the ledger query and the registration/login endpoints have their types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Role assigned at registration when the caller supplies none.
pub const DEFAULT_ROLE: &str = "student";

/// A registered user as stored. `password_hash` is an argon2 PHC string
/// and must never appear in an API response — convert to [`PublicUser`]
/// first.
#[derive(Debug, Clone)]
pub struct User {
  pub user_id:       Uuid,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub role:          String,
  pub created_at:    DateTime<Utc>,
}

/// The serializable view of a user, with the credential hash stripped.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
  pub user_id:    Uuid,
  pub name:       String,
  pub email:      String,
  pub role:       String,
  pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
  fn from(u: User) -> Self {
    Self {
      user_id:    u.user_id,
      name:       u.name,
      email:      u.email,
      role:       u.role,
      created_at: u.created_at,
    }
  }
}

/// Input to [`crate::store::InventoryStore::add_user`]. The password has
/// already been hashed by the caller; raw credentials never reach the
/// store.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  /// Defaults to [`DEFAULT_ROLE`] when unset.
  pub role:          Option<String>,
}
