//! Error types for `gearshed-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("material not found: {0}")]
  MaterialNotFound(Uuid),

  #[error("material name must not be empty")]
  EmptyName,

  #[error("movement quantity must be positive, got {0}")]
  NonPositiveQuantity(i64),

  #[error("unknown movement kind: {0:?}")]
  UnknownMovementKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
