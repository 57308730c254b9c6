//! [`SqliteStore`] — the SQLite implementation of [`InventoryStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use gearshed_core::{
  material::{Material, MaterialPatch, NewMaterial},
  movement::{LedgerEntry, Movement, NewMovement, RecordedMovement},
  store::{DeleteOutcome, InventoryStore},
  user::{DEFAULT_ROLE, NewUser, User},
};

use crate::{
  Error, Result,
  encode::{RawLedgerEntry, RawMaterial, RawMovement, RawUser, encode_dt, encode_kind, encode_uuid},
  schema::SCHEMA,
};

// ─── Row mapping ─────────────────────────────────────────────────────────────

/// Column order shared by every material SELECT and RETURNING clause:
/// `material_id, name, quantity, minimum_quantity,
///  quantity < minimum_quantity, created_at`.
fn material_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawMaterial> {
  Ok(RawMaterial {
    material_id:      row.get(0)?,
    name:             row.get(1)?,
    quantity:         row.get(2)?,
    minimum_quantity: row.get(3)?,
    below_minimum:    row.get(4)?,
    created_at:       row.get(5)?,
  })
}

fn user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:       row.get(0)?,
    name:          row.get(1)?,
    email:         row.get(2)?,
    password_hash: row.get(3)?,
    role:          row.get(4)?,
    created_at:    row.get(5)?,
  })
}

fn ledger_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawLedgerEntry> {
  Ok(RawLedgerEntry {
    movement:      RawMovement {
      movement_id: row.get(0)?,
      material_id: row.get(1)?,
      user_id:     row.get(2)?,
      kind:        row.get(3)?,
      quantity:    row.get(4)?,
      moved_at:    row.get(5)?,
      due_back:    row.get(6)?,
      status:      row.get(7)?,
    },
    material_name: row.get(8)?,
    user_name:     row.get(9)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A gearshed inventory store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// are serialized onto the connection's worker thread, so the in-place
/// quantity update in [`record_movement`](InventoryStore::record_movement)
/// can never interleave with another writer.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── InventoryStore impl ─────────────────────────────────────────────────────

impl InventoryStore for SqliteStore {
  type Error = Error;

  // ── Materials ──────────────────────────────────────────────────────────────

  async fn add_material(&self, input: NewMaterial) -> Result<Material> {
    input.validate()?;

    let material = Material {
      material_id:      Uuid::new_v4(),
      name:             input.name,
      quantity:         input.quantity,
      minimum_quantity: input.minimum_quantity,
      below_minimum:    input.quantity < input.minimum_quantity,
      created_at:       Utc::now(),
    };

    let id_str   = encode_uuid(material.material_id);
    let at_str   = encode_dt(material.created_at);
    let name     = material.name.clone();
    let quantity = material.quantity;
    let minimum  = material.minimum_quantity;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO materials (material_id, name, quantity, minimum_quantity, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, quantity, minimum, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(material)
  }

  async fn get_material(&self, id: Uuid) -> Result<Option<Material>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawMaterial> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT material_id, name, quantity, minimum_quantity,
                      quantity < minimum_quantity, created_at
                 FROM materials WHERE material_id = ?1",
              rusqlite::params![id_str],
              material_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMaterial::into_material).transpose()
  }

  async fn list_materials(&self, name_filter: Option<String>) -> Result<Vec<Material>> {
    let pattern = name_filter.map(|f| format!("%{f}%"));

    let raws: Vec<RawMaterial> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(p) = pattern {
          let mut stmt = conn.prepare(
            "SELECT material_id, name, quantity, minimum_quantity,
                    quantity < minimum_quantity, created_at
               FROM materials
              WHERE lower(name) LIKE lower(?1)
              ORDER BY name ASC",
          )?;
          stmt
            .query_map(rusqlite::params![p], material_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT material_id, name, quantity, minimum_quantity,
                    quantity < minimum_quantity, created_at
               FROM materials
              ORDER BY name ASC",
          )?;
          stmt
            .query_map([], material_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMaterial::into_material).collect()
  }

  async fn update_material(&self, id: Uuid, patch: MaterialPatch) -> Result<Option<Material>> {
    patch.validate()?;

    let id_str = encode_uuid(id);
    let MaterialPatch { name, quantity, minimum_quantity } = patch;

    let raw: Option<RawMaterial> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "UPDATE materials
                  SET name             = COALESCE(?1, name),
                      quantity         = COALESCE(?2, quantity),
                      minimum_quantity = COALESCE(?3, minimum_quantity)
                WHERE material_id = ?4
            RETURNING material_id, name, quantity, minimum_quantity,
                      quantity < minimum_quantity, created_at",
              rusqlite::params![name, quantity, minimum_quantity, id_str],
              material_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMaterial::into_material).transpose()
  }

  async fn delete_material(&self, id: Uuid) -> Result<DeleteOutcome> {
    let id_str = encode_uuid(id);

    let outcome = self
      .conn
      .call(move |conn| {
        // Movements are an immutable ledger; a material they reference
        // must not disappear out from under them.
        let referenced: bool = conn
          .query_row(
            "SELECT 1 FROM movements WHERE material_id = ?1 LIMIT 1",
            rusqlite::params![id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if referenced {
          return Ok(DeleteOutcome::InUse);
        }

        let deleted = conn.execute(
          "DELETE FROM materials WHERE material_id = ?1",
          rusqlite::params![id_str],
        )?;

        Ok(if deleted == 0 { DeleteOutcome::NotFound } else { DeleteOutcome::Deleted })
      })
      .await?;

    Ok(outcome)
  }

  // ── Movements ──────────────────────────────────────────────────────────────

  async fn record_movement(&self, input: NewMovement) -> Result<Option<RecordedMovement>> {
    input.validate()?;

    let movement = Movement {
      movement_id: Uuid::new_v4(),
      material_id: input.material_id,
      user_id:     input.user_id,
      kind:        input.kind,
      quantity:    input.quantity.abs(),
      moved_at:    input.moved_at.unwrap_or_else(Utc::now),
      due_back:    input.due_back,
      status:      input
        .status
        .unwrap_or_else(|| input.kind.default_status().to_owned()),
    };

    let delta = movement.kind.signed_delta(movement.quantity);

    let movement_id_str = encode_uuid(movement.movement_id);
    let material_id_str = encode_uuid(movement.material_id);
    let user_id_str     = encode_uuid(movement.user_id);
    let kind_str        = encode_kind(movement.kind).to_owned();
    let quantity        = movement.quantity;
    let moved_at_str    = encode_dt(movement.moved_at);
    let due_back_str    = movement.due_back.map(encode_dt);
    let status          = movement.status.clone();

    let raw: Option<RawMaterial> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // One in-place read-modify-write; the balance is never carried
        // across round trips.
        let updated = tx
          .query_row(
            "UPDATE materials
                SET quantity = quantity + ?1
              WHERE material_id = ?2
          RETURNING material_id, name, quantity, minimum_quantity,
                    quantity < minimum_quantity, created_at",
            rusqlite::params![delta, material_id_str],
            material_row,
          )
          .optional()?;

        let Some(material) = updated else {
          // Dropping the uncommitted transaction rolls back; nothing was
          // written.
          return Ok(None);
        };

        tx.execute(
          "INSERT INTO movements
             (movement_id, material_id, user_id, kind, quantity, moved_at, due_back, status)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            movement_id_str,
            material_id_str,
            user_id_str,
            kind_str,
            quantity,
            moved_at_str,
            due_back_str,
            status,
          ],
        )?;

        tx.commit()?;
        Ok(Some(material))
      })
      .await?;

    match raw {
      Some(m) => Ok(Some(RecordedMovement { movement, material: m.into_material()? })),
      None => Ok(None),
    }
  }

  async fn list_movements(&self, material_filter: Option<Uuid>) -> Result<Vec<LedgerEntry>> {
    let filter_str = material_filter.map(encode_uuid);

    let raws: Vec<RawLedgerEntry> = self
      .conn
      .call(move |conn| {
        // rowid breaks same-instant ties: most recently inserted first.
        let rows = if let Some(id) = filter_str {
          let mut stmt = conn.prepare(
            "SELECT m.movement_id, m.material_id, m.user_id, m.kind, m.quantity,
                    m.moved_at, m.due_back, m.status,
                    mat.name, u.name
               FROM movements m
               JOIN materials mat ON mat.material_id = m.material_id
               JOIN users u       ON u.user_id       = m.user_id
              WHERE m.material_id = ?1
              ORDER BY m.moved_at DESC, m.rowid DESC",
          )?;
          stmt
            .query_map(rusqlite::params![id], ledger_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT m.movement_id, m.material_id, m.user_id, m.kind, m.quantity,
                    m.moved_at, m.due_back, m.status,
                    mat.name, u.name
               FROM movements m
               JOIN materials mat ON mat.material_id = m.material_id
               JOIN users u       ON u.user_id       = m.user_id
              ORDER BY m.moved_at DESC, m.rowid DESC",
          )?;
          stmt
            .query_map([], ledger_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLedgerEntry::into_entry).collect()
  }

  // ── Users ──────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<Option<User>> {
    let user = User {
      user_id:       Uuid::new_v4(),
      name:          input.name,
      email:         input.email,
      password_hash: input.password_hash,
      role:          input.role.unwrap_or_else(|| DEFAULT_ROLE.to_owned()),
      created_at:    Utc::now(),
    };

    let id_str   = encode_uuid(user.user_id);
    let at_str   = encode_dt(user.created_at);
    let name     = user.name.clone();
    let email    = user.email.clone();
    let hash     = user.password_hash.clone();
    let role     = user.role.clone();

    // Check and insert run back-to-back on the single connection thread,
    // and the UNIQUE constraint backs the check.
    let taken: bool = self
      .conn
      .call(move |conn| {
        let exists: bool = conn
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1",
            rusqlite::params![email],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if exists {
          return Ok(true);
        }

        conn.execute(
          "INSERT INTO users (user_id, name, email, password_hash, role, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, email, hash, role, at_str],
        )?;
        Ok(false)
      })
      .await?;

    Ok(if taken { None } else { Some(user) })
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let email = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, name, email, password_hash, role, created_at
                 FROM users WHERE email = ?1",
              rusqlite::params![email],
              user_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Health ─────────────────────────────────────────────────────────────────

  async fn ping(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
