//! SQL schema for the gearshed SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    role          TEXT NOT NULL DEFAULT 'student',
    created_at    TEXT NOT NULL    -- ISO 8601 UTC; store-assigned
);

-- below_minimum has no column: it is (quantity < minimum_quantity),
-- computed in every SELECT.
CREATE TABLE IF NOT EXISTS materials (
    material_id      TEXT PRIMARY KEY,
    name             TEXT NOT NULL,
    quantity         INTEGER NOT NULL DEFAULT 0,
    minimum_quantity INTEGER NOT NULL DEFAULT 0,
    created_at       TEXT NOT NULL
);

-- Movements are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS movements (
    movement_id TEXT PRIMARY KEY,
    material_id TEXT NOT NULL REFERENCES materials(material_id),
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    kind        TEXT NOT NULL,    -- 'loan' | 'return', normalized lowercase
    quantity    INTEGER NOT NULL, -- unsigned magnitude; sign lives in kind
    moved_at    TEXT NOT NULL,
    due_back    TEXT,
    status      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS movements_material_idx ON movements(material_id);
CREATE INDEX IF NOT EXISTS movements_moved_idx    ON movements(moved_at);
CREATE INDEX IF NOT EXISTS materials_name_idx     ON materials(name);

PRAGMA user_version = 1;
";
