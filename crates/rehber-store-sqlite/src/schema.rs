//! SQL schema for the Rehber SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS contacts (
    contact_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name  TEXT,
    last_name   TEXT,
    company     TEXT
);

-- Owned by exactly one contact; removed with it.
CREATE TABLE IF NOT EXISTS contact_infos (
    contact_info_id INTEGER PRIMARY KEY AUTOINCREMENT,
    contact_id      INTEGER NOT NULL
                    REFERENCES contacts(contact_id) ON DELETE CASCADE,
    information     TEXT NOT NULL,
    location        TEXT NOT NULL,  -- compared with BINARY collation
    is_saved        INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS contact_infos_contact_idx  ON contact_infos(contact_id);
CREATE INDEX IF NOT EXISTS contact_infos_location_idx ON contact_infos(location);

PRAGMA user_version = 1;
";
