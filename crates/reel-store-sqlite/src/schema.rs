//! SQL schema for the Reel SQLite store.

/// Collection holding one document per project, keyed by project UUID.
pub const PROJECTS: &str = "projects";
/// Collection holding fixed-key settings documents.
pub const SETTINGS: &str = "settings";
/// Collection holding one document per authorized email, keyed by the email.
pub const WHITELIST: &str = "whitelist";

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS documents (
    collection  TEXT NOT NULL,
    doc_id      TEXT NOT NULL,
    data        TEXT NOT NULL,   -- JSON document body
    created_at  TEXT,            -- fixed-width RFC 3339; NULL when not ordered
    PRIMARY KEY (collection, doc_id)
);

DROP INDEX IF EXISTS documents_slug_idx;
CREATE UNIQUE INDEX IF NOT EXISTS documents_project_slug_idx
    ON documents(json_extract(data, '$.slug'))
    WHERE collection = 'projects';
CREATE INDEX IF NOT EXISTS documents_created_idx
    ON documents(collection, created_at);

PRAGMA user_version = 2;
";
