//! [`SqliteStore`]: the SQLite implementation of [`ContentStore`] and
//! [`WhitelistStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use serde_json::Value;
use uuid::Uuid;

use reel_core::{
  project::Project,
  settings::{SETTINGS_KEY, SettingsPatch, SiteSettings},
  store::ContentStore,
  whitelist::{WhitelistEntry, WhitelistStore},
};

use crate::{
  Result,
  encode::{decode_doc, encode_doc, encode_dt, encode_uuid, other},
  schema::{PROJECTS, SCHEMA, SETTINGS, WHITELIST},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Reel document store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
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

  /// Open an in-memory store.
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

  /// Fetch the raw JSON body of one document.
  async fn get_doc(&self, collection: &'static str, doc_id: String) -> Result<Option<String>> {
    let data = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT data FROM documents WHERE collection = ?1 AND doc_id = ?2",
            rusqlite::params![collection, doc_id],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;
    Ok(data)
  }

  /// Insert or overwrite one document.
  async fn put_doc(
    &self,
    collection: &'static str,
    doc_id:     String,
    data:       String,
    created_at: Option<String>,
  ) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (collection, doc_id, data, created_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (collection, doc_id) DO UPDATE SET data = excluded.data",
          rusqlite::params![collection, doc_id, data, created_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ContentStore impl ───────────────────────────────────────────────────────

impl ContentStore for SqliteStore {
  type Error = crate::Error;

  // ── Projects ──────────────────────────────────────────────────────────────

  async fn insert_project(&self, project: &Project) -> Result<bool> {
    let id_str   = encode_uuid(project.id);
    let data     = encode_doc(project)?;
    let at_str   = encode_dt(project.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let result = conn.execute(
          "INSERT INTO documents (collection, doc_id, data, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![PROJECTS, id_str, data, at_str],
        );
        match result {
          Ok(_) => Ok(true),
          // The partial unique index on the project slug.
          Err(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
          {
            Ok(false)
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;
    Ok(inserted)
  }

  async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
    self
      .get_doc(PROJECTS, encode_uuid(id))
      .await?
      .map(|s| decode_doc(&s))
      .transpose()
  }

  async fn find_by_slug(&self, slug: &str) -> Result<Option<Project>> {
    let slug = slug.to_owned();

    let data: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT data FROM documents
             WHERE collection = ?1 AND json_extract(data, '$.slug') = ?2
             ORDER BY created_at ASC, rowid ASC
             LIMIT 1",
            rusqlite::params![PROJECTS, slug],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    data.map(|s| decode_doc(&s)).transpose()
  }

  async fn list_projects(&self) -> Result<Vec<Project>> {
    let rows: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT data FROM documents
           WHERE collection = ?1
           ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![PROJECTS], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows.iter().map(|s| decode_doc(s)).collect()
  }

  async fn replace_project(&self, project: &Project) -> Result<bool> {
    let id_str = encode_uuid(project.id);
    let data   = encode_doc(project)?;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE documents SET data = ?3 WHERE collection = ?1 AND doc_id = ?2",
          rusqlite::params![PROJECTS, id_str, data],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  async fn delete_project(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM documents WHERE collection = ?1 AND doc_id = ?2",
          rusqlite::params![PROJECTS, id_str],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  async fn settings_or_init(&self, default: SiteSettings) -> Result<SiteSettings> {
    let default_data = encode_doc(&default)?;

    let data: String = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT OR IGNORE INTO documents (collection, doc_id, data) VALUES (?1, ?2, ?3)",
          rusqlite::params![SETTINGS, SETTINGS_KEY, default_data],
        )?;
        let data: String = tx.query_row(
          "SELECT data FROM documents WHERE collection = ?1 AND doc_id = ?2",
          rusqlite::params![SETTINGS, SETTINGS_KEY],
          |row| row.get(0),
        )?;
        tx.commit()?;
        Ok(data)
      })
      .await?;

    decode_doc(&data)
  }

  async fn merge_settings(
    &self,
    patch:   SettingsPatch,
    default: SiteSettings,
  ) -> Result<SiteSettings> {
    let patch_json   = serde_json::to_value(&patch)?;
    let default_json = serde_json::to_value(&default)?;

    let data: String = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let existing: Option<String> = tx
          .query_row(
            "SELECT data FROM documents WHERE collection = ?1 AND doc_id = ?2",
            rusqlite::params![SETTINGS, SETTINGS_KEY],
            |row| row.get(0),
          )
          .optional()?;

        let mut doc: Value = match existing {
          Some(s) => serde_json::from_str(&s).map_err(other)?,
          None    => default_json,
        };
        // Field-level merge; keys absent from the patch are preserved.
        if let (Some(target), Value::Object(fields)) = (doc.as_object_mut(), patch_json) {
          target.extend(fields);
        }
        let data = doc.to_string();

        tx.execute(
          "INSERT INTO documents (collection, doc_id, data) VALUES (?1, ?2, ?3)
           ON CONFLICT (collection, doc_id) DO UPDATE SET data = excluded.data",
          rusqlite::params![SETTINGS, SETTINGS_KEY, data],
        )?;
        tx.commit()?;
        Ok(data)
      })
      .await?;

    decode_doc(&data)
  }
}

// ─── WhitelistStore impl ─────────────────────────────────────────────────────

impl WhitelistStore for SqliteStore {
  type Error = crate::Error;

  async fn get_entry(&self, email: &str) -> Result<Option<WhitelistEntry>> {
    self
      .get_doc(WHITELIST, email.to_owned())
      .await?
      .map(|s| decode_doc(&s))
      .transpose()
  }

  async fn put_entry(&self, entry: WhitelistEntry) -> Result<()> {
    let data = encode_doc(&entry)?;
    self.put_doc(WHITELIST, entry.email, data, None).await
  }

  async fn set_active(&self, email: &str, active: bool) -> Result<bool> {
    let email = email.to_owned();

    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let existing: Option<String> = tx
          .query_row(
            "SELECT data FROM documents WHERE collection = ?1 AND doc_id = ?2",
            rusqlite::params![WHITELIST, email],
            |row| row.get(0),
          )
          .optional()?;
        let Some(existing) = existing else {
          return Ok(false);
        };

        let mut entry: WhitelistEntry = serde_json::from_str(&existing).map_err(other)?;
        entry.active = active;
        let data = serde_json::to_string(&entry).map_err(other)?;

        tx.execute(
          "UPDATE documents SET data = ?3 WHERE collection = ?1 AND doc_id = ?2",
          rusqlite::params![WHITELIST, email, data],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;
    Ok(updated)
  }

  async fn list_entries(&self) -> Result<Vec<WhitelistEntry>> {
    let rows: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT data FROM documents WHERE collection = ?1 ORDER BY doc_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![WHITELIST], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows.iter().map(|s| decode_doc(s)).collect()
  }
}
