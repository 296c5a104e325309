//! SQLite backend for the Reel document store.
//!
//! Projects, settings and whitelist entries are stored as JSON documents in a
//! single `documents` table keyed by `(collection, doc_id)`. All access goes
//! through [`tokio_rusqlite`] so it runs off the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
