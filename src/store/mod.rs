//! Content store abstraction.
//!
//! The [`ContentStore`] trait is the read-only contract every consumer uses:
//! enumerate document paths, fetch a document's raw text, and (through the
//! provided methods) its parsed [`Document`] view.
//!
//! # Implementations
//!
//! | Type | Backing |
//! |------|---------|
//! | [`FsStore`] | A directory tree filtered by include/exclude globs |
//! | [`InMemoryStore`] | A path → text map, for tests and embedding |
//!
//! Paths passed to [`get_document`](ContentStore::get_document) are
//! normalized with [`crate::path::normalize`] first, so `./aws/x.md` and
//! `aws\x.md` address the same document.

pub mod fs;
pub mod memory;

pub use fs::FsStore;
pub use memory::InMemoryStore;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::{StoreError, StoreResult};
use crate::models::{Document, DocumentSummary};

/// Read-only view over a set of markdown documents.
///
/// Implementations must be `Send + Sync` so one instance can be shared by
/// the HTTP server's handlers.
pub trait ContentStore: Send + Sync {
    /// All document paths, sorted.
    ///
    /// I/O failures are returned, never skipped.
    fn list_documents(&self) -> StoreResult<Vec<String>>;

    /// Raw text of the document at `path`.
    ///
    /// Fails with [`StoreError::NotFound`](crate::error::StoreError::NotFound)
    /// when `path` does not name a document in this store.
    fn get_document(&self, path: &str) -> StoreResult<String>;

    /// Last-modified time, when the backend tracks one.
    fn modified_at(&self, _path: &str) -> StoreResult<Option<DateTime<Utc>>> {
        Ok(None)
    }

    /// Fetch and parse a document.
    fn load_document(&self, path: &str) -> StoreResult<Document> {
        let path = crate::path::normalize(path)?;
        let body = self.get_document(&path)?;
        let updated_at = self.modified_at(&path)?;
        Ok(Document::parse(&path, body).with_updated_at(updated_at))
    }

    /// Summaries of every document, optionally restricted to one topic category.
    ///
    /// Documents that are not UTF-8 are left out; `corpus lint` reports them.
    fn summaries(&self, topic: Option<&str>) -> StoreResult<Vec<DocumentSummary>> {
        let mut out = Vec::new();
        for path in self.list_documents()? {
            let doc = match self.load_document(&path) {
                Ok(doc) => doc,
                Err(StoreError::NotUtf8 { path }) => {
                    warn!(%path, "skipping document that is not UTF-8");
                    continue;
                }
                Err(e) => return Err(e),
            };
            if topic.is_some() && doc.topic_category.as_deref() != topic {
                continue;
            }
            out.push(doc.summary());
        }
        Ok(out)
    }
}
