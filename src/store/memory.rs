//! In-memory [`ContentStore`] for tests and embedding.
//!
//! Documents are supplied at construction and never change afterwards.
//! Content is held as bytes so non-UTF-8 documents can be represented.

use std::collections::BTreeMap;

use crate::error::{StoreError, StoreResult};
use crate::path::normalize;

use super::ContentStore;

#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    docs: BTreeMap<String, Vec<u8>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(path, text)` pairs.
    pub fn from_documents<'a>(
        docs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> StoreResult<Self> {
        let mut store = Self::new();
        for (path, text) in docs {
            store.insert(path, text)?;
        }
        Ok(store)
    }

    /// Add or replace a document before the store is shared.
    pub fn insert(&mut self, path: &str, content: impl Into<Vec<u8>>) -> StoreResult<()> {
        self.docs.insert(normalize(path)?, content.into());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl ContentStore for InMemoryStore {
    fn list_documents(&self) -> StoreResult<Vec<String>> {
        Ok(self.docs.keys().cloned().collect())
    }

    fn get_document(&self, path: &str) -> StoreResult<String> {
        let path = normalize(path)?;
        let bytes = self
            .docs
            .get(&path)
            .ok_or_else(|| StoreError::not_found(&path))?;
        String::from_utf8(bytes.clone()).map_err(|_| StoreError::NotUtf8 { path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_is_sorted() {
        let store =
            InMemoryStore::from_documents([("node_js/b.md", "# B"), ("aws/a.md", "# A")]).unwrap();
        assert_eq!(store.list_documents().unwrap(), vec!["aws/a.md", "node_js/b.md"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_get_and_not_found() {
        let store = InMemoryStore::from_documents([("aws/a.md", "# A")]).unwrap();
        assert_eq!(store.get_document("./aws/a.md").unwrap(), "# A");
        assert!(store.get_document("aws/missing.md").unwrap_err().is_not_found());
        assert!(store.modified_at("aws/a.md").unwrap().is_none());
    }

    #[test]
    fn test_non_utf8() {
        let mut store = InMemoryStore::new();
        store.insert("bad.md", vec![0xc3, 0x28]).unwrap();
        assert!(matches!(
            store.get_document("bad.md"),
            Err(StoreError::NotUtf8 { .. })
        ));
    }

    #[test]
    fn test_insert_rejects_invalid_path() {
        let mut store = InMemoryStore::new();
        assert!(store.insert("../escape.md", "").is_err());
        assert!(store.is_empty());
    }
}
