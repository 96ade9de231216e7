//! In-process document store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Collection, Document, DocumentId, DocumentStore, Filter, Result, StoreInfo, StoredDocument};

/// Documents held in memory, kept in insertion order per collection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<StoredDocument>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: Collection, document: Document) -> Result<DocumentId> {
        let id = DocumentId::generate();
        let mut store = self.collections.write().await;
        store.entry(collection).or_default().push(StoredDocument { id, body: document });
        Ok(id)
    }

    async fn find_many(&self, collection: Collection, filter: Filter) -> Result<Vec<StoredDocument>> {
        let store = self.collections.read().await;
        Ok(store
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(&d.body)).cloned().collect())
            .unwrap_or_default())
    }

    async fn find_one_by_id(&self, collection: Collection, id: DocumentId) -> Result<Option<StoredDocument>> {
        let store = self.collections.read().await;
        Ok(store.get(&collection).and_then(|docs| docs.iter().find(|d| d.id == id).cloned()))
    }

    async fn find_one_by_filter(&self, collection: Collection, filter: Filter) -> Result<Option<StoredDocument>> {
        let store = self.collections.read().await;
        Ok(store
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(&d.body)).cloned()))
    }

    async fn update_one_by_id(&self, collection: Collection, id: DocumentId, fields: Document) -> Result<()> {
        let mut store = self.collections.write().await;
        if let Some(doc) = store.get_mut(&collection).and_then(|docs| docs.iter_mut().find(|d| d.id == id)) {
            doc.body.extend(fields);
        }
        Ok(())
    }

    async fn delete_one_by_filter(&self, collection: Collection, filter: Filter) -> Result<u64> {
        let mut store = self.collections.write().await;
        let Some(docs) = store.get_mut(&collection) else { return Ok(0) };
        match docs.iter().position(|d| filter.matches(&d.body)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn count(&self, collection: Collection, filter: Filter) -> Result<u64> {
        let store = self.collections.read().await;
        let count = store
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(&d.body)).count())
            .unwrap_or_default();
        Ok(count as u64)
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        let store = self.collections.read().await;
        Ok(Collection::ALL
            .iter()
            .filter(|c| store.get(*c).is_some_and(|docs| !docs.is_empty()))
            .map(|c| c.name().to_string())
            .collect())
    }

    fn describe(&self) -> StoreInfo {
        StoreInfo { backend: "memory", database_name: "in-memory".to_string() }
    }
}
