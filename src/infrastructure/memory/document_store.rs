//! In-Memory Document Store
//!
//! 进程内文档存储，用于本地开发和测试；重启后数据丢失

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{DocumentStorePort, StoreError, StoredDocument};

/// 内存文档存储
///
/// (collection, key) -> 文档 + 写入时间
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: DashMap<(String, String), StoredDocument>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl DocumentStorePort for InMemoryDocumentStore {
    async fn write(
        &self,
        collection: &str,
        key: &str,
        document: &serde_json::Value,
    ) -> Result<(), StoreError> {
        self.documents.insert(
            (collection.to_string(), key.to_string()),
            StoredDocument {
                data: document.clone(),
                update_time: Utc::now(),
            },
        );
        Ok(())
    }

    async fn read(&self, collection: &str, key: &str) -> Result<StoredDocument, StoreError> {
        self.documents
            .get(&(collection.to_string(), key.to_string()))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", collection, key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_write_then_read() {
        let store = InMemoryDocumentStore::new();
        let before = Utc::now();

        store.write("cache", "k", &json!({"value": 1})).await.unwrap();
        let doc = store.read("cache", "k").await.unwrap();

        assert_eq!(doc.data, json!({"value": 1}));
        assert!(doc.update_time >= before);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = InMemoryDocumentStore::new();
        store.write("a", "k", &json!(1)).await.unwrap();

        let err = store.read("b", "k").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_overwrite_replaces_document() {
        let store = InMemoryDocumentStore::new();
        store.write("c", "k", &json!("old")).await.unwrap();
        store.write("c", "k", &json!("new")).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.read("c", "k").await.unwrap().data, json!("new"));
    }
}
