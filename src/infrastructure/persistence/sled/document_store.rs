//! Sled-based Document Store
//!
//! 每个 collection 对应一个 sled tree，值为 bincode 编码的文档信封

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{DocumentStorePort, StoreError, StoredDocument};

/// 存储信封
///
/// JSON 以字符串保存，bincode 不支持自描述的 `serde_json::Value`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocumentEnvelope {
    data: String,
    update_time_ms: i64,
}

/// Sled 文档存储
pub struct SledDocumentStore {
    db: Db,
}

impl SledDocumentStore {
    /// 打开（或创建）数据库
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path.as_ref()).map_err(|e| StoreError::Unavailable(e.to_string()))?;

        tracing::info!(
            db_path = %path.as_ref().display(),
            trees = db.tree_names().len(),
            "SledDocumentStore initialized"
        );

        Ok(Self { db })
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 刷新到磁盘
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }

    fn tree(&self, collection: &str) -> Result<sled::Tree, StoreError> {
        self.db
            .open_tree(collection)
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl DocumentStorePort for SledDocumentStore {
    async fn write(
        &self,
        collection: &str,
        key: &str,
        document: &serde_json::Value,
    ) -> Result<(), StoreError> {
        let envelope = DocumentEnvelope {
            data: document.to_string(),
            update_time_ms: Utc::now().timestamp_millis(),
        };
        let bytes =
            bincode::serialize(&envelope).map_err(|e| StoreError::Corrupted(e.to_string()))?;

        self.tree(collection)?
            .insert(key, bytes)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        tracing::trace!(collection = %collection, key = %key, "Document written");
        Ok(())
    }

    async fn read(&self, collection: &str, key: &str) -> Result<StoredDocument, StoreError> {
        let bytes = self
            .tree(collection)?
            .get(key)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", collection, key)))?;

        let envelope: DocumentEnvelope =
            bincode::deserialize(&bytes).map_err(|e| StoreError::Corrupted(e.to_string()))?;

        let update_time = Utc
            .timestamp_millis_opt(envelope.update_time_ms)
            .single()
            .ok_or_else(|| {
                StoreError::Corrupted(format!("invalid timestamp {}", envelope.update_time_ms))
            })?;

        Ok(StoredDocument {
            data: serde_json::from_str(&envelope.data)
                .map_err(|e| StoreError::Corrupted(e.to_string()))?,
            update_time,
        })
    }

    async fn close(&self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "Failed to flush sled store on close");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let store = SledDocumentStore::open(dir.path().join("docs.sled")).unwrap();

        store
            .write("cache", "track_abc", &json!({"key": "track_abc", "value": "v", "ttl": 5}))
            .await
            .unwrap();

        let doc = store.read("cache", "track_abc").await.unwrap();
        assert_eq!(doc.data["ttl"], 5);
        assert!(Utc::now().signed_duration_since(doc.update_time).num_seconds() < 5);
    }

    #[tokio::test]
    async fn test_read_missing() {
        let dir = tempdir().unwrap();
        let store = SledDocumentStore::open(dir.path().join("docs.sled")).unwrap();

        let err = store.read("cache", "nothing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_corrupted_value() {
        let dir = tempdir().unwrap();
        let store = SledDocumentStore::open(dir.path().join("docs.sled")).unwrap();
        store
            .tree("cache")
            .unwrap()
            .insert("bad", &b"\x01"[..])
            .unwrap();

        let err = store.read("cache", "bad").await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupted(_)));
    }
}
