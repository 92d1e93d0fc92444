//! Document Store Port - 文档存储
//!
//! 远程/本地文档存储的抽象接口：一个集合下每个 key 对应一个 JSON 文档。
//! 写入时间戳由存储自身分配并在读取时返回，调用方不能覆盖。

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// 文档存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Stored document is corrupted: {0}")]
    Corrupted(String),
}

/// 读取到的文档及其存储侧写入时间
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub data: serde_json::Value,
    pub update_time: DateTime<Utc>,
}

/// Document Store Port
///
/// 长生命周期共享句柄，由进程启动时创建并注入，关闭时调用 `close`
#[async_trait]
pub trait DocumentStorePort: Send + Sync {
    /// 写入（覆盖）文档，存储分配写入时间
    async fn write(
        &self,
        collection: &str,
        key: &str,
        document: &serde_json::Value,
    ) -> Result<(), StoreError>;

    /// 读取文档；不存在时返回 `StoreError::NotFound`
    async fn read(&self, collection: &str, key: &str) -> Result<StoredDocument, StoreError>;

    /// 释放底层连接
    async fn close(&self) {}
}

/// 集合句柄
#[derive(Clone)]
pub struct DocumentCollection {
    store: Arc<dyn DocumentStorePort>,
    name: String,
}

impl DocumentCollection {
    pub fn new(store: Arc<dyn DocumentStorePort>, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn write(&self, key: &str, document: &serde_json::Value) -> Result<(), StoreError> {
        self.store.write(&self.name, key, document).await
    }

    pub async fn read(&self, key: &str) -> Result<StoredDocument, StoreError> {
        self.store.read(&self.name, key).await
    }
}
