//! Document-backed TTL Cache
//!
//! 每个缓存条目存为一个文档 `{key, value, ttl}`，ttl 以毫秒存储。
//! 过期判断使用存储分配的写入时间，而不是文档内的任何字段。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::application::ports::{
    CacheError, DocumentCollection, DocumentStorePort, StoreError, TtlCachePort,
};

/// 缓存文档
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntity {
    key: String,
    value: String,
    /// 毫秒
    ttl: u64,
}

/// 基于文档存储的 TTL 缓存
pub struct DocumentTtlCache {
    collection: DocumentCollection,
}

impl DocumentTtlCache {
    pub fn new(store: Arc<dyn DocumentStorePort>, collection: impl Into<String>) -> Self {
        Self {
            collection: DocumentCollection::new(store, collection),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl TtlCachePort for DocumentTtlCache {
    async fn set_key(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let entity = CacheEntity {
            key: key.to_string(),
            value: value.to_string(),
            ttl: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
        };

        let document = serde_json::to_value(&entity)
            .map_err(|e| CacheError::DecodeError(e.to_string()))?;

        self.collection.write(key, &document).await.map_err(|e| {
            tracing::error!(
                collection = %self.collection.name(),
                key = %key,
                value_len = value.len(),
                ttl_ms = entity.ttl,
                error = %e,
                "Failed to write cache entry"
            );
            CacheError::StoreUnavailable(e.to_string())
        })?;

        tracing::debug!(key = %key, ttl_ms = entity.ttl, "Cache entry written");
        Ok(())
    }

    async fn get_key(&self, key: &str) -> Result<String, CacheError> {
        let document = match self.collection.read(key).await {
            Ok(document) => document,
            Err(StoreError::NotFound(_)) => return Err(CacheError::NotFound(key.to_string())),
            Err(StoreError::Corrupted(msg)) => return Err(CacheError::DecodeError(msg)),
            Err(e) => {
                tracing::error!(
                    collection = %self.collection.name(),
                    key = %key,
                    error = %e,
                    "Failed to read cache entry"
                );
                return Err(CacheError::StoreUnavailable(e.to_string()));
            }
        };

        let entity: CacheEntity = serde_json::from_value(document.data).map_err(|e| {
            tracing::warn!(key = %key, error = %e, "Cache entry has unexpected shape");
            CacheError::DecodeError(e.to_string())
        })?;

        // 时钟回拨时 age 为负，视为未过期
        let age = Utc::now().signed_duration_since(document.update_time);
        let age_ms = age.num_milliseconds().max(0) as u64;
        if age_ms > entity.ttl {
            tracing::debug!(key = %key, age_ms, ttl_ms = entity.ttl, "Cache entry expired");
            return Err(CacheError::Expired(key.to_string()));
        }

        Ok(entity.value)
    }
}
