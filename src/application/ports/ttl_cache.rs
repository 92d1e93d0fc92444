//! TTL Cache Port - 带过期时间的键值缓存
//!
//! 用于缓存昂贵的上游查询结果（例如已解析的音频 URL）。
//! 过期在读取时根据存储的写入时间懒判断，不做后台清理。

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Cache 错误
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache key not found: {0}")]
    NotFound(String),

    #[error("Cache key expired: {0}")]
    Expired(String),

    #[error("Cache entry could not be decoded: {0}")]
    DecodeError(String),

    #[error("Cache store unavailable: {0}")]
    StoreUnavailable(String),
}

impl CacheError {
    /// NotFound / Expired：普通未命中，调用方应回退到实时解析
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::NotFound(_) | CacheError::Expired(_))
    }
}

/// TTL Cache Port
///
/// 每次 set/get 恰好一次存储往返，没有进程内缓存层
#[async_trait]
pub trait TtlCachePort: Send + Sync {
    /// 写入（覆盖）缓存，写入时间由存储分配
    async fn set_key(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// 读取缓存
    ///
    /// - 不存在: `CacheError::NotFound`
    /// - `now - 写入时间 > ttl`: `CacheError::Expired`（条目保留，等待覆盖）
    /// - 文档格式错误: `CacheError::DecodeError`
    async fn get_key(&self, key: &str) -> Result<String, CacheError>;
}
