//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（DocumentStore、TtlCache、VideoPlatform、ChannelDirectory、Decipher）
//! - services: 流解析与 Feed 构建
//! - queries: 查询及处理器（对外只有读操作）
//! - single_flight: 并发请求合并
//! - error: 应用层错误定义

pub mod error;
pub mod ports;
pub mod queries;
pub mod services;
pub mod single_flight;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use error::ApplicationError;

pub use ports::{
    CacheError, ChannelDirectoryPort, DecipherPort, DocumentCollection, DocumentStorePort,
    PlatformError, StoreError, StoredDocument, TtlCachePort, VideoPlatformPort,
};

pub use queries::{
    handlers::{track_cache_key, GetChannelFeedHandler, ResolveTrackHandler},
    GetChannelFeedQuery, GetChannelFeedResponse, ResolveTrackQuery, ResolveTrackResponse,
};

pub use services::{FeedBuilder, StreamResolver};
pub use single_flight::SingleFlight;
