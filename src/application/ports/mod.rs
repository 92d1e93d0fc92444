//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod document_store;
mod ttl_cache;
mod video_platform;

pub use document_store::{DocumentCollection, DocumentStorePort, StoreError, StoredDocument};
pub use ttl_cache::{CacheError, TtlCachePort};
pub use video_platform::{ChannelDirectoryPort, DecipherPort, PlatformError, VideoPlatformPort};
