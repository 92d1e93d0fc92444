//! Cache Layer - TTL 缓存实现

mod ttl_cache;

pub use ttl_cache::DocumentTtlCache;
