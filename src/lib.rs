//! Tubecast - 把视频频道变成播客 Feed
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Stream Context: 视频 ID、流清单、签名解密
//! - Channel Context: 频道 ID、频道元数据、视频摘要
//! - Feed Context: 播客 Feed 与 RSS 渲染
//!
//! 应用层 (application/):
//! - Ports: 端口定义（DocumentStore, TtlCache, VideoPlatform, ChannelDirectory, Decipher）
//! - Services: StreamResolver, FeedBuilder
//! - Queries: 音轨解析、频道 Feed
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: Feed、音轨重定向、频道表单
//! - Cache: 基于文档存储的 TTL 缓存
//! - Persistence: SQLite + Sled 文档存储
//! - Memory: 内存文档存储
//! - Adapters: YouTube Data API、观看页面、签名解密

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
