//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// 文档存储配置（TTL 缓存的落地）
    #[serde(default)]
    pub store: StoreConfig,

    /// 上游平台配置
    #[serde(default)]
    pub youtube: YouTubeConfig,

    /// 签名解密客户端超时
    #[serde(default)]
    pub decipher: DecipherTimeouts,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub resolve: ResolveConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL（写入 Feed 的 enclosure 地址）
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL（不含结尾 `/`）
    pub fn public_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                let host = if self.host == "0.0.0.0" {
                    "localhost"
                } else {
                    &self.host
                };
                format!("http://{}:{}", host, self.port)
            }
        }
    }
}

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Sled,
    Memory,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Sqlite => write!(f, "sqlite"),
            StoreBackend::Sled => write!(f, "sled"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

/// 文档存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// 数据文件路径（sqlite 文件或 sled 目录）
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// 缓存文档所在集合
    #[serde(default = "default_collection")]
    pub collection: String,

    /// 最大连接数（仅 sqlite）
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/tubecast.db")
}

fn default_collection() -> String {
    "cache".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
            collection: default_collection(),
            max_connections: default_max_connections(),
        }
    }
}

/// 上游平台配置
#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeConfig {
    /// Data API 基础 URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Data API key
    #[serde(default)]
    pub api_key: String,

    /// 站点根地址（观看页面、embed 页面、播放器脚本）
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_youtube_timeout")]
    pub timeout_secs: u64,

    /// 每个 Feed 最多列出的视频数（Data API 上限 50）
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_api_url() -> String {
    "https://www.googleapis.com/youtube/v3/".to_string()
}

fn default_site_url() -> String {
    "https://www.youtube.com".to_string()
}

fn default_youtube_timeout() -> u64 {
    15
}

fn default_max_results() -> u32 {
    50
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            site_url: default_site_url(),
            timeout_secs: default_youtube_timeout(),
            max_results: default_max_results(),
        }
    }
}

/// 签名解密客户端超时（秒）
#[derive(Debug, Clone, Deserialize)]
pub struct DecipherTimeouts {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    #[serde(default = "default_tls_handshake_timeout")]
    pub tls_handshake_timeout_secs: u64,

    #[serde(default = "default_expect_continue_timeout")]
    pub expect_continue_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    60
}

fn default_tls_handshake_timeout() -> u64 {
    10
}

fn default_expect_continue_timeout() -> u64 {
    1
}

impl Default for DecipherTimeouts {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            tls_handshake_timeout_secs: default_tls_handshake_timeout(),
            expect_continue_timeout_secs: default_expect_continue_timeout(),
        }
    }
}

/// 缓存配置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// 已解析音轨地址的缓存时间（秒），上游签名地址约 6 小时失效
    #[serde(default = "default_track_ttl")]
    pub track_ttl_secs: u64,
}

fn default_track_ttl() -> u64 {
    5 * 3600
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            track_ttl_secs: default_track_ttl(),
        }
    }
}

/// 解析配置
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveConfig {
    /// 单次音轨解析（含解密）的总时限（秒）
    #[serde(default = "default_deadline")]
    pub deadline_secs: u64,
}

fn default_deadline() -> u64 {
    20
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            deadline_secs: default_deadline(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
