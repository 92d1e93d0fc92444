//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml / config.local.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, StoreBackend};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "TUBECAST";

/// 加载应用配置
///
/// # 环境变量示例
/// - `TUBECAST_SERVER__PORT=8080`
/// - `TUBECAST_SERVER__BASE_URL=https://pod.example.com`
/// - `TUBECAST_YOUTUBE__API_KEY=...`
/// - `TUBECAST_STORE__BACKEND=sled`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// `config_path` 为 None 时按默认文件名搜索，文件可以不存在
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("store.backend", "sqlite")?
        .set_default("store.path", "data/tubecast.db")?
        .set_default("store.collection", "cache")?
        .set_default("store.max_connections", 5)?
        .set_default("youtube.api_url", "https://www.googleapis.com/youtube/v3/")?
        .set_default("youtube.api_key", "")?
        .set_default("youtube.site_url", "https://www.youtube.com")?
        .set_default("youtube.timeout_secs", 15)?
        .set_default("youtube.max_results", 50)?
        .set_default("decipher.connect_timeout_secs", 30)?
        .set_default("decipher.idle_timeout_secs", 60)?
        .set_default("decipher.tls_handshake_timeout_secs", 10)?
        .set_default("decipher.expect_continue_timeout_secs", 1)?
        .set_default("cache.track_ttl_secs", 5 * 3600)?
        .set_default("resolve.deadline_secs", 20)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 例如: TUBECAST_YOUTUBE__API_KEY=... ，变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if let Some(base_url) = &config.server.base_url {
        url::Url::parse(base_url).map_err(|e| {
            ConfigError::ValidationError(format!("Invalid server.base_url '{}': {}", base_url, e))
        })?;
    }

    if config.store.backend != StoreBackend::Memory && config.store.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "store.path cannot be empty for the {} backend",
            config.store.backend
        )));
    }

    if config.store.collection.is_empty() {
        return Err(ConfigError::ValidationError(
            "store.collection cannot be empty".to_string(),
        ));
    }

    if !config.youtube.api_url.ends_with('/') {
        return Err(ConfigError::ValidationError(
            "youtube.api_url must end with '/'".to_string(),
        ));
    }

    if !(1..=50).contains(&config.youtube.max_results) {
        return Err(ConfigError::ValidationError(
            "youtube.max_results must be between 1 and 50".to_string(),
        ));
    }

    if config.cache.track_ttl_secs == 0 {
        return Err(ConfigError::ValidationError(
            "cache.track_ttl_secs cannot be 0".to_string(),
        ));
    }

    if config.resolve.deadline_secs == 0 {
        return Err(ConfigError::ValidationError(
            "resolve.deadline_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志），不输出 API key
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    tracing::info!("Store Backend: {}", config.store.backend);
    if config.store.backend != StoreBackend::Memory {
        tracing::info!("Store Path: {}", config.store.path.display());
    }
    tracing::info!("Store Collection: {}", config.store.collection);
    tracing::info!("YouTube API: {}", config.youtube.api_url);
    tracing::info!(
        "YouTube API Key: {}",
        if config.youtube.api_key.is_empty() {
            "(not set)"
        } else {
            "(set)"
        }
    );
    tracing::info!("YouTube Timeout: {}s", config.youtube.timeout_secs);
    tracing::info!("Track TTL: {}s", config.cache.track_ttl_secs);
    tracing::info!("Resolve Deadline: {}s", config.resolve.deadline_secs);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_bad_base_url() {
        let mut config = AppConfig::default();
        config.server.base_url = Some("not a url".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_store_path() {
        let mut config = AppConfig::default();
        config.store.path = Default::default();
        assert!(validate_config(&config).is_err());

        config.store.backend = StoreBackend::Memory;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_max_results() {
        let mut config = AppConfig::default();
        config.youtube.max_results = 51;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_ttl() {
        let mut config = AppConfig::default();
        config.cache.track_ttl_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tubecast.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 9090\nbase_url = \"https://pod.example\"\n\n[store]\nbackend = \"memory\"\n\n[cache]\ntrack_ttl_secs = 60"
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.public_base_url(), "https://pod.example");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.cache.track_ttl_secs, 60);
        assert_eq!(config.resolve.deadline_secs, 20);
    }
}
