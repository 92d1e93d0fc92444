//! Tubecast - 视频频道 → 播客 Feed 服务

use std::sync::Arc;
use std::time::Duration;

use tubecast::application::DocumentStorePort;
use tubecast::config::{load_config, print_config, AppConfig, StoreBackend};
use tubecast::infrastructure::adapters::{
    DecipherConfig, HttpDecipherClient, WatchPageConfig, YouTubeDataApiClient,
    YouTubeDataApiConfig, YouTubeWatchPageClient,
};
use tubecast::infrastructure::cache::DocumentTtlCache;
use tubecast::infrastructure::http::{AppSettings, AppState, HttpServer, ServerConfig};
use tubecast::infrastructure::memory::InMemoryDocumentStore;
use tubecast::infrastructure::persistence::sled::SledDocumentStore;
use tubecast::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteDocumentStore,
};

/// 初始化日志
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},tubecast={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 按配置打开文档存储
async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStorePort>> {
    let store = &config.store;

    if store.backend != StoreBackend::Memory {
        if let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let handle: Arc<dyn DocumentStorePort> = match store.backend {
        StoreBackend::Sqlite => {
            let pool =
                create_pool(&DatabaseConfig::new(&store.path, store.max_connections)).await?;
            run_migrations(&pool).await?;
            Arc::new(SqliteDocumentStore::new(pool))
        }
        StoreBackend::Sled => Arc::new(SledDocumentStore::open(&store.path)?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, cached tracks are lost on restart");
            Arc::new(InMemoryDocumentStore::new())
        }
    };

    Ok(handle)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);
    tracing::info!("Tubecast {}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    if config.youtube.api_key.is_empty() {
        tracing::warn!("youtube.api_key is not set, channel feeds will fail");
    }

    // 文档存储在进程生命周期内共享，关闭时释放
    let store = open_store(&config).await?;
    let cache = Arc::new(DocumentTtlCache::new(
        store.clone(),
        config.store.collection.clone(),
    ));

    // 上游适配器
    let platform = Arc::new(YouTubeWatchPageClient::new(WatchPageConfig {
        site_url: config.youtube.site_url.clone(),
        timeout_secs: config.youtube.timeout_secs,
    })?);
    let directory = Arc::new(YouTubeDataApiClient::new(YouTubeDataApiConfig {
        api_url: config.youtube.api_url.clone(),
        api_key: config.youtube.api_key.clone(),
        timeout_secs: config.youtube.timeout_secs,
        max_results: config.youtube.max_results,
    })?);
    let decipher = Arc::new(HttpDecipherClient::new(DecipherConfig {
        site_url: config.youtube.site_url.clone(),
        connect_timeout_secs: config.decipher.connect_timeout_secs,
        idle_timeout_secs: config.decipher.idle_timeout_secs,
        tls_handshake_timeout_secs: config.decipher.tls_handshake_timeout_secs,
        expect_continue_timeout_secs: config.decipher.expect_continue_timeout_secs,
    }));

    let state = AppState::new(
        cache,
        platform,
        decipher,
        directory,
        AppSettings {
            public_base_url: config.server.public_base_url(),
            track_ttl: Duration::from_secs(config.cache.track_ttl_secs),
            resolve_deadline: Duration::from_secs(config.resolve.deadline_secs),
        },
    );

    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    store.close().await;
    tracing::info!("Server shutdown complete");

    Ok(())
}
