//! Application State
//!
//! 包含所有 Query Handlers 的应用状态

use std::sync::Arc;
use std::time::Duration;

use crate::application::{
    ChannelDirectoryPort, DecipherPort, GetChannelFeedHandler, ResolveTrackHandler,
    StreamResolver, TtlCachePort, VideoPlatformPort,
};

/// 应用状态的可调参数
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// 对外可访问的服务地址，用于拼接 enclosure URL
    pub public_base_url: String,
    pub track_ttl: Duration,
    pub resolve_deadline: Duration,
}

/// 应用状态
pub struct AppState {
    pub settings: AppSettings,

    // ========== Query Handlers ==========
    pub resolve_track_handler: ResolveTrackHandler,
    pub get_channel_feed_handler: GetChannelFeedHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        cache: Arc<dyn TtlCachePort>,
        platform: Arc<dyn VideoPlatformPort>,
        decipher: Arc<dyn DecipherPort>,
        directory: Arc<dyn ChannelDirectoryPort>,
        settings: AppSettings,
    ) -> Self {
        let resolver = Arc::new(StreamResolver::new(platform, decipher));

        Self {
            resolve_track_handler: ResolveTrackHandler::new(
                cache,
                resolver,
                settings.track_ttl,
                settings.resolve_deadline,
            ),
            get_channel_feed_handler: GetChannelFeedHandler::new(
                directory,
                settings.public_base_url.clone(),
            ),
            settings,
        }
    }
}
