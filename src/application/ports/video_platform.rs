//! Video Platform Ports - 上游视频平台
//!
//! - VideoPlatformPort: 获取单个视频的流清单
//! - ChannelDirectoryPort: 频道元数据与视频列表
//! - DecipherPort: 签名解密（唯一需要逆向上游协议的部分，单独隔离以便替换）

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::channel::{ChannelId, ChannelSnippet, VideoSummary};
use crate::domain::feed::FeedError;
use crate::domain::stream::{CipherError, ResolveError, StreamManifest, VideoId};

/// 上游平台错误
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Upstream request failed: {0}")]
    UpstreamRequest(String),

    #[error("Upstream response could not be decoded: {0}")]
    UpstreamDecode(String),

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),
}

impl From<PlatformError> for ResolveError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::UpstreamRequest(msg) => ResolveError::UpstreamRequest(msg),
            PlatformError::UpstreamDecode(msg) => ResolveError::UpstreamDecode(msg),
            PlatformError::ChannelNotFound(msg) => ResolveError::UpstreamDecode(msg),
        }
    }
}

impl From<PlatformError> for FeedError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::UpstreamRequest(msg) => FeedError::UpstreamRequest(msg),
            PlatformError::UpstreamDecode(msg) => FeedError::UpstreamDecode(msg),
            PlatformError::ChannelNotFound(msg) => FeedError::ChannelNotFound(msg),
        }
    }
}

/// 视频流清单来源
#[async_trait]
pub trait VideoPlatformPort: Send + Sync {
    /// 获取视频的流清单（保持上游顺序）
    async fn decode_video(&self, video_id: &VideoId) -> Result<StreamManifest, PlatformError>;
}

/// 频道目录
#[async_trait]
pub trait ChannelDirectoryPort: Send + Sync {
    /// 获取频道元数据（maxResults=1），零结果返回 `ChannelNotFound`
    async fn fetch_channel(&self, channel_id: &ChannelId) -> Result<ChannelSnippet, PlatformError>;

    /// 列出频道视频，最新的在前
    async fn list_videos(&self, channel_id: &ChannelId) -> Result<Vec<VideoSummary>, PlatformError>;
}

/// 签名解密
#[async_trait]
pub trait DecipherPort: Send + Sync {
    /// 用视频 ID 和密文换取真实的流 URL
    async fn resolve(&self, video_id: &VideoId, cipher_token: &str) -> Result<String, CipherError>;
}
