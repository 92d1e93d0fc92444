//! Feed Context - Errors

use thiserror::Error;

/// Feed 构建错误
///
/// 需要 Clone：同一频道的并发请求共享一次构建结果
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeedError {
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("Upstream request failed: {0}")]
    UpstreamRequest(String),

    #[error("Upstream response could not be decoded: {0}")]
    UpstreamDecode(String),

    #[error("Feed rendering failed: {0}")]
    Render(String),
}
