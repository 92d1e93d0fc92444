//! 应用层错误定义
//!
//! 统一的查询错误类型

use thiserror::Error;

use crate::domain::feed::FeedError;
use crate::domain::stream::ResolveError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 验证错误（非法的视频/频道 ID 等）
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 音频流解析失败
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Feed 构建失败
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}
