//! Domain Layer - 领域层
//!
//! 包含三个限界上下文:
//! - Stream Context: 视频音频流选择与签名解密
//! - Channel Context: 频道与视频元数据
//! - Feed Context: 播客 Feed 构建与渲染

pub mod channel;
pub mod feed;
pub mod stream;
