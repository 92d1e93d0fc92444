//! Channel Context - 频道限界上下文
//!
//! 职责:
//! - 频道 ID 校验与解析（支持频道 URL）
//! - 频道元数据、视频列表的值对象

mod value_objects;

pub use value_objects::{ChannelId, ChannelSnippet, VideoSummary, CHANNEL_BASE_URL, WATCH_BASE_URL};
