//! Feed Context - 播客 Feed 限界上下文
//!
//! 职责:
//! - 由频道元数据构建 Feed
//! - 条目准入规则（标题与 enclosure URL 均非空）
//! - RSS 2.0 + iTunes 文档渲染

mod entities;
mod errors;
mod rss;

pub use entities::{Enclosure, Feed, FeedImage, FeedItem, ENCLOSURE_MIME_TYPE};
pub use errors::FeedError;
pub use rss::RSS_CONTENT_TYPE;
