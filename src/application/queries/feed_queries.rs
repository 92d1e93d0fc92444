//! Feed Queries - 频道播客 Feed 查询

/// 获取频道 Feed 查询
#[derive(Debug, Clone)]
pub struct GetChannelFeedQuery {
    pub channel_id: String,
}

/// 获取频道 Feed 响应
#[derive(Debug, Clone)]
pub struct GetChannelFeedResponse {
    /// RSS XML 文档
    pub body: String,
    pub content_type: &'static str,
    pub item_count: usize,
}
