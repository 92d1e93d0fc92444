//! Track Queries - 音轨地址查询

use url::Url;

/// 解析视频音轨查询
#[derive(Debug, Clone)]
pub struct ResolveTrackQuery {
    pub video_id: String,
}

/// 解析视频音轨响应
#[derive(Debug, Clone)]
pub struct ResolveTrackResponse {
    pub url: Url,
    /// 是否命中缓存
    pub cached: bool,
}
