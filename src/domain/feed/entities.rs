//! Feed Context - Entities

use chrono::{DateTime, Utc};

use crate::domain::channel::{ChannelId, ChannelSnippet, VideoSummary};

/// enclosure 的媒体类型（track 路由总是以 mp3 名义暴露）
pub const ENCLOSURE_MIME_TYPE: &str = "audio/mpeg";

const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_CATEGORY: &str = "category";
const EXPLICIT_NO: &str = "no";

/// 频道图片
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedImage {
    pub url: String,
    pub title: String,
    pub link: String,
}

/// 条目媒体附件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
    pub length: u64,
    pub mime_type: String,
}

/// Feed 条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub guid: String,
    pub pub_date: DateTime<Utc>,
    pub enclosure: Enclosure,
    pub itunes_image: String,
    pub itunes_summary: String,
}

impl FeedItem {
    /// 由视频构建条目
    ///
    /// enclosure 指向本服务的 track 路由（懒解析：真正的上游解析在请求 track 时发生）
    pub fn from_video(video: &VideoSummary, public_base_url: &str) -> Self {
        let enclosure_url = if video.video_id.is_empty() {
            String::new()
        } else {
            format!(
                "{}/video/{}/track.mp3",
                public_base_url.trim_end_matches('/'),
                video.video_id
            )
        };

        Self {
            title: video.title.clone(),
            link: video.watch_url(),
            description: video.description.clone(),
            guid: video.video_id.clone(),
            pub_date: video.published_at,
            enclosure: Enclosure {
                url: enclosure_url,
                length: 0,
                mime_type: ENCLOSURE_MIME_TYPE.to_string(),
            },
            itunes_image: video.thumbnail_url.clone(),
            itunes_summary: video.description.clone(),
        }
    }

    pub fn is_publishable(&self) -> bool {
        !self.title.is_empty() && !self.enclosure.url.is_empty()
    }
}

/// 播客 Feed
///
/// 不变量:
/// - items 中每个条目的 title 与 enclosure.url 均非空
/// - last_build_date 与 pub_date 均取频道的 published_at，保证同一频道快照重复构建结果一致
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    pub channel_id: ChannelId,
    pub title: String,
    pub link: String,
    pub description: String,
    pub category: String,
    pub language: String,
    pub last_build_date: DateTime<Utc>,
    pub pub_date: DateTime<Utc>,
    pub image: FeedImage,
    pub itunes_author: String,
    pub itunes_subtitle: String,
    pub itunes_summary: String,
    pub itunes_image: String,
    pub itunes_explicit: String,
    items: Vec<FeedItem>,
}

impl Feed {
    /// 由频道元数据填充频道级字段
    pub fn from_snippet(channel_id: ChannelId, snippet: &ChannelSnippet) -> Self {
        let link = channel_id.page_url();
        Self {
            title: snippet.title.clone(),
            link: link.clone(),
            description: snippet.description.clone(),
            category: DEFAULT_CATEGORY.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            last_build_date: snippet.published_at,
            pub_date: snippet.published_at,
            image: FeedImage {
                url: snippet.thumbnail_url.clone(),
                title: snippet.title.clone(),
                link,
            },
            itunes_author: snippet.custom_url.clone(),
            itunes_subtitle: snippet.title.clone(),
            itunes_summary: snippet.description.clone(),
            itunes_image: snippet.thumbnail_url.clone(),
            itunes_explicit: EXPLICIT_NO.to_string(),
            channel_id,
            items: Vec::new(),
        }
    }

    /// 添加条目，不满足准入规则的条目被静默丢弃
    ///
    /// 返回是否被接受
    pub fn add_item(&mut self, item: FeedItem) -> bool {
        if !item.is_publishable() {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }
}
