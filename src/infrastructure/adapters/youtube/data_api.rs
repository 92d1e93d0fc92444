//! YouTube Data API Client - 频道元数据与视频列表
//!
//! 实现 ChannelDirectoryPort
//!
//! - GET {api_url}channels?part=snippet&id=<id>&maxResults=1&key=<key>
//! - GET {api_url}search?part=snippet&channelId=<id>&order=date&type=video&maxResults=<n>&key=<key>

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{ChannelDirectoryPort, PlatformError};
use crate::domain::channel::{ChannelId, ChannelSnippet, VideoSummary};

/// Data API 客户端配置
#[derive(Debug, Clone)]
pub struct YouTubeDataApiConfig {
    /// API 基础 URL（以 `/` 结尾）
    pub api_url: String,
    pub api_key: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 视频列表条数上限
    pub max_results: u32,
}

impl Default for YouTubeDataApiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://www.googleapis.com/youtube/v3/".to_string(),
            api_key: String::new(),
            timeout_secs: 15,
            max_results: 50,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    snippet: ChannelItemSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItemSnippet {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    custom_url: String,
    published_at: DateTime<Utc>,
    #[serde(default)]
    thumbnails: Thumbnails,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl Thumbnails {
    fn high_url(&self) -> String {
        self.high
            .as_ref()
            .map(|t| t.url.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

/// 单条搜索结果；字段缺失的条目在转换时跳过，不让整个列表解码失败
#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: SearchItemId,
    #[serde(default)]
    snippet: Option<SearchItemSnippet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemSnippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

fn snippet_from_response(
    response: ChannelListResponse,
    channel_id: &ChannelId,
) -> Result<ChannelSnippet, PlatformError> {
    let item = response
        .items
        .into_iter()
        .next()
        .ok_or_else(|| PlatformError::ChannelNotFound(channel_id.to_string()))?;

    let snippet = item.snippet;
    Ok(ChannelSnippet {
        thumbnail_url: snippet.thumbnails.high_url(),
        title: snippet.title,
        description: snippet.description,
        custom_url: snippet.custom_url,
        published_at: snippet.published_at,
        country: snippet.country,
    })
}

fn videos_from_response(response: SearchResponse) -> Vec<VideoSummary> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            let video_id = item.id.video_id.filter(|id| !id.is_empty())?;
            let Some(snippet) = item.snippet else {
                tracing::warn!(video_id = %video_id, "Search item without snippet skipped");
                return None;
            };
            let published_at = snippet
                .published_at
                .as_deref()
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                .map(|at| at.with_timezone(&Utc));
            let Some(published_at) = published_at else {
                tracing::warn!(video_id = %video_id, "Search item without valid publishedAt skipped");
                return None;
            };
            Some(VideoSummary {
                video_id,
                thumbnail_url: snippet.thumbnails.high_url(),
                title: snippet.title,
                description: snippet.description,
                published_at,
            })
        })
        .collect()
}

/// YouTube Data API 客户端
pub struct YouTubeDataApiClient {
    client: Client,
    config: YouTubeDataApiConfig,
}

impl YouTubeDataApiClient {
    pub fn new(config: YouTubeDataApiConfig) -> Result<Self, PlatformError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PlatformError::UpstreamRequest(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}{}", self.config.api_url, resource)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, String)],
    ) -> Result<T, PlatformError> {
        let url = self.endpoint(resource);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PlatformError::UpstreamRequest(format!("{} timed out", resource))
                } else {
                    PlatformError::UpstreamRequest(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PlatformError::UpstreamRequest(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PlatformError::UpstreamDecode(e.to_string()))
    }
}

#[async_trait]
impl ChannelDirectoryPort for YouTubeDataApiClient {
    async fn fetch_channel(&self, channel_id: &ChannelId) -> Result<ChannelSnippet, PlatformError> {
        let query = [
            ("part", "snippet".to_string()),
            ("id", channel_id.to_string()),
            ("maxResults", "1".to_string()),
        ];

        let response: ChannelListResponse =
            self.get_json("channels", &query).await.map_err(|e| {
                tracing::error!(channel_id = %channel_id, error = %e, "Channel lookup failed");
                e
            })?;

        let snippet = snippet_from_response(response, channel_id)?;
        tracing::debug!(channel_id = %channel_id, title = %snippet.title, "Channel fetched");
        Ok(snippet)
    }

    async fn list_videos(&self, channel_id: &ChannelId) -> Result<Vec<VideoSummary>, PlatformError> {
        let query = [
            ("part", "snippet".to_string()),
            ("channelId", channel_id.to_string()),
            ("order", "date".to_string()),
            ("type", "video".to_string()),
            ("maxResults", self.config.max_results.to_string()),
        ];

        let response: SearchResponse = self.get_json("search", &query).await.map_err(|e| {
            tracing::error!(channel_id = %channel_id, error = %e, "Video search failed");
            e
        })?;

        let videos = videos_from_response(response);
        tracing::debug!(channel_id = %channel_id, count = videos.len(), "Videos listed");
        Ok(videos)
    }
}
