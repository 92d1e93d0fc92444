//! YouTube Watch Page Client - 视频流清单
//!
//! 实现 VideoPlatformPort：抓取观看页面，提取内嵌的 `ytInitialPlayerResponse` JSON，
//! 按 formats → adaptiveFormats 的顺序生成候选流

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{PlatformError, VideoPlatformPort};
use crate::domain::stream::{CandidateStream, StreamManifest, VideoId};

const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse";

/// 观看页面客户端配置
#[derive(Debug, Clone)]
pub struct WatchPageConfig {
    /// 站点根地址（不含结尾 `/`）
    pub site_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for WatchPageConfig {
    fn default() -> Self {
        Self {
            site_url: "https://www.youtube.com".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    #[serde(default)]
    playability_status: Option<PlayabilityStatus>,
    #[serde(default)]
    streaming_data: Option<StreamingData>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamingData {
    #[serde(default)]
    formats: Vec<Format>,
    #[serde(default)]
    adaptive_formats: Vec<Format>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Format {
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    signature_cipher: Option<String>,
    #[serde(default)]
    cipher: Option<String>,
    #[serde(default)]
    quality_label: Option<String>,
    #[serde(default)]
    audio_quality: Option<String>,
    #[serde(default)]
    quality: Option<String>,
}

impl From<Format> for CandidateStream {
    fn from(format: Format) -> Self {
        CandidateStream {
            mime_type: format.mime_type,
            raw_url: format.url.unwrap_or_default(),
            cipher_token: format
                .signature_cipher
                .or(format.cipher)
                .unwrap_or_default(),
            quality_label: format
                .quality_label
                .or(format.audio_quality)
                .or(format.quality)
                .unwrap_or_default(),
        }
    }
}

/// 截取页面中 `ytInitialPlayerResponse = {...}` 的 JSON 对象
///
/// 只接受 `marker = {` 形式的赋值（允许空白），跳过 `window["..."]=null` 之类的引用；
/// 按括号深度匹配，跳过字符串字面量内的括号
fn extract_player_response(page: &str) -> Option<&str> {
    page.match_indices(PLAYER_RESPONSE_MARKER)
        .find_map(|(at, _)| {
            let rest = &page[at + PLAYER_RESPONSE_MARKER.len()..];
            let value = rest.trim_start().strip_prefix('=')?.trim_start();
            value.starts_with('{').then_some(value)
        })
        .and_then(balanced_object)
}

/// 截取以 `{` 开头的完整 JSON 对象
fn balanced_object(body: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in body.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&body[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// 页面 → 流清单
fn manifest_from_page(page: &str, video_id: &VideoId) -> Result<StreamManifest, PlatformError> {
    let json = extract_player_response(page).ok_or_else(|| {
        PlatformError::UpstreamDecode(format!("{}: player response not found", video_id))
    })?;

    let player: PlayerResponse = serde_json::from_str(json)
        .map_err(|e| PlatformError::UpstreamDecode(format!("{}: {}", video_id, e)))?;

    if let Some(status) = &player.playability_status {
        if status.status != "OK" {
            return Err(PlatformError::UpstreamDecode(format!(
                "{}: {} ({})",
                video_id,
                status.status,
                status.reason.as_deref().unwrap_or("no reason given")
            )));
        }
    }

    let streaming = player.streaming_data.ok_or_else(|| {
        PlatformError::UpstreamDecode(format!("{}: streaming data missing", video_id))
    })?;

    let streams = streaming
        .formats
        .into_iter()
        .chain(streaming.adaptive_formats)
        .map(CandidateStream::from)
        .collect();

    Ok(StreamManifest::new(streams))
}

/// 观看页面客户端
pub struct YouTubeWatchPageClient {
    client: Client,
    config: WatchPageConfig,
}

impl YouTubeWatchPageClient {
    pub fn new(config: WatchPageConfig) -> Result<Self, PlatformError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PlatformError::UpstreamRequest(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn watch_url(&self, video_id: &VideoId) -> String {
        format!("{}/watch?v={}", self.config.site_url, video_id)
    }
}

#[async_trait]
impl VideoPlatformPort for YouTubeWatchPageClient {
    async fn decode_video(&self, video_id: &VideoId) -> Result<StreamManifest, PlatformError> {
        let url = self.watch_url(video_id);
        tracing::debug!(video_id = %video_id, url = %url, "Fetching watch page");

        let response = self
            .client
            .get(&url)
            .header("Accept-Language", "en-US,en;q=0.8")
            .send()
            .await
            .map_err(|e| PlatformError::UpstreamRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::UpstreamRequest(format!(
                "{}: watch page returned HTTP {}",
                video_id, status
            )));
        }

        let page = response
            .text()
            .await
            .map_err(|e| PlatformError::UpstreamRequest(e.to_string()))?;

        let manifest = manifest_from_page(&page, video_id)?;
        tracing::debug!(
            video_id = %video_id,
            streams = manifest.streams().len(),
            "Stream manifest decoded"
        );
        Ok(manifest)
    }
}
