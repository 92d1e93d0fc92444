//! 测试用的端口实现（不发起任何网络请求）

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::application::ports::{
    ChannelDirectoryPort, DecipherPort, PlatformError, VideoPlatformPort,
};
use crate::domain::channel::{ChannelId, ChannelSnippet, VideoSummary};
use crate::domain::stream::{CandidateStream, CipherError, StreamManifest, VideoId};

/// 固定返回一份清单的视频平台
#[derive(Default)]
pub struct StaticVideoPlatform {
    pub streams: Vec<CandidateStream>,
    pub failure: Option<String>,
    pub delay_ms: u64,
    calls: AtomicUsize,
}

impl StaticVideoPlatform {
    pub fn with_streams(streams: Vec<CandidateStream>) -> Self {
        Self {
            streams,
            ..Default::default()
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoPlatformPort for StaticVideoPlatform {
    async fn decode_video(&self, _video_id: &VideoId) -> Result<StreamManifest, PlatformError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }
        match &self.failure {
            Some(reason) => Err(PlatformError::UpstreamDecode(reason.clone())),
            None => Ok(StreamManifest::new(self.streams.clone())),
        }
    }
}

/// 固定返回一个 URL 的解密器，并记录收到的密文
#[derive(Default)]
pub struct StaticDecipher {
    pub url: Option<String>,
    pub tokens: Mutex<Vec<String>>,
}

impl StaticDecipher {
    pub fn returning(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl DecipherPort for StaticDecipher {
    async fn resolve(&self, _video_id: &VideoId, cipher_token: &str) -> Result<String, CipherError> {
        if let Ok(mut tokens) = self.tokens.lock() {
            tokens.push(cipher_token.to_string());
        }
        self.url
            .clone()
            .ok_or_else(|| CipherError::Transport("player script unreachable".to_string()))
    }
}

/// 固定频道目录；snippet 为 None 时模拟零结果
#[derive(Default)]
pub struct StaticChannelDirectory {
    pub snippet: Option<ChannelSnippet>,
    pub videos: Vec<VideoSummary>,
    pub search_fails: bool,
    list_calls: AtomicUsize,
}

impl StaticChannelDirectory {
    pub fn with_channel(videos: Vec<VideoSummary>) -> Self {
        Self {
            snippet: Some(sample_snippet()),
            videos,
            ..Default::default()
        }
    }

    /// 频道不存在且 search 接口不可用
    pub fn failing_search() -> Self {
        Self {
            search_fails: true,
            ..Default::default()
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChannelDirectoryPort for StaticChannelDirectory {
    async fn fetch_channel(&self, channel_id: &ChannelId) -> Result<ChannelSnippet, PlatformError> {
        self.snippet
            .clone()
            .ok_or_else(|| PlatformError::ChannelNotFound(channel_id.to_string()))
    }

    async fn list_videos(&self, _channel_id: &ChannelId) -> Result<Vec<VideoSummary>, PlatformError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.search_fails {
            return Err(PlatformError::UpstreamRequest("search unavailable".to_string()));
        }
        Ok(self.videos.clone())
    }
}

pub fn sample_snippet() -> ChannelSnippet {
    ChannelSnippet {
        title: "Sample Channel".to_string(),
        description: "Sample description".to_string(),
        custom_url: "samplechannel".to_string(),
        published_at: Utc.with_ymd_and_hms(2016, 5, 4, 12, 0, 0).unwrap(),
        thumbnail_url: "https://img.example/sample.jpg".to_string(),
        country: "US".to_string(),
    }
}

pub fn sample_video(video_id: &str, title: &str) -> VideoSummary {
    VideoSummary {
        video_id: video_id.to_string(),
        title: title.to_string(),
        description: format!("{} description", title),
        published_at: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
        thumbnail_url: String::new(),
    }
}

pub fn audio_stream(raw_url: &str, cipher_token: &str) -> CandidateStream {
    CandidateStream {
        mime_type: "audio/mp4; codecs=\"mp4a.40.2\"".to_string(),
        raw_url: raw_url.to_string(),
        cipher_token: cipher_token.to_string(),
        quality_label: "AUDIO_QUALITY_MEDIUM".to_string(),
    }
}

pub fn video_stream(raw_url: &str) -> CandidateStream {
    CandidateStream {
        mime_type: "video/mp4; codecs=\"avc1.42001E\"".to_string(),
        raw_url: raw_url.to_string(),
        cipher_token: String::new(),
        quality_label: "360p".to_string(),
    }
}
