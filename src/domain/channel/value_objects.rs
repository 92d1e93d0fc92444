//! Channel Context - Value Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 频道页面前缀
pub const CHANNEL_BASE_URL: &str = "https://www.youtube.com/channel/";

/// 视频观看页面前缀
pub const WATCH_BASE_URL: &str = "https://www.youtube.com/watch?v=";

const MAX_CHANNEL_ID_LEN: usize = 64;

/// 频道唯一标识（例如 `UC_x5XG1OV2P6uZZ5FSM9Ttw`）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn parse(raw: impl Into<String>) -> Result<Self, &'static str> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err("channel id cannot be empty");
        }
        if raw.len() > MAX_CHANNEL_ID_LEN {
            return Err("channel id is too long");
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err("channel id contains invalid characters");
        }
        Ok(Self(raw))
    }

    /// 从用户输入解析频道 ID
    ///
    /// 接受裸 ID 或 `https://www.youtube.com/channel/<id>[/...]` 形式的 URL
    pub fn from_user_input(input: &str) -> Result<Self, &'static str> {
        let input = input.trim();
        match input.find("/channel/") {
            Some(pos) => {
                let rest = &input[pos + "/channel/".len()..];
                let id = rest
                    .split(|c| c == '/' || c == '?' || c == '#')
                    .next()
                    .unwrap_or_default();
                Self::parse(id)
            }
            None => Self::parse(input),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 频道页面 URL
    pub fn page_url(&self) -> String {
        format!("{}{}", CHANNEL_BASE_URL, self.0)
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 频道元数据
///
/// 每次构建 feed 时重新获取，不缓存
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSnippet {
    pub title: String,
    pub description: String,
    pub custom_url: String,
    pub published_at: DateTime<Utc>,
    pub thumbnail_url: String,
    pub country: String,
}

/// 频道中的单个视频
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSummary {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    pub thumbnail_url: String,
}

impl VideoSummary {
    pub fn watch_url(&self) -> String {
        format!("{}{}", WATCH_BASE_URL, self.video_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_id_from_raw_id() {
        let id = ChannelId::from_user_input("  UC_x5XG1OV2P6uZZ5FSM9Ttw ").unwrap();
        assert_eq!(id.as_str(), "UC_x5XG1OV2P6uZZ5FSM9Ttw");
    }

    #[test]
    fn test_channel_id_from_url() {
        let id =
            ChannelId::from_user_input("https://www.youtube.com/channel/UCabc-123/videos?view=0")
                .unwrap();
        assert_eq!(id.as_str(), "UCabc-123");
        assert_eq!(id.page_url(), "https://www.youtube.com/channel/UCabc-123");
    }

    #[test]
    fn test_channel_id_rejects_garbage() {
        assert!(ChannelId::from_user_input("").is_err());
        assert!(ChannelId::from_user_input("https://www.youtube.com/channel/").is_err());
        assert!(ChannelId::from_user_input("https://example.com/user/foo").is_err());
    }
}
