//! Stream Context - Value Objects

use serde::{Deserialize, Serialize};
use url::Url;

/// 视频 ID 最大长度
const MAX_VIDEO_ID_LEN: usize = 64;

/// 视频唯一标识（上游平台分配，例如 `ulCdoCfw-bY`）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoId(String);

impl VideoId {
    /// 校验并创建视频 ID
    ///
    /// 只允许 `[A-Za-z0-9_-]`，防止拼接进上游 URL 时产生注入
    pub fn parse(raw: impl Into<String>) -> Result<Self, &'static str> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err("video id cannot be empty");
        }
        if raw.len() > MAX_VIDEO_ID_LEN {
            return Err("video id is too long");
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err("video id contains invalid characters");
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 解析后的可直接访问的音频地址
///
/// 每次解析新建，不持久化（只有 URL 字符串会被调用方缓存）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDetails {
    pub url: Url,
    pub quality: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_accepts_platform_ids() {
        let id = VideoId::parse("ulCdoCfw-bY").unwrap();
        assert_eq!(id.as_str(), "ulCdoCfw-bY");
        assert_eq!(id.to_string(), "ulCdoCfw-bY");
    }

    #[test]
    fn test_video_id_rejects_bad_input() {
        assert!(VideoId::parse("").is_err());
        assert!(VideoId::parse("../etc/passwd").is_err());
        assert!(VideoId::parse("a b").is_err());
        assert!(VideoId::parse("x".repeat(65)).is_err());
    }
}
