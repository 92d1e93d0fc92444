//! HTTP Decipher Client - 签名密文 → 可播放 URL
//!
//! 实现 DecipherPort：
//! 1. 抓取 `{site}/embed/{videoId}`，找到播放器脚本地址 (`"jsUrl":"..."`)
//! 2. 下载播放器脚本，提取签名变换序列
//! 3. 对密文中的签名执行变换并拼回流 URL
//!
//! 每次调用新建 HTTP 客户端，不复用连接

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;

use crate::application::ports::DecipherPort;
use crate::domain::stream::{CipherError, CipherProgram, SignatureCipher, VideoId};

const JS_URL_PATTERN: &str = r#""jsUrl":"([^"]+)""#;

/// 解密客户端配置
#[derive(Debug, Clone)]
pub struct DecipherConfig {
    /// 站点根地址（不含结尾 `/`）
    pub site_url: String,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub tls_handshake_timeout_secs: u64,
    pub expect_continue_timeout_secs: u64,
}

impl Default for DecipherConfig {
    fn default() -> Self {
        Self {
            site_url: "https://www.youtube.com".to_string(),
            connect_timeout_secs: 30,
            idle_timeout_secs: 60,
            tls_handshake_timeout_secs: 10,
            expect_continue_timeout_secs: 1,
        }
    }
}

impl DecipherConfig {
    /// 单个请求的总时限
    ///
    /// reqwest 没有独立的 TLS 握手时限，握手预算并入连接时限之后的总时限
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs + self.tls_handshake_timeout_secs)
    }
}

/// 从 embed 页面提取播放器脚本地址
fn extract_player_url(embed_page: &str, site_url: &str) -> Result<String, CipherError> {
    let re = Regex::new(JS_URL_PATTERN).map_err(|e| CipherError::PlayerScript(e.to_string()))?;
    let path = re
        .captures(embed_page)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().replace("\\/", "/"))
        .ok_or_else(|| CipherError::PlayerScript("player script url not found".to_string()))?;

    if path.starts_with("http://") || path.starts_with("https://") {
        Ok(path)
    } else if let Some(rest) = path.strip_prefix("//") {
        Ok(format!("https://{}", rest))
    } else {
        Ok(format!("{}{}", site_url, path))
    }
}

/// HTTP 解密客户端
pub struct HttpDecipherClient {
    config: DecipherConfig,
}

impl HttpDecipherClient {
    pub fn new(config: DecipherConfig) -> Self {
        Self { config }
    }

    fn build_client(&self) -> Result<Client, CipherError> {
        Client::builder()
            .connect_timeout(Duration::from_secs(self.config.connect_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(self.config.idle_timeout_secs))
            .tcp_keepalive(Duration::from_secs(self.config.connect_timeout_secs))
            .timeout(self.config.request_timeout())
            .build()
            .map_err(|e| CipherError::Transport(e.to_string()))
    }

    async fn fetch_text(client: &Client, url: &str) -> Result<String, CipherError> {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| CipherError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CipherError::Transport(format!("{} returned HTTP {}", url, status)));
        }

        response
            .text()
            .await
            .map_err(|e| CipherError::Transport(e.to_string()))
    }
}

#[async_trait]
impl DecipherPort for HttpDecipherClient {
    async fn resolve(&self, video_id: &VideoId, cipher_token: &str) -> Result<String, CipherError> {
        let cipher = SignatureCipher::parse(cipher_token)?;
        let client = self.build_client()?;

        let embed_url = format!("{}/embed/{}", self.config.site_url, video_id);
        let embed_page = Self::fetch_text(&client, &embed_url).await?;
        let player_url = extract_player_url(&embed_page, &self.config.site_url)?;

        tracing::debug!(video_id = %video_id, player_url = %player_url, "Fetching player script");
        let script = Self::fetch_text(&client, &player_url).await?;

        let program = CipherProgram::from_player_script(&script)?;
        let url = cipher.to_url(&program)?;

        tracing::debug!(
            video_id = %video_id,
            operations = program.operations().len(),
            "Signature deciphered"
        );
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = "https://www.youtube.com";

    #[test]
    fn test_extract_relative_player_url() {
        let page = r#"<script>ytcfg.set({"jsUrl":"\/s\/player\/3a1b\/player_ias.vflset\/en_US\/base.js","x":1})</script>"#;
        assert_eq!(
            extract_player_url(page, SITE).unwrap(),
            "https://www.youtube.com/s/player/3a1b/player_ias.vflset/en_US/base.js"
        );
    }

    #[test]
    fn test_extract_absolute_player_url() {
        let page = r#"{"jsUrl":"https://cdn.example/base.js"}"#;
        assert_eq!(
            extract_player_url(page, SITE).unwrap(),
            "https://cdn.example/base.js"
        );

        let page = r#"{"jsUrl":"//cdn.example/base.js"}"#;
        assert_eq!(
            extract_player_url(page, SITE).unwrap(),
            "https://cdn.example/base.js"
        );
    }

    #[test]
    fn test_missing_player_url() {
        let err = extract_player_url("<html></html>", SITE).unwrap_err();
        assert!(matches!(err, CipherError::PlayerScript(_)));
    }

    #[test]
    fn test_default_timeouts() {
        let config = DecipherConfig::default();
        assert_eq!(config.connect_timeout_secs, 30);
        assert_eq!(config.idle_timeout_secs, 60);
        assert_eq!(config.request_timeout(), Duration::from_secs(40));
    }

    #[tokio::test]
    async fn test_invalid_token_fails_before_network() {
        let client = HttpDecipherClient::new(DecipherConfig {
            site_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        });
        let video_id = VideoId::parse("ulCdoCfw-bY").unwrap();

        let err = client.resolve(&video_id, "sp=sig").await.unwrap_err();
        assert!(matches!(err, CipherError::InvalidToken(_)));
    }
}
