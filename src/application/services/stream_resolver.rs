//! Stream Resolver - 视频 ID → 可直接播放的音频 URL
//!
//! 严格顺序：获取清单 → 选择音频流 → (必要时) 解密 → 解析 URL。
//! 本层不重试，任何一步失败立即返回，绝不返回部分结果。

use std::sync::Arc;

use url::Url;

use crate::application::ports::{DecipherPort, VideoPlatformPort};
use crate::domain::stream::{ResolveError, StreamDetails, StreamSource, VideoId};

pub struct StreamResolver {
    platform: Arc<dyn VideoPlatformPort>,
    decipher: Arc<dyn DecipherPort>,
}

impl StreamResolver {
    pub fn new(platform: Arc<dyn VideoPlatformPort>, decipher: Arc<dyn DecipherPort>) -> Self {
        Self { platform, decipher }
    }

    pub async fn resolve(&self, video_id: &VideoId) -> Result<StreamDetails, ResolveError> {
        let manifest = self.platform.decode_video(video_id).await?;

        let stream = manifest.select_audio_stream(video_id)?;
        tracing::debug!(
            video_id = %video_id,
            candidates = manifest.streams().len(),
            mime_type = %stream.mime_type,
            quality = %stream.quality_label,
            "Audio stream selected"
        );

        let raw_url = match stream.source(video_id)? {
            StreamSource::Direct(url) => url.to_string(),
            StreamSource::Ciphered(token) => {
                tracing::debug!(video_id = %video_id, "Stream url is ciphered, deciphering");
                self.decipher.resolve(video_id, token).await?
            }
        };

        let url = Url::parse(&raw_url)
            .map_err(|e| ResolveError::MalformedUrl(format!("{}: {}", video_id, e)))?;

        Ok(StreamDetails {
            url,
            quality: stream.quality_label.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{
        audio_stream, video_stream, StaticDecipher, StaticVideoPlatform,
    };

    fn video_id() -> VideoId {
        VideoId::parse("ulCdoCfw-bY").unwrap()
    }

    fn resolver(platform: StaticVideoPlatform, decipher: StaticDecipher) -> StreamResolver {
        StreamResolver::new(Arc::new(platform), Arc::new(decipher))
    }

    #[tokio::test]
    async fn test_resolve_picks_audio_stream() {
        let platform = StaticVideoPlatform::with_streams(vec![
            video_stream("http://video.example/v"),
            audio_stream("http://x", ""),
        ]);
        let details = resolver(platform, StaticDecipher::default())
            .resolve(&video_id())
            .await
            .unwrap();

        assert_eq!(details.url.as_str(), "http://x/");
        assert_eq!(details.quality, "AUDIO_QUALITY_MEDIUM");
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_first_stream() {
        let platform =
            StaticVideoPlatform::with_streams(vec![video_stream("http://video.example/only")]);
        let details = resolver(platform, StaticDecipher::default())
            .resolve(&video_id())
            .await
            .unwrap();

        assert_eq!(details.url.as_str(), "http://video.example/only");
    }

    #[tokio::test]
    async fn test_resolve_empty_manifest() {
        let err = resolver(StaticVideoPlatform::default(), StaticDecipher::default())
            .resolve(&video_id())
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::NoAudioStream("ulCdoCfw-bY".to_string()));
    }

    #[tokio::test]
    async fn test_resolve_without_url_or_cipher() {
        let platform = StaticVideoPlatform::with_streams(vec![audio_stream("", "")]);
        let err = resolver(platform, StaticDecipher::default())
            .resolve(&video_id())
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::NoCipher("ulCdoCfw-bY".to_string()));
    }

    #[tokio::test]
    async fn test_resolve_deciphers_token() {
        let platform = StaticVideoPlatform::with_streams(vec![audio_stream("", "s=abc&url=x")]);
        let decipher = Arc::new(StaticDecipher::returning(
            "https://media.example/playback?sig=cba",
        ));
        let resolver = StreamResolver::new(Arc::new(platform), decipher.clone());

        let details = resolver.resolve(&video_id()).await.unwrap();

        assert_eq!(details.url.as_str(), "https://media.example/playback?sig=cba");
        assert_eq!(*decipher.tokens.lock().unwrap(), vec!["s=abc&url=x".to_string()]);
    }

    #[tokio::test]
    async fn test_resolve_decipher_failure() {
        let platform = StaticVideoPlatform::with_streams(vec![audio_stream("", "s=abc&url=x")]);
        let err = resolver(platform, StaticDecipher::default())
            .resolve(&video_id())
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Decipher(_)));
    }

    #[tokio::test]
    async fn test_resolve_malformed_url() {
        let platform = StaticVideoPlatform::with_streams(vec![audio_stream("not a url", "")]);
        let err = resolver(platform, StaticDecipher::default())
            .resolve(&video_id())
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::MalformedUrl(_)));
    }

    #[tokio::test]
    async fn test_resolve_upstream_decode_failure() {
        let err = resolver(
            StaticVideoPlatform::failing("video unavailable in your country"),
            StaticDecipher::default(),
        )
        .resolve(&video_id())
        .await
        .unwrap_err();
        assert!(matches!(err, ResolveError::UpstreamDecode(_)));
    }
}
