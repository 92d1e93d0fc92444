//! Track Query Handlers

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::application::error::ApplicationError;
use crate::application::ports::TtlCachePort;
use crate::application::queries::track_queries::{ResolveTrackQuery, ResolveTrackResponse};
use crate::application::services::StreamResolver;
use crate::application::single_flight::SingleFlight;
use crate::domain::stream::{ResolveError, VideoId};

/// 音轨缓存 key
pub fn track_cache_key(video_id: &VideoId) -> String {
    format!("track_{}", video_id)
}

/// ResolveTrack Handler - 缓存优先的音轨地址解析
///
/// 1. 查 TTL 缓存，命中直接返回
/// 2. 未命中则经 single-flight 解析（同一视频的并发请求只解析一次）
/// 3. 解析成功后写回缓存；写缓存失败只记录日志，不影响本次请求
pub struct ResolveTrackHandler {
    cache: Arc<dyn TtlCachePort>,
    resolver: Arc<StreamResolver>,
    in_flight: SingleFlight<Result<Url, ResolveError>>,
    ttl: Duration,
    deadline: Duration,
}

impl ResolveTrackHandler {
    pub fn new(
        cache: Arc<dyn TtlCachePort>,
        resolver: Arc<StreamResolver>,
        ttl: Duration,
        deadline: Duration,
    ) -> Self {
        Self {
            cache,
            resolver,
            in_flight: SingleFlight::new(),
            ttl,
            deadline,
        }
    }

    pub async fn handle(
        &self,
        query: ResolveTrackQuery,
    ) -> Result<ResolveTrackResponse, ApplicationError> {
        let video_id = VideoId::parse(query.video_id).map_err(ApplicationError::validation)?;
        let cache_key = track_cache_key(&video_id);

        match self.cache.get_key(&cache_key).await {
            Ok(value) => match Url::parse(&value) {
                Ok(url) => {
                    tracing::debug!(video_id = %video_id, "Track url served from cache");
                    return Ok(ResolveTrackResponse { url, cached: true });
                }
                Err(e) => {
                    tracing::warn!(
                        video_id = %video_id,
                        error = %e,
                        "Cached track url is malformed, resolving again"
                    );
                }
            },
            Err(e) if e.is_miss() => {
                tracing::debug!(video_id = %video_id, reason = %e, "Track cache miss");
            }
            Err(e) => {
                tracing::warn!(
                    video_id = %video_id,
                    error = %e,
                    "Track cache unavailable, resolving without cache"
                );
            }
        }

        let cache = self.cache.clone();
        let resolver = self.resolver.clone();
        let ttl = self.ttl;
        let deadline = self.deadline;
        let deadline_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX);
        let key = cache_key.clone();

        let url = self
            .in_flight
            .run(&cache_key, move || async move {
                let details = tokio::time::timeout(deadline, resolver.resolve(&video_id))
                    .await
                    .map_err(|_| ResolveError::DeadlineExceeded(deadline_ms))??;

                if let Err(e) = cache.set_key(&key, details.url.as_str(), ttl).await {
                    tracing::warn!(
                        video_id = %video_id,
                        error = %e,
                        "Failed to cache track url"
                    );
                }

                tracing::info!(
                    video_id = %video_id,
                    quality = %details.quality,
                    "Track url resolved"
                );
                Ok::<Url, ResolveError>(details.url)
            })
            .await?;

        Ok(ResolveTrackResponse { url, cached: false })
    }
}
