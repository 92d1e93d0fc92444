//! Feed Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::ChannelDirectoryPort;
use crate::application::queries::feed_queries::{GetChannelFeedQuery, GetChannelFeedResponse};
use crate::application::services::FeedBuilder;
use crate::application::single_flight::SingleFlight;
use crate::domain::channel::ChannelId;
use crate::domain::feed::{FeedError, FeedItem, RSS_CONTENT_TYPE};

/// 渲染完成的 Feed（single-flight 共享结果）
#[derive(Debug, Clone)]
struct RenderedFeed {
    body: Arc<String>,
    item_count: usize,
}

/// GetChannelFeed Handler - 构建频道播客 Feed
///
/// Feed 每次请求实时构建（不缓存），同一频道的并发请求合并为一次上游查询
pub struct GetChannelFeedHandler {
    directory: Arc<dyn ChannelDirectoryPort>,
    in_flight: SingleFlight<Result<RenderedFeed, FeedError>>,
    public_base_url: String,
}

impl GetChannelFeedHandler {
    pub fn new(directory: Arc<dyn ChannelDirectoryPort>, public_base_url: impl Into<String>) -> Self {
        Self {
            directory,
            in_flight: SingleFlight::new(),
            public_base_url: public_base_url.into(),
        }
    }

    pub async fn handle(
        &self,
        query: GetChannelFeedQuery,
    ) -> Result<GetChannelFeedResponse, ApplicationError> {
        let channel_id =
            ChannelId::parse(query.channel_id).map_err(ApplicationError::validation)?;

        let directory = self.directory.clone();
        let base_url = self.public_base_url.clone();
        let key = channel_id.to_string();

        let rendered = self
            .in_flight
            .run(&key, move || async move {
                // 先查频道：未知频道不再消耗 search 配额
                let snippet = directory.fetch_channel(&channel_id).await?;
                let videos = directory.list_videos(&channel_id).await?;
                let items = videos
                    .iter()
                    .map(|video| FeedItem::from_video(video, &base_url))
                    .collect();

                let feed = FeedBuilder::assemble(&channel_id, &snippet, items);
                let body = feed.to_rss()?;

                tracing::info!(
                    channel_id = %channel_id,
                    items = feed.items().len(),
                    bytes = body.len(),
                    "Feed rendered"
                );

                Ok::<RenderedFeed, FeedError>(RenderedFeed {
                    body: Arc::new(body),
                    item_count: feed.items().len(),
                })
            })
            .await?;

        Ok(GetChannelFeedResponse {
            body: rendered.body.as_ref().clone(),
            content_type: RSS_CONTENT_TYPE,
            item_count: rendered.item_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{sample_video, StaticChannelDirectory};

    fn query() -> GetChannelFeedQuery {
        GetChannelFeedQuery {
            channel_id: "UCsample".to_string(),
        }
    }

    #[tokio::test]
    async fn test_feed_contains_publishable_videos() {
        let directory = StaticChannelDirectory::with_channel(vec![
            sample_video("vid1", "First"),
            sample_video("vid2", ""),
            sample_video("vid3", "Third"),
        ]);
        let handler = GetChannelFeedHandler::new(Arc::new(directory), "http://pod.example");

        let response = handler.handle(query()).await.unwrap();

        assert_eq!(response.item_count, 2);
        assert_eq!(response.content_type, RSS_CONTENT_TYPE);
        assert!(response
            .body
            .contains(r#"url="http://pod.example/video/vid1/track.mp3""#));
        assert!(!response.body.contains("vid2/track.mp3"));
    }

    #[tokio::test]
    async fn test_unknown_channel_produces_no_feed() {
        let directory = Arc::new(StaticChannelDirectory::default());
        let handler = GetChannelFeedHandler::new(directory.clone(), "http://x");

        let err = handler.handle(query()).await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Feed(FeedError::ChannelNotFound(_))
        ));
        assert_eq!(directory.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_channel_wins_over_search_failure() {
        let directory = Arc::new(StaticChannelDirectory::failing_search());
        let handler = GetChannelFeedHandler::new(directory.clone(), "http://x");

        let err = handler.handle(query()).await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Feed(FeedError::ChannelNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_channel_id() {
        let handler =
            GetChannelFeedHandler::new(Arc::new(StaticChannelDirectory::default()), "http://x");
        let err = handler
            .handle(GetChannelFeedQuery {
                channel_id: "not/valid".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }
}
