//! Feed Builder - 频道元数据 + 条目 → Feed

use std::sync::Arc;

use crate::application::ports::ChannelDirectoryPort;
use crate::domain::channel::{ChannelId, ChannelSnippet};
use crate::domain::feed::{Feed, FeedError, FeedItem};

pub struct FeedBuilder {
    directory: Arc<dyn ChannelDirectoryPort>,
}

impl FeedBuilder {
    pub fn new(directory: Arc<dyn ChannelDirectoryPort>) -> Self {
        Self { directory }
    }

    /// 构建 Feed
    ///
    /// 频道元数据每次实时获取；不合格条目被跳过，空条目列表也是合法输出
    pub async fn build_feed(
        &self,
        channel_id: &ChannelId,
        items: Vec<FeedItem>,
    ) -> Result<Feed, FeedError> {
        let snippet = self
            .directory
            .fetch_channel(channel_id)
            .await
            .map_err(FeedError::from)?;

        Ok(Self::assemble(channel_id, &snippet, items))
    }

    /// 用已获取的频道元数据组装 Feed
    pub fn assemble(channel_id: &ChannelId, snippet: &ChannelSnippet, items: Vec<FeedItem>) -> Feed {
        let mut feed = Feed::from_snippet(channel_id.clone(), snippet);

        let total = items.len();
        let mut accepted = 0;
        for item in items {
            if feed.add_item(item) {
                accepted += 1;
            }
        }

        if accepted < total {
            tracing::debug!(
                channel_id = %channel_id,
                dropped = total - accepted,
                "Skipped feed items without title or enclosure"
            );
        }

        tracing::debug!(
            channel_id = %channel_id,
            items = accepted,
            "Feed built"
        );

        feed
    }
}
