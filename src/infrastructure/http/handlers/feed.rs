//! Feed Handler

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::GetChannelFeedQuery;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// GET/HEAD /feed/channel/:channel_id
pub async fn channel_feed(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .get_channel_feed_handler
        .handle(GetChannelFeedQuery { channel_id })
        .await?;

    Ok(([(header::CONTENT_TYPE, result.content_type)], result.body))
}
