//! Track Handler
//!
//! GET/HEAD /video/:video_id/track.mp3 → 302 到解析出的媒体地址

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::ResolveTrackQuery;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub async fn track(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .resolve_track_handler
        .handle(ResolveTrackQuery { video_id })
        .await?;

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, result.url.to_string())],
    ))
}
