//! Root Handlers
//!
//! - GET  /  服务说明
//! - POST /  表单提交频道 ID 或频道 URL，重定向到对应 Feed
//! - GET  /api/ping  健康检查

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    Form, Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::channel::ChannelId;
use crate::infrastructure::http::error::ApiError;

/// 服务说明
#[derive(Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub feed: &'static str,
    pub track: &'static str,
}

pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        feed: "/feed/channel/{channelId}",
        track: "/video/{videoId}/track.mp3",
    })
}

#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
}

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse { status: "ok" })
}

#[derive(Debug, Deserialize)]
pub struct ChannelForm {
    #[serde(default)]
    pub channel: String,
}

/// 频道表单提交 → 302 到 Feed 地址
pub async fn submit_channel(Form(form): Form<ChannelForm>) -> Result<impl IntoResponse, ApiError> {
    let channel_id = ChannelId::from_user_input(&form.channel)
        .map_err(|e| ApiError::BadRequest(format!("invalid channel: {}", e)))?;

    let location = format!("/feed/channel/{}", channel_id);
    tracing::debug!(channel_id = %channel_id, location = %location, "Channel submitted");

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}
