//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;
use crate::domain::feed::FeedError;
use crate::domain::stream::ResolveError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义（与 HTTP 状态码一致）
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const BAD_GATEWAY: i32 = 502;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
    pub const GATEWAY_TIMEOUT: i32 = 504;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    /// 永久性失败：没有可用的流、频道不存在
    NotFound(String),
    BadRequest(String),
    /// 上游返回了无法理解的内容
    BadGateway(String),
    /// 上游不可达
    ServiceUnavailable(String),
    GatewayTimeout(String),
    Internal(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, i32, &str) {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, errno::NOT_FOUND, msg.as_str()),
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, errno::BAD_REQUEST, msg.as_str())
            }
            ApiError::BadGateway(msg) => {
                (StatusCode::BAD_GATEWAY, errno::BAD_GATEWAY, msg.as_str())
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                errno::SERVICE_UNAVAILABLE,
                msg.as_str(),
            ),
            ApiError::GatewayTimeout(msg) => (
                StatusCode::GATEWAY_TIMEOUT,
                errno::GATEWAY_TIMEOUT,
                msg.as_str(),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                errno::INTERNAL_ERROR,
                msg.as_str(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, msg) = self.parts();

        if status.is_server_error() {
            tracing::error!(errno = code, error = %msg, "Request failed upstream");
        } else {
            tracing::warn!(errno = code, error = %msg, "Request rejected");
        }

        (status, Json(ErrorResponse::new(code, msg))).into_response()
    }
}

impl From<ResolveError> for ApiError {
    fn from(e: ResolveError) -> Self {
        let msg = e.to_string();
        match e {
            ResolveError::NoAudioStream(_) | ResolveError::NoCipher(_) => ApiError::NotFound(msg),
            ResolveError::UpstreamDecode(_)
            | ResolveError::Decipher(_)
            | ResolveError::MalformedUrl(_) => ApiError::BadGateway(msg),
            ResolveError::UpstreamRequest(_) => ApiError::ServiceUnavailable(msg),
            ResolveError::DeadlineExceeded(_) => ApiError::GatewayTimeout(msg),
        }
    }
}

impl From<FeedError> for ApiError {
    fn from(e: FeedError) -> Self {
        let msg = e.to_string();
        match e {
            FeedError::ChannelNotFound(_) => ApiError::NotFound(msg),
            FeedError::UpstreamDecode(_) => ApiError::BadGateway(msg),
            FeedError::UpstreamRequest(_) => ApiError::ServiceUnavailable(msg),
            FeedError::Render(_) => ApiError::Internal(msg),
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::Resolve(e) => e.into(),
            ApplicationError::Feed(e) => e.into(),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_resolve_error_statuses() {
        assert_eq!(
            status_of(ResolveError::NoAudioStream("v".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_of(ResolveError::NoCipher("v".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(ResolveError::Decipher("v".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(ResolveError::UpstreamRequest("v".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(ResolveError::DeadlineExceeded(20_000)),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn test_application_error_statuses() {
        assert_eq!(
            status_of(ApplicationError::validation("bad id")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApplicationError::from(FeedError::ChannelNotFound("UC".into()))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApplicationError::internal("boom")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
