//! Stream Context - Errors

use thiserror::Error;

/// 音频流解析错误
///
/// 需要 Clone：同一视频的并发请求共享一次解析结果（single-flight）
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Upstream response could not be decoded: {0}")]
    UpstreamDecode(String),

    #[error("Upstream request failed: {0}")]
    UpstreamRequest(String),

    #[error("No audio stream available for video {0}")]
    NoAudioStream(String),

    #[error("Stream has neither url nor cipher for video {0}")]
    NoCipher(String),

    #[error("Decipher failed: {0}")]
    Decipher(String),

    #[error("Malformed stream url: {0}")]
    MalformedUrl(String),

    #[error("Resolution deadline exceeded after {0}ms")]
    DeadlineExceeded(u64),
}

/// 签名解密错误
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("Player script request failed: {0}")]
    Transport(String),

    #[error("Invalid cipher token: {0}")]
    InvalidToken(String),

    #[error("Player script not understood: {0}")]
    PlayerScript(String),

    #[error("Deciphered url is malformed: {0}")]
    InvalidUrl(String),
}

impl From<CipherError> for ResolveError {
    fn from(err: CipherError) -> Self {
        ResolveError::Decipher(err.to_string())
    }
}
