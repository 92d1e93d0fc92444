//! Stream Context - 流清单与音频流选择

use super::errors::ResolveError;
use super::value_objects::VideoId;

/// 上游声明的一个流变体
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateStream {
    /// 例如 `audio/mp4; codecs="mp4a.40.2"`
    pub mime_type: String,
    /// 可直接访问的 URL（可能为空）
    pub raw_url: String,
    /// 签名密文（可能为空）
    pub cipher_token: String,
    pub quality_label: String,
}

/// 可播放地址的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSource<'a> {
    Direct(&'a str),
    Ciphered(&'a str),
}

impl CandidateStream {
    pub fn is_audio(&self) -> bool {
        self.mime_type.starts_with("audio")
    }

    /// 确定获取可播放 URL 的方式
    ///
    /// raw_url 优先；两者都为空时返回 NoCipher
    pub fn source(&self, video_id: &VideoId) -> Result<StreamSource<'_>, ResolveError> {
        if !self.raw_url.is_empty() {
            Ok(StreamSource::Direct(&self.raw_url))
        } else if !self.cipher_token.is_empty() {
            Ok(StreamSource::Ciphered(&self.cipher_token))
        } else {
            Err(ResolveError::NoCipher(video_id.to_string()))
        }
    }
}

/// 单个视频的流清单，保持上游顺序
#[derive(Debug, Clone, Default)]
pub struct StreamManifest {
    streams: Vec<CandidateStream>,
}

impl StreamManifest {
    pub fn new(streams: Vec<CandidateStream>) -> Self {
        Self { streams }
    }

    pub fn streams(&self) -> &[CandidateStream] {
        &self.streams
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// 选择音频流
    ///
    /// 第一个 audio 类型的流优先；没有时退回清单中的第一个流
    pub fn select_audio_stream(&self, video_id: &VideoId) -> Result<&CandidateStream, ResolveError> {
        self.streams
            .iter()
            .find(|s| s.is_audio())
            .or_else(|| self.streams.first())
            .ok_or_else(|| ResolveError::NoAudioStream(video_id.to_string()))
    }
}
