//! Stream Context - 音频流解析限界上下文
//!
//! 职责:
//! - 视频 ID 校验
//! - 从上游清单中挑选音频流
//! - 签名解密（播放器脚本变换程序）

mod cipher;
mod errors;
mod manifest;
mod value_objects;

pub use cipher::{CipherOperation, CipherProgram, SignatureCipher};
pub use errors::{CipherError, ResolveError};
pub use manifest::{CandidateStream, StreamManifest, StreamSource};
pub use value_objects::{StreamDetails, VideoId};
