//! YouTube Adapter - 上游视频平台客户端
//!
//! - data_api: 频道元数据与视频列表（Data API v3）
//! - watch_page: 视频流清单（观看页面内嵌的 player response）
//! - decipher: 签名解密（embed 页面 + 播放器脚本）

mod data_api;
mod decipher;
mod watch_page;

pub use data_api::{YouTubeDataApiClient, YouTubeDataApiConfig};
pub use decipher::{DecipherConfig, HttpDecipherClient};
pub use watch_page::{WatchPageConfig, YouTubeWatchPageClient};
