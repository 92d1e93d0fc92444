//! 应用服务 - 跨端口的核心流程

mod feed_builder;
mod stream_resolver;

pub use feed_builder::FeedBuilder;
pub use stream_resolver::StreamResolver;
