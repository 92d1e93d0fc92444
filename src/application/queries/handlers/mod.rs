//! Query Handlers 实现
//!
//! 所有 QueryHandler 的具体实现

mod feed_handlers;
mod track_handlers;

pub use feed_handlers::*;
pub use track_handlers::*;
