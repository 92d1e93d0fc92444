//! 应用层 - 查询（读操作）
//!
//! 所有对外操作都是读：解析音轨地址、构建频道 Feed

mod feed_queries;
mod track_queries;

pub mod handlers;

pub use feed_queries::*;
pub use track_queries::*;
