//! Persistence Layer - 数据持久化
//!
//! SQLite 和 Sled 文档存储实现

pub mod sled;
pub mod sqlite;

pub use self::sled::SledDocumentStore;
pub use self::sqlite::SqliteDocumentStore;
