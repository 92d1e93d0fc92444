//! Memory Layer - In-Memory Document Store
//!
//! 实现 DocumentStorePort，供开发环境和测试使用

mod document_store;

pub use document_store::InMemoryDocumentStore;
