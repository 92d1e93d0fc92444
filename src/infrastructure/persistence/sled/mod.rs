//! Sled Persistence - 嵌入式 KV 文档存储

mod document_store;

pub use document_store::SledDocumentStore;
