//! DocQA Store - Index persistence ports and adapters
//!
//! This crate defines the index storage port and provides a file-backed
//! adapter plus an in-memory adapter for tests.

pub mod file;
pub mod memory;
pub mod ports;

pub use file::FileIndexStore;
pub use memory::MemoryIndexStore;
pub use ports::{validate_index_name, IndexStore, PersistedIndex, INDEX_FORMAT_VERSION};
