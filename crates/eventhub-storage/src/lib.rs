//! EventHub storage — `StateStore` backends.
//!
//! `InMemoryStateStore` keeps blobs for the lifetime of the process;
//! `JsonFileStateStore` writes one JSON document per key into a directory,
//! replacing files atomically.

pub mod error;
pub mod json_file;
pub mod memory;

pub use error::StorageError;
pub use json_file::JsonFileStateStore;
pub use memory::InMemoryStateStore;
