//! Key-value store implementations.

pub mod atomic_json;
pub mod json_file;
pub mod memory;

pub use atomic_json::AtomicJsonFile;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
