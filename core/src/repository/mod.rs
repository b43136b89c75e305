pub mod file;
pub mod memory;
pub mod traits;

// Re-export
pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;
