pub mod base_storage;
pub mod file_storage;
pub mod memory_storage;

pub use base_storage::KeyValueStorage;
pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;
