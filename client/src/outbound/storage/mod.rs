//! Local storage adapters.

mod atomic;
mod file;
mod memory;

pub(crate) use atomic::write_atomic;
pub use file::FileStorage;
pub use memory::MemoryStorage;
