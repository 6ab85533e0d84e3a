//! Directory adapters.

pub mod in_memory;

pub use in_memory::{DirectoryOperation, DirectoryRole, DirectoryUser, InMemoryDirectory};
