//! Infrastructure layer: directory adapters and tenant-isolated storage.

pub mod directory;
pub mod read_model;


pub use directory::InMemoryDirectory;
