//! `rolesync-core` — identifiers and error primitives shared by every crate.
//!
//! No IO, no logging: only the vocabulary other crates build on.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{RoleId, TenantId, UserId};
