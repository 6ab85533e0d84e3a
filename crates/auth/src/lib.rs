//! `rolesync-auth` — identity vocabulary and directory contracts.
//!
//! This crate is intentionally decoupled from storage and transport: it names
//! what a directory must do, never how.

pub mod directory;
pub mod password;
pub mod permissions;
pub mod roles;
pub mod user;

pub use directory::{
    CreateOutcome, DirectoryError, DirectoryResult, RoleBindingStore, UserRoleDirectory,
};
pub use password::Password;
pub use permissions::Permission;
pub use roles::{Role, RoleRecord};
pub use user::{UserRecord, Username};
