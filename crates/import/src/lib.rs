//! `rolesync-import` — idempotent bulk import of users and roles.
//!
//! Users are created or updated first; the roles they declare are collected
//! into a [`RoleMembershipIndex`] that seeds the members of each created role.
//! Every role then gets its permission bindings applied, new or not.

pub mod batch;
pub mod config;
pub mod error;
pub mod handler;
pub mod membership;
pub mod report;
pub mod roles;
pub mod users;

#[cfg(test)]
mod testing;

pub use batch::ImportBatch;
pub use config::ImportConfig;
pub use error::ImportError;
pub use handler::ImportHandler;
pub use membership::{RoleMembershipIndex, build_index};
pub use report::{
    ImportReport, RecordError, RecordFailure, RecordKind, RoleOutcome, Stage, UserOutcome,
};
pub use roles::RoleReconciler;
pub use users::UserReconciler;
