//! Contracts the import runs against.
//!
//! A directory persists users and roles; a binding store persists which
//! permissions a role grants. Both are tenant-scoped and synchronous: every
//! call is one blocking round trip. Implementations are injected by the caller.

use std::sync::Arc;

use thiserror::Error;

use rolesync_core::{RoleId, TenantId, UserId};

use crate::{Password, Permission, Role, Username};

pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Failure reported by a directory or binding store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The user or role being created is already present.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The caller may not perform this operation in this tenant.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The directory rejected the values it was given.
    #[error("rejected by directory: {0}")]
    Validation(String),

    /// Transport or backend failure.
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

impl DirectoryError {
    pub fn already_exists(what: impl Into<String>) -> Self {
        Self::AlreadyExists(what.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }
}

/// Classification of a create call.
///
/// `AlreadyExists` is the one failure the import recovers from locally, so it
/// gets its own variant instead of travelling as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome<Id> {
    Created(Id),
    Conflict(String),
    Failed(DirectoryError),
}

impl<Id> From<DirectoryResult<Id>> for CreateOutcome<Id> {
    fn from(result: DirectoryResult<Id>) -> Self {
        match result {
            Ok(id) => Self::Created(id),
            Err(DirectoryError::AlreadyExists(what)) => Self::Conflict(what),
            Err(other) => Self::Failed(other),
        }
    }
}

/// User and role persistence.
pub trait UserRoleDirectory: Send + Sync {
    /// Create a user holding `roles`. Fails with `AlreadyExists` if the name is taken.
    fn create_user(
        &self,
        tenant_id: TenantId,
        username: &Username,
        password: &Password,
        roles: &[Role],
    ) -> DirectoryResult<UserId>;

    /// Replace the role list of an existing user.
    fn set_user_roles(
        &self,
        tenant_id: TenantId,
        username: &Username,
        roles: &[Role],
    ) -> DirectoryResult<()>;

    /// Replace the password of an existing user.
    fn set_password(
        &self,
        tenant_id: TenantId,
        username: &Username,
        password: &Password,
    ) -> DirectoryResult<()>;

    /// Create a role with initial members. Fails with `AlreadyExists` if the name is taken.
    fn create_role(
        &self,
        tenant_id: TenantId,
        role: &Role,
        description: Option<&str>,
        members: &[Username],
    ) -> DirectoryResult<RoleId>;
}

/// Role → permission bindings.
pub trait RoleBindingStore: Send + Sync {
    /// Replace the permissions bound to `role`.
    fn set_role_bindings(
        &self,
        tenant_id: TenantId,
        role: &Role,
        permissions: &[Permission],
    ) -> DirectoryResult<()>;
}

impl<S> UserRoleDirectory for Arc<S>
where
    S: UserRoleDirectory + ?Sized,
{
    fn create_user(
        &self,
        tenant_id: TenantId,
        username: &Username,
        password: &Password,
        roles: &[Role],
    ) -> DirectoryResult<UserId> {
        (**self).create_user(tenant_id, username, password, roles)
    }

    fn set_user_roles(
        &self,
        tenant_id: TenantId,
        username: &Username,
        roles: &[Role],
    ) -> DirectoryResult<()> {
        (**self).set_user_roles(tenant_id, username, roles)
    }

    fn set_password(
        &self,
        tenant_id: TenantId,
        username: &Username,
        password: &Password,
    ) -> DirectoryResult<()> {
        (**self).set_password(tenant_id, username, password)
    }

    fn create_role(
        &self,
        tenant_id: TenantId,
        role: &Role,
        description: Option<&str>,
        members: &[Username],
    ) -> DirectoryResult<RoleId> {
        (**self).create_role(tenant_id, role, description, members)
    }
}

impl<S> RoleBindingStore for Arc<S>
where
    S: RoleBindingStore + ?Sized,
{
    fn set_role_bindings(
        &self,
        tenant_id: TenantId,
        role: &Role,
        permissions: &[Permission],
    ) -> DirectoryResult<()> {
        (**self).set_role_bindings(tenant_id, role, permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_exists_becomes_conflict() {
        let outcome: CreateOutcome<UserId> =
            Err(DirectoryError::already_exists("user 'admin'")).into();
        assert_eq!(outcome, CreateOutcome::Conflict("user 'admin'".to_string()));
    }

    #[test]
    fn other_failures_stay_failures() {
        let outcome: CreateOutcome<RoleId> = Err(DirectoryError::unavailable("timeout")).into();
        assert_eq!(
            outcome,
            CreateOutcome::Failed(DirectoryError::Unavailable("timeout".to_string()))
        );
    }

    #[test]
    fn success_carries_the_id() {
        let id = RoleId::new();
        let outcome: CreateOutcome<RoleId> = Ok(id).into();
        assert_eq!(outcome, CreateOutcome::Created(id));
    }
}
