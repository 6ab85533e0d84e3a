//! In-memory directory and binding store for tests/dev.

use std::sync::Mutex;

use rolesync_auth::{
    DirectoryError, DirectoryResult, Password, Permission, Role, RoleBindingStore,
    UserRoleDirectory, Username,
};
use rolesync_core::{RoleId, TenantId, UserId};

use crate::read_model::{InMemoryTenantStore, TenantStore};

/// A user as the directory holds it.
#[derive(Debug, Clone)]
pub struct DirectoryUser {
    pub id: UserId,
    pub username: Username,
    pub roles: Vec<Role>,
    password: Password,
}

/// A role as the directory holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRole {
    pub id: RoleId,
    pub name: Role,
    pub description: Option<String>,
    pub members: Vec<Username>,
}

/// Operations that can be made to fail on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectoryOperation {
    CreateUser,
    SetUserRoles,
    SetPassword,
    CreateRole,
    SetRoleBindings,
}

/// Tenant-isolated directory backed by [`InMemoryTenantStore`]s.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: InMemoryTenantStore<Username, DirectoryUser>,
    roles: InMemoryTenantStore<Role, DirectoryRole>,
    bindings: InMemoryTenantStore<Role, Vec<Permission>>,
    injected: Mutex<Vec<(DirectoryOperation, DirectoryError)>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next call of `operation` with `error`. Queued failures fire in order.
    pub fn fail_next(&self, operation: DirectoryOperation, error: DirectoryError) {
        if let Ok(mut injected) = self.injected.lock() {
            injected.push((operation, error));
        }
    }

    pub fn user(&self, tenant_id: TenantId, username: &Username) -> Option<DirectoryUser> {
        self.users.get(tenant_id, username)
    }

    pub fn users(&self, tenant_id: TenantId) -> Vec<DirectoryUser> {
        self.users.list(tenant_id)
    }

    pub fn role(&self, tenant_id: TenantId, role: &Role) -> Option<DirectoryRole> {
        self.roles.get(tenant_id, role)
    }

    pub fn roles(&self, tenant_id: TenantId) -> Vec<DirectoryRole> {
        self.roles.list(tenant_id)
    }

    pub fn role_bindings(&self, tenant_id: TenantId, role: &Role) -> Option<Vec<Permission>> {
        self.bindings.get(tenant_id, role)
    }

    pub fn verify_password(&self, tenant_id: TenantId, username: &Username, candidate: &str) -> bool {
        self.users
            .get(tenant_id, username)
            .is_some_and(|user| user.password.expose() == candidate)
    }

    /// Forget every user, role and binding of a tenant.
    pub fn clear_tenant(&self, tenant_id: TenantId) {
        self.users.clear_tenant(tenant_id);
        self.roles.clear_tenant(tenant_id);
        self.bindings.clear_tenant(tenant_id);
    }

    fn check(&self, operation: DirectoryOperation) -> DirectoryResult<()> {
        let Ok(mut injected) = self.injected.lock() else {
            return Err(DirectoryError::unavailable("directory lock poisoned"));
        };
        match injected.iter().position(|(op, _)| *op == operation) {
            Some(pos) => Err(injected.remove(pos).1),
            None => Ok(()),
        }
    }
}

impl UserRoleDirectory for InMemoryDirectory {
    fn create_user(
        &self,
        tenant_id: TenantId,
        username: &Username,
        password: &Password,
        roles: &[Role],
    ) -> DirectoryResult<UserId> {
        self.check(DirectoryOperation::CreateUser)?;

        let user = DirectoryUser {
            id: UserId::new(),
            username: username.clone(),
            roles: roles.to_vec(),
            password: password.clone(),
        };
        let id = user.id;
        if !self.users.insert_if_absent(tenant_id, username.clone(), user) {
            return Err(DirectoryError::already_exists(format!("user '{username}'")));
        }
        Ok(id)
    }

    fn set_user_roles(
        &self,
        tenant_id: TenantId,
        username: &Username,
        roles: &[Role],
    ) -> DirectoryResult<()> {
        self.check(DirectoryOperation::SetUserRoles)?;

        let found = self
            .users
            .modify(tenant_id, username, &mut |user: &mut DirectoryUser| {
                user.roles = roles.to_vec()
            });
        if found {
            Ok(())
        } else {
            Err(DirectoryError::not_found(format!("user '{username}'")))
        }
    }

    fn set_password(
        &self,
        tenant_id: TenantId,
        username: &Username,
        password: &Password,
    ) -> DirectoryResult<()> {
        self.check(DirectoryOperation::SetPassword)?;

        let found = self
            .users
            .modify(tenant_id, username, &mut |user: &mut DirectoryUser| {
                user.password = password.clone()
            });
        if found {
            Ok(())
        } else {
            Err(DirectoryError::not_found(format!("user '{username}'")))
        }
    }

    fn create_role(
        &self,
        tenant_id: TenantId,
        role: &Role,
        description: Option<&str>,
        members: &[Username],
    ) -> DirectoryResult<RoleId> {
        self.check(DirectoryOperation::CreateRole)?;

        let record = DirectoryRole {
            id: RoleId::new(),
            name: role.clone(),
            description: description.map(str::to_string),
            members: members.to_vec(),
        };
        let id = record.id;
        if !self.roles.insert_if_absent(tenant_id, role.clone(), record) {
            return Err(DirectoryError::already_exists(format!("role '{role}'")));
        }
        Ok(id)
    }
}

impl RoleBindingStore for InMemoryDirectory {
    fn set_role_bindings(
        &self,
        tenant_id: TenantId,
        role: &Role,
        permissions: &[Permission],
    ) -> DirectoryResult<()> {
        self.check(DirectoryOperation::SetRoleBindings)?;
        self.bindings.upsert(tenant_id, role.clone(), permissions.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn username(name: &str) -> Username {
        Username::parse(name).unwrap()
    }

    #[test]
    fn second_create_user_conflicts() {
        let directory = InMemoryDirectory::new();
        let tenant = TenantId::new();
        let admin = username("admin");

        directory
            .create_user(tenant, &admin, &Password::new("pw"), &[Role::new("ADMIN")])
            .unwrap();
        let err = directory
            .create_user(tenant, &admin, &Password::new("other"), &[])
            .unwrap_err();

        assert!(err.is_already_exists());
        assert!(directory.verify_password(tenant, &admin, "pw"));
    }

    #[test]
    fn updates_require_an_existing_user() {
        let directory = InMemoryDirectory::new();
        let err = directory
            .set_password(TenantId::new(), &username("ghost"), &Password::new("pw"))
            .unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound(_)));
    }

    #[test]
    fn same_role_name_in_two_tenants() {
        let directory = InMemoryDirectory::new();
        let (a, b) = (TenantId::new(), TenantId::new());
        let role = Role::new("ADMIN");

        directory.create_role(a, &role, None, &[]).unwrap();
        directory.create_role(b, &role, Some("b"), &[username("root")]).unwrap();

        assert!(directory.role(a, &role).unwrap().members.is_empty());
        assert_eq!(directory.role(b, &role).unwrap().description.as_deref(), Some("b"));
    }

    #[test]
    fn injected_failures_fire_once_in_order() {
        let directory = InMemoryDirectory::new();
        let tenant = TenantId::new();
        let role = Role::new("ADMIN");
        directory.fail_next(
            DirectoryOperation::SetRoleBindings,
            DirectoryError::unavailable("first"),
        );

        let err = directory.set_role_bindings(tenant, &role, &[]).unwrap_err();
        assert_eq!(err, DirectoryError::Unavailable("first".to_string()));
        directory.set_role_bindings(tenant, &role, &[]).unwrap();
        assert_eq!(directory.role_bindings(tenant, &role), Some(vec![]));
    }

    #[test]
    fn clear_tenant_forgets_everything() {
        let directory = InMemoryDirectory::new();
        let tenant = TenantId::new();
        let role = Role::new("ADMIN");
        directory
            .create_user(tenant, &username("admin"), &Password::new("pw"), &[role.clone()])
            .unwrap();
        directory.create_role(tenant, &role, None, &[]).unwrap();
        directory
            .set_role_bindings(tenant, &role, &[Permission::new("repository.admin")])
            .unwrap();

        directory.clear_tenant(tenant);

        assert!(directory.users(tenant).is_empty());
        assert!(directory.roles(tenant).is_empty());
        assert_eq!(directory.role_bindings(tenant, &role), None);
    }
}
