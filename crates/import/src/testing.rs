//! Recording directory double for reconciler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use rolesync_auth::{
    DirectoryError, DirectoryResult, Password, Permission, Role, RoleBindingStore,
    UserRoleDirectory, Username,
};
use rolesync_core::{RoleId, TenantId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateUser {
        username: String,
        password: String,
        roles: Vec<String>,
    },
    SetUserRoles {
        username: String,
        roles: Vec<String>,
    },
    SetPassword {
        username: String,
        password: String,
    },
    CreateRole {
        role: String,
        description: Option<String>,
        members: Vec<String>,
    },
    SetRoleBindings {
        role: String,
        permissions: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    CreateUser,
    SetUserRoles,
    SetPassword,
    CreateRole,
    SetRoleBindings,
}

/// Records every call and answers with scripted failures, success otherwise.
#[derive(Default)]
pub struct RecordingDirectory {
    calls: Mutex<Vec<(TenantId, Call)>>,
    failures: Mutex<HashMap<(Op, String), DirectoryError>>,
}

impl RecordingDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `op` on the entity called `name` fail with `error`.
    pub fn fail(&self, op: Op, name: &str, error: DirectoryError) {
        self.failures
            .lock()
            .unwrap()
            .insert((op, name.to_string()), error);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn tenants(&self) -> Vec<TenantId> {
        self.calls.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| matches(c)).count()
    }

    fn answer(&self, tenant_id: TenantId, op: Op, name: &str, call: Call) -> DirectoryResult<()> {
        self.calls.lock().unwrap().push((tenant_id, call));
        match self.failures.lock().unwrap().get(&(op, name.to_string())) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn strings<T: ToString>(items: &[T]) -> Vec<String> {
    items.iter().map(|i| i.to_string()).collect()
}

impl UserRoleDirectory for RecordingDirectory {
    fn create_user(
        &self,
        tenant_id: TenantId,
        username: &Username,
        password: &Password,
        roles: &[Role],
    ) -> DirectoryResult<UserId> {
        let call = Call::CreateUser {
            username: username.to_string(),
            password: password.expose().to_string(),
            roles: strings(roles),
        };
        self.answer(tenant_id, Op::CreateUser, username.as_str(), call)
            .map(|()| UserId::new())
    }

    fn set_user_roles(
        &self,
        tenant_id: TenantId,
        username: &Username,
        roles: &[Role],
    ) -> DirectoryResult<()> {
        let call = Call::SetUserRoles {
            username: username.to_string(),
            roles: strings(roles),
        };
        self.answer(tenant_id, Op::SetUserRoles, username.as_str(), call)
    }

    fn set_password(
        &self,
        tenant_id: TenantId,
        username: &Username,
        password: &Password,
    ) -> DirectoryResult<()> {
        let call = Call::SetPassword {
            username: username.to_string(),
            password: password.expose().to_string(),
        };
        self.answer(tenant_id, Op::SetPassword, username.as_str(), call)
    }

    fn create_role(
        &self,
        tenant_id: TenantId,
        role: &Role,
        description: Option<&str>,
        members: &[Username],
    ) -> DirectoryResult<RoleId> {
        let call = Call::CreateRole {
            role: role.to_string(),
            description: description.map(str::to_string),
            members: strings(members),
        };
        self.answer(tenant_id, Op::CreateRole, role.as_str(), call)
            .map(|()| RoleId::new())
    }
}

impl RoleBindingStore for RecordingDirectory {
    fn set_role_bindings(
        &self,
        tenant_id: TenantId,
        role: &Role,
        permissions: &[Permission],
    ) -> DirectoryResult<()> {
        let call = Call::SetRoleBindings {
            role: role.to_string(),
            permissions: strings(permissions),
        };
        self.answer(tenant_id, Op::SetRoleBindings, role.as_str(), call)
    }
}
