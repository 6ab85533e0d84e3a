use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use rolesync_core::{DomainError, DomainResult};

use crate::Permission;

/// Role name as known to the directory.
///
/// Roles are opaque strings at this layer; which permissions a role grants is
/// decided by the binding store, not by the role itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Role(Cow<'static, str>);

impl Role {
    /// Build a role from a trusted name (literals, values read back from a directory).
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Build a role from untrusted input, rejecting blank names.
    pub fn parse(name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("role name cannot be empty"));
        }
        Ok(Self(Cow::Owned(name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Role {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.0.into_owned()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One exported role: its name and the permissions bound to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    name: Role,
    #[serde(default)]
    permissions: Vec<Permission>,
}

impl RoleRecord {
    pub fn new(name: Role) -> Self {
        Self {
            name,
            permissions: Vec::new(),
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }

    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions.extend(permissions);
        self
    }

    pub fn name(&self) -> &Role {
        &self.name
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_role_names_are_rejected() {
        assert!(Role::parse("").is_err());
        assert!(Role::parse("   ").is_err());
        assert_eq!(Role::parse("Power User").unwrap().as_str(), "Power User");
    }

    #[test]
    fn role_record_defaults_to_no_permissions() {
        let record: RoleRecord = serde_json::from_str(r#"{ "name": "ADMIN" }"#).unwrap();
        assert_eq!(record.name().as_str(), "ADMIN");
        assert!(record.permissions().is_empty());
    }

    #[test]
    fn role_record_keeps_permission_order() {
        let record = RoleRecord::new(Role::new("Report Author"))
            .with_permission(Permission::new("repository.read"))
            .with_permission(Permission::new("repository.create"));

        let names: Vec<&str> = record.permissions().iter().map(|p| p.as_str()).collect();
        assert_eq!(names, ["repository.read", "repository.create"]);
    }

    #[test]
    fn deserializing_a_blank_role_fails() {
        let result: Result<RoleRecord, _> = serde_json::from_str(r#"{ "name": "" }"#);
        assert!(result.is_err());
    }
}
