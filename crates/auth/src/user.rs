//! User identity values and the exported user record.

use serde::{Deserialize, Serialize};

use rolesync_core::{DomainError, DomainResult};

use crate::{Password, Role};

/// Login name of a user, unique within a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Build a username, rejecting blank input.
    ///
    /// Surrounding whitespace is kept: directories treat "admin" and " admin"
    /// as different accounts and the import must not merge them.
    pub fn parse(name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("username cannot be empty"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for Username {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl core::fmt::Display for Username {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One exported user.
///
/// Roles keep declaration order and duplicates: both are passed to the
/// directory exactly as exported.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    username: Username,
    #[serde(default)]
    roles: Vec<Role>,
    password: Password,
}

impl UserRecord {
    pub fn new(username: Username, password: Password) -> Self {
        Self {
            username,
            roles: Vec::new(),
            password,
        }
    }

    /// Declare membership in one more role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles.extend(roles);
        self
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}
