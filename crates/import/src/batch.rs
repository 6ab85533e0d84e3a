//! Parsed export payload.

use std::io::Read;

use serde::Deserialize;

use rolesync_auth::{RoleRecord, UserRecord};

use crate::ImportError;

/// Users and roles staged for one import run.
///
/// ```json
/// {
///   "users": [{ "username": "admin", "roles": ["Administrator"], "password": "pw" }],
///   "roles": [{ "name": "Administrator", "permissions": ["repository.admin"] }]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportBatch {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub roles: Vec<RoleRecord>,
}

impl ImportBatch {
    pub fn new(users: Vec<UserRecord>, roles: Vec<RoleRecord>) -> Self {
        Self { users, roles }
    }

    pub fn from_json(payload: &str) -> Result<Self, ImportError> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ImportError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.roles.is_empty()
    }
}
