//! Per-record outcomes and the summary of an import run.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use thiserror::Error;

use rolesync_auth::{DirectoryError, Role, Username};
use rolesync_core::{RoleId, TenantId, UserId};

/// Directory call a record failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    CreateUser,
    SetUserRoles,
    SetPassword,
    CreateRole,
    SetRoleBindings,
}

impl core::fmt::Display for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Stage::CreateUser => "create_user",
            Stage::SetUserRoles => "set_user_roles",
            Stage::SetPassword => "set_password",
            Stage::CreateRole => "create_role",
            Stage::SetRoleBindings => "set_role_bindings",
        };
        f.write_str(name)
    }
}

/// Unrecovered failure of a single record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{stage} failed: {source}")]
pub struct RecordError {
    pub stage: Stage,
    pub source: DirectoryError,
}

impl RecordError {
    pub fn new(stage: Stage, source: DirectoryError) -> Self {
        Self { stage, source }
    }
}

/// What happened to one user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserOutcome {
    Created(UserId),
    /// Already existed; roles and password were re-applied.
    Updated,
    /// Already existed and was left untouched.
    Skipped,
}

/// What happened to one role record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleOutcome {
    /// Created, then bound to its permissions.
    Created(RoleId),
    /// Already existed.
    Existing { bindings_applied: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    User,
    Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    pub kind: RecordKind,
    pub name: String,
    pub stage: Stage,
    #[serde(serialize_with = "display")]
    pub error: DirectoryError,
}

fn display<S: Serializer>(error: &DirectoryError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Summary of one import run.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub tenant_id: TenantId,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub users_created: usize,
    pub users_updated: usize,
    pub users_skipped: usize,
    pub roles_created: usize,
    pub roles_existing: usize,
    pub bindings_applied: usize,
    pub failures: Vec<RecordFailure>,
}

impl ImportReport {
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            started_at: Utc::now(),
            finished_at: None,
            users_created: 0,
            users_updated: 0,
            users_skipped: 0,
            roles_created: 0,
            roles_existing: 0,
            bindings_applied: 0,
            failures: Vec::new(),
        }
    }

    pub fn record_user(&mut self, username: &Username, result: &Result<UserOutcome, RecordError>) {
        match result {
            Ok(UserOutcome::Created(_)) => self.users_created += 1,
            Ok(UserOutcome::Updated) => self.users_updated += 1,
            Ok(UserOutcome::Skipped) => self.users_skipped += 1,
            Err(err) => self.push_failure(RecordKind::User, username.as_str(), err),
        }
    }

    pub fn record_role(&mut self, role: &Role, result: &Result<RoleOutcome, RecordError>) {
        match result {
            Ok(RoleOutcome::Created(_)) => {
                self.roles_created += 1;
                self.bindings_applied += 1;
            }
            Ok(RoleOutcome::Existing { bindings_applied }) => {
                self.roles_existing += 1;
                if *bindings_applied {
                    self.bindings_applied += 1;
                }
            }
            Err(err) => self.push_failure(RecordKind::Role, role.as_str(), err),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// True when no record failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    fn push_failure(&mut self, kind: RecordKind, name: &str, err: &RecordError) {
        self.failures.push(RecordFailure {
            kind,
            name: name.to_string(),
            stage: err.stage,
            error: err.source.clone(),
        });
    }
}
