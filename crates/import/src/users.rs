//! User reconciliation: create, or bring an existing user in line with the export.

use tracing::{debug, info, warn};

use rolesync_auth::{CreateOutcome, UserRecord, UserRoleDirectory};
use rolesync_core::TenantId;

use crate::membership::RoleMembershipIndex;
use crate::report::{ImportReport, RecordError, Stage, UserOutcome};

/// Creates users, falling back to an explicit update when the name is taken.
pub struct UserReconciler<D> {
    directory: D,
    overwrite_existing: bool,
}

impl<D> UserReconciler<D>
where
    D: UserRoleDirectory,
{
    pub fn new(directory: D) -> Self {
        Self {
            directory,
            overwrite_existing: true,
        }
    }

    pub fn with_overwrite_existing(mut self, overwrite: bool) -> Self {
        self.overwrite_existing = overwrite;
        self
    }

    /// Reconcile a single user.
    ///
    /// A successful create already carries the password and roles, so nothing
    /// else is sent. On conflict the roles are set first, then the password; if
    /// setting the roles fails the password is left alone.
    pub fn reconcile(
        &self,
        tenant_id: TenantId,
        user: &UserRecord,
    ) -> Result<UserOutcome, RecordError> {
        let username = user.username();
        let created = self
            .directory
            .create_user(tenant_id, username, user.password(), user.roles());

        match CreateOutcome::from(created) {
            CreateOutcome::Created(user_id) => {
                debug!(%tenant_id, %username, %user_id, "user created");
                Ok(UserOutcome::Created(user_id))
            }
            CreateOutcome::Conflict(_) if !self.overwrite_existing => {
                info!(%tenant_id, %username, "user already exists; leaving it untouched");
                Ok(UserOutcome::Skipped)
            }
            CreateOutcome::Conflict(_) => {
                info!(%tenant_id, %username, "user already exists; updating roles and password");
                self.directory
                    .set_user_roles(tenant_id, username, user.roles())
                    .map_err(|e| RecordError::new(Stage::SetUserRoles, e))?;
                self.directory
                    .set_password(tenant_id, username, user.password())
                    .map_err(|e| RecordError::new(Stage::SetPassword, e))?;
                Ok(UserOutcome::Updated)
            }
            CreateOutcome::Failed(e) => Err(RecordError::new(Stage::CreateUser, e)),
        }
    }

    /// Reconcile every user in order and return the batch's membership index.
    ///
    /// A failing record is logged and reported; the remaining records still run.
    pub fn import_users(
        &self,
        tenant_id: TenantId,
        users: &[UserRecord],
        report: &mut ImportReport,
    ) -> RoleMembershipIndex {
        let index = RoleMembershipIndex::build(users);

        for user in users {
            let result = self.reconcile(tenant_id, user);
            if let Err(error) = &result {
                warn!(%tenant_id, username = %user.username(), %error, "user import failed");
            }
            report.record_user(user.username(), &result);
        }

        index
    }
}
