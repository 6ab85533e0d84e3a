//! Role reconciliation: create with members, then always bind permissions.

use tracing::{debug, info, warn};

use rolesync_auth::{CreateOutcome, RoleBindingStore, RoleRecord, UserRoleDirectory};
use rolesync_core::TenantId;

use crate::membership::RoleMembershipIndex;
use crate::report::{ImportReport, RecordError, RoleOutcome, Stage};

/// Creates roles and applies their permission bindings.
///
/// Unlike users, a role that already exists does not get its membership
/// re-applied; only its bindings are rewritten.
pub struct RoleReconciler<D, B> {
    directory: D,
    bindings: B,
    description: Option<String>,
    overwrite_existing: bool,
}

impl<D, B> RoleReconciler<D, B>
where
    D: UserRoleDirectory,
    B: RoleBindingStore,
{
    pub fn new(directory: D, bindings: B) -> Self {
        Self {
            directory,
            bindings,
            description: None,
            overwrite_existing: true,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_overwrite_existing(mut self, overwrite: bool) -> Self {
        self.overwrite_existing = overwrite;
        self
    }

    /// Reconcile a single role against the members collected from the user batch.
    ///
    /// Bindings are applied whether the role was created or already existed,
    /// since permissions may have changed since the last import. A creation
    /// failure other than a conflict skips the bindings.
    pub fn reconcile(
        &self,
        tenant_id: TenantId,
        role: &RoleRecord,
        index: &RoleMembershipIndex,
    ) -> Result<RoleOutcome, RecordError> {
        let name = role.name();
        let members = index.members(name);
        let created = self.directory.create_role(
            tenant_id,
            name,
            self.description.as_deref(),
            members,
        );

        let role_id = match CreateOutcome::from(created) {
            CreateOutcome::Created(role_id) => {
                debug!(%tenant_id, role = %name, %role_id, members = members.len(), "role created");
                Some(role_id)
            }
            CreateOutcome::Conflict(_) => {
                info!(%tenant_id, role = %name, "role already exists");
                None
            }
            CreateOutcome::Failed(e) => return Err(RecordError::new(Stage::CreateRole, e)),
        };

        if role_id.is_none() && !self.overwrite_existing {
            return Ok(RoleOutcome::Existing {
                bindings_applied: false,
            });
        }

        self.bindings
            .set_role_bindings(tenant_id, name, role.permissions())
            .map_err(|e| RecordError::new(Stage::SetRoleBindings, e))?;
        debug!(%tenant_id, role = %name, permissions = role.permissions().len(), "role bindings applied");

        Ok(match role_id {
            Some(role_id) => RoleOutcome::Created(role_id),
            None => RoleOutcome::Existing {
                bindings_applied: true,
            },
        })
    }

    /// Reconcile every role in order. A failing record does not stop the batch.
    pub fn import_roles(
        &self,
        tenant_id: TenantId,
        roles: &[RoleRecord],
        index: &RoleMembershipIndex,
        report: &mut ImportReport,
    ) {
        for role in roles {
            let result = self.reconcile(tenant_id, role, index);
            if let Err(error) = &result {
                warn!(%tenant_id, role = %role.name(), %error, "role import failed");
            }
            report.record_role(role.name(), &result);
        }
    }
}
