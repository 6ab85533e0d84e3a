//! Import orchestration: users first, then roles from the users' index.

use tracing::info;

use rolesync_auth::{RoleBindingStore, RoleRecord, UserRecord, UserRoleDirectory};
use rolesync_core::TenantId;

use crate::batch::ImportBatch;
use crate::config::ImportConfig;
use crate::membership::RoleMembershipIndex;
use crate::report::ImportReport;
use crate::roles::RoleReconciler;
use crate::users::UserReconciler;

/// Runs both reconcilers against injected collaborators.
///
/// Processing is sequential and never rolled back: a run that fails halfway
/// keeps whatever it already created or updated.
pub struct ImportHandler<D, B> {
    users: UserReconciler<D>,
    roles: RoleReconciler<D, B>,
}

impl<D, B> ImportHandler<D, B>
where
    D: UserRoleDirectory + Clone,
    B: RoleBindingStore,
{
    pub fn new(directory: D, bindings: B, config: ImportConfig) -> Self {
        let users = UserReconciler::new(directory.clone())
            .with_overwrite_existing(config.overwrite_existing);
        let roles = RoleReconciler::new(directory, bindings)
            .with_description(config.role_description)
            .with_overwrite_existing(config.overwrite_existing);
        Self { users, roles }
    }

    pub fn import_users(
        &self,
        tenant_id: TenantId,
        users: &[UserRecord],
        report: &mut ImportReport,
    ) -> RoleMembershipIndex {
        self.users.import_users(tenant_id, users, report)
    }

    pub fn import_roles(
        &self,
        tenant_id: TenantId,
        roles: &[RoleRecord],
        index: &RoleMembershipIndex,
        report: &mut ImportReport,
    ) {
        self.roles.import_roles(tenant_id, roles, index, report)
    }

    /// Import a whole batch into `tenant_id`.
    pub fn run(&self, tenant_id: TenantId, batch: &ImportBatch) -> ImportReport {
        let span = tracing::info_span!(
            "import",
            %tenant_id,
            users = batch.users.len(),
            roles = batch.roles.len()
        );
        let _guard = span.enter();

        let mut report = ImportReport::new(tenant_id);
        let index = self.import_users(tenant_id, &batch.users, &mut report);
        self.import_roles(tenant_id, &batch.roles, &index, &mut report);
        report.finish();

        info!(
            users_created = report.users_created,
            users_updated = report.users_updated,
            users_skipped = report.users_skipped,
            roles_created = report.roles_created,
            roles_existing = report.roles_existing,
            failures = report.failure_count(),
            "import finished"
        );
        report
    }
}
