//! Project policy

use crate::access::base::OwnedRules;
use crate::access::{AccessContext, ResourceAccess};
use crate::models::{Principal, Project, ProjectPayload, ResourceKind};
use crate::rbac::RoleName;
use crate::store::Snapshot;

const PROJECT_RULES: OwnedRules = OwnedRules {
    kind: ResourceKind::Project,
    scoped_admin: RoleName::ProjectAdmin,
};

pub struct ProjectAccess<'a> {
    ctx: AccessContext<'a>,
}

impl<'a> ProjectAccess<'a> {
    pub fn new(principal: &'a Principal, snapshot: &'a Snapshot) -> Self {
        ProjectAccess {
            ctx: AccessContext::new(principal, snapshot),
        }
    }
}

impl ResourceAccess for ProjectAccess<'_> {
    type Object = Project;
    type Payload = ProjectPayload;

    fn context(&self) -> &AccessContext<'_> {
        &self.ctx
    }

    fn can_read(&self, project: &Project) -> bool {
        PROJECT_RULES.can_read(&self.ctx, project)
    }

    fn can_add(&self, payload: &ProjectPayload) -> bool {
        PROJECT_RULES.can_add(&self.ctx, payload.organization)
    }

    fn can_change(&self, project: &Project, payload: Option<&ProjectPayload>) -> bool {
        PROJECT_RULES.can_change(&self.ctx, project, payload.and_then(|p| p.organization))
    }

    fn can_delete(&self, project: &Project) -> bool {
        PROJECT_RULES.can_delete(&self.ctx, project)
    }
}
