//! Organization policy

use crate::access::base::deny;
use crate::access::bypass::Action;
use crate::access::{AccessContext, ResourceAccess};
use crate::models::{Organization, OrganizationPayload, Principal, ResourceKind};
use crate::rbac::RoleName;
use crate::store::Snapshot;

pub struct OrganizationAccess<'a> {
    ctx: AccessContext<'a>,
}

impl<'a> OrganizationAccess<'a> {
    pub fn new(principal: &'a Principal, snapshot: &'a Snapshot) -> Self {
        OrganizationAccess {
            ctx: AccessContext::new(principal, snapshot),
        }
    }
}

impl ResourceAccess for OrganizationAccess<'_> {
    type Object = Organization;
    type Payload = OrganizationPayload;

    fn context(&self) -> &AccessContext<'_> {
        &self.ctx
    }

    fn can_read(&self, org: &Organization) -> bool {
        if let Some(decision) = self.ctx.bypass(Action::Read) {
            return decision;
        }
        self.ctx.has(org.id, RoleName::Read)
    }

    /// Only superusers create tenants
    fn can_add(&self, _payload: &OrganizationPayload) -> bool {
        self.ctx.bypass(Action::Add).unwrap_or_else(|| {
            deny(&self.ctx, Action::Add, ResourceKind::Organization, "superuser only")
        })
    }

    fn can_change(&self, org: &Organization, _payload: Option<&OrganizationPayload>) -> bool {
        if let Some(decision) = self.ctx.bypass(Action::Change) {
            return decision;
        }
        self.ctx.has(org.id, RoleName::Admin) || deny(&self.ctx, Action::Change, org.id, "missing admin")
    }

    fn can_delete(&self, org: &Organization) -> bool {
        if let Some(decision) = self.ctx.bypass(Action::Delete) {
            return decision;
        }
        self.ctx.has(org.id, RoleName::Admin) || deny(&self.ctx, Action::Delete, org.id, "missing admin")
    }
}
