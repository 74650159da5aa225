//! Label policy
//!
//! Labels carry no roles; every rule is phrased in terms of the owning
//! organization, plus read through any job template wearing the label.

use crate::access::base::deny;
use crate::access::bypass::Action;
use crate::access::{AccessContext, ResourceAccess};
use crate::models::{Label, LabelPayload, Principal, ResourceKind};
use crate::rbac::RoleName;
use crate::store::Snapshot;

pub struct LabelAccess<'a> {
    ctx: AccessContext<'a>,
}

impl<'a> LabelAccess<'a> {
    pub fn new(principal: &'a Principal, snapshot: &'a Snapshot) -> Self {
        LabelAccess {
            ctx: AccessContext::new(principal, snapshot),
        }
    }
}

impl ResourceAccess for LabelAccess<'_> {
    type Object = Label;
    type Payload = LabelPayload;

    fn context(&self) -> &AccessContext<'_> {
        &self.ctx
    }

    fn can_read(&self, label: &Label) -> bool {
        if let Some(decision) = self.ctx.bypass(Action::Read) {
            return decision;
        }
        if self.ctx.has(label.organization, RoleName::Read) {
            return true;
        }
        self.ctx
            .world()
            .job_templates()
            .filter(|jt| jt.labels.contains(&label.id))
            .any(|jt| self.ctx.has(jt.id, RoleName::Read))
    }

    fn can_add(&self, payload: &LabelPayload) -> bool {
        if let Some(decision) = self.ctx.bypass(Action::Add) {
            return decision;
        }
        match payload.organization {
            Some(org) => {
                self.ctx.has(org, RoleName::Member)
                    || deny(&self.ctx, Action::Add, org, "missing organization member")
            }
            None => deny(&self.ctx, Action::Add, ResourceKind::Label, "organization is required"),
        }
    }

    fn can_change(&self, label: &Label, payload: Option<&LabelPayload>) -> bool {
        if let Some(decision) = self.ctx.bypass(Action::Change) {
            return decision;
        }
        if let Some(org) = payload.and_then(|p| p.organization) {
            if org != label.organization && !self.ctx.has(org, RoleName::Admin) {
                return deny(&self.ctx, Action::Change, org, "missing admin on new organization");
            }
        }
        self.ctx.has(label.organization, RoleName::Admin)
            || deny(&self.ctx, Action::Change, label.id, "missing organization admin")
    }

    fn can_delete(&self, label: &Label) -> bool {
        if let Some(decision) = self.ctx.bypass(Action::Delete) {
            return decision;
        }
        self.ctx.has(label.organization, RoleName::Admin)
            || deny(&self.ctx, Action::Delete, label.id, "missing organization admin")
    }
}
