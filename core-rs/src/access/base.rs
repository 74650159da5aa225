//! Helpers shared by the per-type policies

use crate::access::bypass::Action;
use crate::access::AccessContext;
use crate::ids::OrganizationId;
use crate::models::{Credential, Inventory, Project, ResourceKind, ResourceRef};
use crate::rbac::RoleName;
use std::fmt::Display;
use tracing::debug;

/// Log a denial and return `false`
pub(crate) fn deny(ctx: &AccessContext<'_>, action: Action, resource: impl Display, reason: &str) -> bool {
    debug!(
        principal = %ctx.principal().id,
        %action,
        %resource,
        reason,
        "access denied"
    );
    false
}

/// Use access on every referenced resource
pub(crate) fn can_use_all<I>(ctx: &AccessContext<'_>, action: Action, references: I) -> bool
where
    I: IntoIterator<Item = ResourceRef>,
{
    for reference in references {
        if !ctx.has(reference, RoleName::Use) {
            return deny(ctx, action, reference, "missing use on reference");
        }
    }
    true
}

/// The submitted value when it differs from the current one.
///
/// With no current value (creation) every submitted value counts as new.
pub(crate) fn changed<T: PartialEq + Copy>(submitted: Option<T>, current: Option<T>) -> Option<T> {
    match submitted {
        Some(value) if Some(value) != current => Some(value),
        _ => None,
    }
}

/// Creating an organization-owned resource needs the matching scoped admin
/// role (`project_admin`, `inventory_admin`, ...) on the owner
/// A resource owned by at most one organization, with its own role catalogue
pub(crate) trait OrganizationOwned {
    fn resource(&self) -> ResourceRef;
    fn organization(&self) -> Option<OrganizationId>;
}

impl OrganizationOwned for Project {
    fn resource(&self) -> ResourceRef {
        self.id.into()
    }

    fn organization(&self) -> Option<OrganizationId> {
        self.organization
    }
}

impl OrganizationOwned for Inventory {
    fn resource(&self) -> ResourceRef {
        self.id.into()
    }

    fn organization(&self) -> Option<OrganizationId> {
        self.organization
    }
}

impl OrganizationOwned for Credential {
    fn resource(&self) -> ResourceRef {
        self.id.into()
    }

    fn organization(&self) -> Option<OrganizationId> {
        self.organization
    }
}

/// Read/add/change/delete for organization-owned resources.
///
/// `scoped_admin` is the organization role that governs this kind: it is
/// needed on the payload's organization to create one, and on the new
/// organization to move one.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OwnedRules {
    pub kind: ResourceKind,
    pub scoped_admin: RoleName,
}

impl OwnedRules {
    pub fn can_read<T: OrganizationOwned>(&self, ctx: &AccessContext<'_>, obj: &T) -> bool {
        if let Some(decision) = ctx.bypass(Action::Read) {
            return decision;
        }
        ctx.has(obj.resource(), RoleName::Read)
    }

    pub fn can_add(&self, ctx: &AccessContext<'_>, organization: Option<OrganizationId>) -> bool {
        if let Some(decision) = ctx.bypass(Action::Add) {
            return decision;
        }
        match organization {
            Some(org) => ctx.has(org, self.scoped_admin) || deny(ctx, Action::Add, org, "missing scoped admin"),
            None => deny(ctx, Action::Add, self.kind, "organization is required"),
        }
    }

    pub fn can_change<T: OrganizationOwned>(
        &self,
        ctx: &AccessContext<'_>,
        obj: &T,
        submitted: Option<OrganizationId>,
    ) -> bool {
        if let Some(decision) = ctx.bypass(Action::Change) {
            return decision;
        }
        let resource = obj.resource();
        if !ctx.has(resource, RoleName::Admin) {
            return deny(ctx, Action::Change, resource, "missing admin");
        }
        match changed(submitted, obj.organization()) {
            Some(org) => {
                ctx.has(org, self.scoped_admin)
                    || deny(ctx, Action::Change, org, "missing scoped admin on new organization")
            }
            None => true,
        }
    }

    pub fn can_delete<T: OrganizationOwned>(&self, ctx: &AccessContext<'_>, obj: &T) -> bool {
        if let Some(decision) = ctx.bypass(Action::Delete) {
            return decision;
        }
        let resource = obj.resource();
        ctx.has(resource, RoleName::Admin) || deny(ctx, Action::Delete, resource, "missing admin")
    }
}
