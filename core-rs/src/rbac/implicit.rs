//! Parent edges derived from resource ownership
//!
//! These edges are recomputed from the live hierarchy on every traversal.
//! When a project moves to another organization, its admin role's parent
//! moves with it, and no stored edge can keep pointing at the old owner.

use crate::hierarchy::HierarchyResolver;
use crate::models::ResourceRef;
use crate::rbac::role::{RoleId, RoleName};

/// Hierarchy-derived parents of `role`
pub fn implicit_parents<H: HierarchyResolver + ?Sized>(hierarchy: &H, role: RoleId) -> Vec<RoleId> {
    use RoleName::*;

    let resource = role.resource;
    let local = |names: &[RoleName]| -> Vec<RoleId> {
        names.iter().map(|n| RoleId::new(resource, *n)).collect()
    };
    let on_org = |name: RoleName| -> Vec<RoleId> {
        hierarchy
            .organization_of(resource)
            .map(|org| RoleId::new(org, name))
            .into_iter()
            .collect()
    };

    let mut parents = match (resource, role.name) {
        (ResourceRef::Organization(_), Admin | Auditor) => Vec::new(),
        (
            ResourceRef::Organization(_),
            Member | Execute | ProjectAdmin | InventoryAdmin | CredentialAdmin | JobTemplateAdmin,
        ) => local(&[Admin]),
        (ResourceRef::Organization(_), Read) => local(&[
            Member,
            Auditor,
            Execute,
            ProjectAdmin,
            InventoryAdmin,
            CredentialAdmin,
            JobTemplateAdmin,
        ]),

        (ResourceRef::Project(_), Admin) => on_org(ProjectAdmin),
        (ResourceRef::Project(_), Use | Update) => local(&[Admin]),
        (ResourceRef::Project(_), Read) => {
            let mut p = on_org(Auditor);
            p.extend(local(&[Use, Update]));
            p
        }

        (ResourceRef::Inventory(_), Admin) => on_org(InventoryAdmin),
        (ResourceRef::Inventory(_), Update | Adhoc) => local(&[Admin]),
        (ResourceRef::Inventory(_), Use) => local(&[Adhoc]),
        (ResourceRef::Inventory(_), Read) => {
            let mut p = on_org(Auditor);
            p.extend(local(&[Update, Use, Admin]));
            p
        }

        (ResourceRef::Credential(_), Admin) => on_org(CredentialAdmin),
        (ResourceRef::Credential(_), Use) => local(&[Admin]),
        (ResourceRef::Credential(_), Read) => {
            let mut p = on_org(Auditor);
            p.extend(local(&[Use, Admin]));
            p
        }

        (ResourceRef::JobTemplate(_), name) => job_template_parents(hierarchy, role, name),

        _ => Vec::new(),
    };

    parents.sort();
    parents.dedup();
    parents
}

/// A job template hangs off two organizations at once: its project's and its
/// inventory's. Either one can confer roles on it.
fn job_template_parents<H: HierarchyResolver + ?Sized>(
    hierarchy: &H,
    role: RoleId,
    name: RoleName,
) -> Vec<RoleId> {
    use RoleName::*;

    let mut via_project = None;
    let mut via_inventory = None;
    for owner in hierarchy.owners(role.resource) {
        match owner {
            ResourceRef::Project(_) => via_project = hierarchy.organization_of(owner),
            ResourceRef::Inventory(_) => via_inventory = hierarchy.organization_of(owner),
            _ => {}
        }
    }
    let orgs: Vec<_> = via_project.iter().chain(via_inventory.iter()).copied().collect();
    let own = |n: RoleName| RoleId::new(role.resource, n);

    let mut parents = Vec::new();
    match name {
        Admin => {
            if let Some(org) = via_project {
                parents.push(RoleId::new(org, ProjectAdmin));
            }
            if let Some(org) = via_inventory {
                parents.push(RoleId::new(org, InventoryAdmin));
            }
            parents.extend(orgs.iter().map(|org| RoleId::new(*org, JobTemplateAdmin)));
        }
        Execute => {
            parents.push(own(Admin));
            parents.extend(orgs.iter().map(|org| RoleId::new(*org, Execute)));
        }
        Read => {
            parents.extend(orgs.iter().map(|org| RoleId::new(*org, Auditor)));
            parents.push(own(Execute));
            parents.push(own(Admin));
        }
        _ => {}
    }
    parents
}
