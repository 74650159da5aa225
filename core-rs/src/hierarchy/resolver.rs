//! Ownership chain resolution

use crate::ids::OrganizationId;
use crate::models::ResourceRef;
use serde::Serialize;
use std::collections::BTreeSet;

/// Resolved ownership of one resource at one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnershipChain {
    pub resource: ResourceRef,
    /// Effective owning organization, `None` when orphaned
    pub organization: Option<OrganizationId>,
    /// Every ancestor, nearest first, without duplicates
    pub ancestors: Vec<ResourceRef>,
}

impl OwnershipChain {
    pub fn is_orphaned(&self) -> bool {
        self.organization.is_none()
    }

    /// All organizations anywhere on the chain (a job template can reach two)
    pub fn organizations(&self) -> BTreeSet<OrganizationId> {
        self.ancestors
            .iter()
            .filter_map(|r| match r {
                ResourceRef::Organization(id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

pub trait HierarchyResolver {
    fn resource_exists(&self, resource: ResourceRef) -> bool;

    /// Direct owners of `resource`: the organization for mid-tier resources,
    /// project and inventory for a job template, the template for a schedule.
    fn owners(&self, resource: ResourceRef) -> Vec<ResourceRef>;

    /// Effective owning organization.
    ///
    /// A job template's organization is its project's, falling back to its
    /// inventory's; a schedule's is its template's.
    fn organization_of(&self, resource: ResourceRef) -> Option<OrganizationId> {
        if let ResourceRef::Organization(id) = resource {
            return Some(id);
        }
        self.owners(resource)
            .into_iter()
            .find_map(|owner| self.organization_of(owner))
    }

    fn ancestors(&self, resource: ResourceRef) -> Vec<ResourceRef> {
        let mut out: Vec<ResourceRef> = Vec::new();
        let mut frontier = self.owners(resource);
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for owner in frontier {
                if owner == resource || out.contains(&owner) {
                    continue;
                }
                out.push(owner);
                next.extend(self.owners(owner));
            }
            frontier = next;
        }
        out
    }

    fn resolve(&self, resource: ResourceRef) -> OwnershipChain {
        OwnershipChain {
            resource,
            organization: self.organization_of(resource),
            ancestors: self.ancestors(resource),
        }
    }
}
