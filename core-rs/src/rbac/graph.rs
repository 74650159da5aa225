//! Role membership and parent-role inheritance
//!
//! Grants are computed on read. A principal holds a role when they are a
//! direct member of it, or a member of any role reachable by following parent
//! edges upward from it. Nothing is denormalized on write, so a membership
//! change is visible to the next traversal with no propagation step.

use crate::ids::PrincipalId;
use crate::models::ResourceRef;
use crate::rbac::role::RoleId;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::{trace, warn};

/// Default bound on how many parent levels a traversal will climb
pub const DEFAULT_MAX_ROLE_DEPTH: usize = 32;

/// Read interface the grant query is evaluated against
pub trait RoleLookup {
    fn is_member(&self, principal: PrincipalId, role: RoleId) -> bool;

    /// Every role whose members implicitly hold `role`
    fn parents(&self, role: RoleId) -> Vec<RoleId>;

    fn max_role_depth(&self) -> usize {
        DEFAULT_MAX_ROLE_DEPTH
    }
}

/// True if `principal` holds `role` directly or through any ancestor role
pub fn grants<L: RoleLookup + ?Sized>(lookup: &L, principal: PrincipalId, role: RoleId) -> bool {
    let max_depth = lookup.max_role_depth();
    let mut visited: BTreeSet<RoleId> = BTreeSet::new();
    let mut queue: VecDeque<(RoleId, usize)> = VecDeque::new();
    queue.push_back((role, 0));

    while let Some((current, depth)) = queue.pop_front() {
        if !visited.insert(current) {
            continue;
        }
        if lookup.is_member(principal, current) {
            trace!(%principal, role = %role, via = %current, depth, "role granted");
            return true;
        }
        if depth >= max_depth {
            warn!(role = %role, at = %current, max_depth, "role traversal hit depth limit");
            continue;
        }
        for parent in lookup.parents(current) {
            if !visited.contains(&parent) {
                queue.push_back((parent, depth + 1));
            }
        }
    }

    false
}

/// All roles reachable from `role` by following parent edges (excluding itself)
pub fn ancestors<L: RoleLookup + ?Sized>(lookup: &L, role: RoleId) -> BTreeSet<RoleId> {
    let mut seen = BTreeSet::new();
    let mut stack = lookup.parents(role);
    while let Some(current) = stack.pop() {
        if seen.insert(current) {
            stack.extend(lookup.parents(current));
        }
    }
    seen
}

/// True if making `parent` a parent of `child` would close a cycle
pub fn would_cycle<L: RoleLookup + ?Sized>(lookup: &L, child: RoleId, parent: RoleId) -> bool {
    child == parent || ancestors(lookup, parent).contains(&child)
}

/// Stored memberships and explicitly attached parent edges
///
/// Parent edges derived from the ownership hierarchy are not stored here; see
/// [`crate::rbac::implicit`].
#[derive(Debug, Clone, Default)]
pub struct RoleGraph {
    members: BTreeMap<RoleId, BTreeSet<PrincipalId>>,
    parents: BTreeMap<RoleId, BTreeSet<RoleId>>,
}

impl RoleGraph {
    pub fn new() -> Self {
        RoleGraph::default()
    }

    /// Returns false if the principal was already a member
    pub fn add_member(&mut self, role: RoleId, principal: PrincipalId) -> bool {
        self.members.entry(role).or_default().insert(principal)
    }

    pub fn remove_member(&mut self, role: RoleId, principal: PrincipalId) -> bool {
        match self.members.get_mut(&role) {
            Some(set) => set.remove(&principal),
            None => false,
        }
    }

    pub fn is_direct_member(&self, role: RoleId, principal: PrincipalId) -> bool {
        self.members
            .get(&role)
            .map(|set| set.contains(&principal))
            .unwrap_or(false)
    }

    pub fn members(&self, role: RoleId) -> impl Iterator<Item = &PrincipalId> {
        self.members.get(&role).into_iter().flatten()
    }

    /// Insert an explicit parent edge. Cycle checks are the caller's job,
    /// since they need the implicit edges as well.
    pub fn insert_parent(&mut self, child: RoleId, parent: RoleId) -> bool {
        self.parents.entry(child).or_default().insert(parent)
    }

    pub fn remove_parent(&mut self, child: RoleId, parent: RoleId) -> bool {
        match self.parents.get_mut(&child) {
            Some(set) => set.remove(&parent),
            None => false,
        }
    }

    pub fn explicit_parents(&self, role: RoleId) -> impl Iterator<Item = &RoleId> {
        self.parents.get(&role).into_iter().flatten()
    }

    /// Every stored `(child, parent)` edge
    pub fn explicit_edges(&self) -> impl Iterator<Item = (RoleId, RoleId)> + '_ {
        self.parents
            .iter()
            .flat_map(|(child, parents)| parents.iter().map(move |parent| (*child, *parent)))
    }

    /// Drop every membership and edge touching roles of `resource`
    pub fn forget_resource(&mut self, resource: ResourceRef) {
        self.members.retain(|role, _| role.resource != resource);
        self.parents.retain(|role, _| role.resource != resource);
        for set in self.parents.values_mut() {
            set.retain(|parent| parent.resource != resource);
        }
    }

    /// Drop every membership held by `principal`
    pub fn forget_principal(&mut self, principal: PrincipalId) {
        for set in self.members.values_mut() {
            set.remove(&principal);
        }
    }
}

impl RoleLookup for RoleGraph {
    fn is_member(&self, principal: PrincipalId, role: RoleId) -> bool {
        self.is_direct_member(role, principal)
    }

    fn parents(&self, role: RoleId) -> Vec<RoleId> {
        self.explicit_parents(role).copied().collect()
    }
}
