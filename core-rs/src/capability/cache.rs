//! Request-scoped memo of capability answers
//!
//! A cache belongs to exactly one principal and is stamped with the store
//! revision its answers were computed at. Looking it up at any other
//! revision misses, so an ownership transfer or membership change is never
//! hidden by a stale answer. Answers for other principals are neither
//! returned nor stored.

use crate::capability::Capability;
use crate::ids::PrincipalId;
use crate::models::ResourceRef;
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct CapabilityCache {
    principal: PrincipalId,
    revision: Option<u64>,
    entries: HashMap<(ResourceRef, Capability), bool>,
}

impl CapabilityCache {
    pub fn new(principal: PrincipalId) -> Self {
        CapabilityCache {
            principal,
            revision: None,
            entries: HashMap::new(),
        }
    }

    pub fn principal(&self) -> PrincipalId {
        self.principal
    }

    pub fn get(
        &self,
        principal: PrincipalId,
        revision: u64,
        resource: ResourceRef,
        capability: Capability,
    ) -> Option<bool> {
        if principal != self.principal || self.revision != Some(revision) {
            return None;
        }
        self.entries.get(&(resource, capability)).copied()
    }

    pub fn insert(
        &mut self,
        principal: PrincipalId,
        revision: u64,
        resource: ResourceRef,
        capability: Capability,
        value: bool,
    ) {
        if principal != self.principal {
            warn!(owner = %self.principal, %principal, "refusing to cache another principal's answer");
            return;
        }
        if self.revision != Some(revision) {
            if !self.entries.is_empty() {
                debug!(from = ?self.revision, to = revision, dropped = self.entries.len(), "capability cache reset");
            }
            self.entries.clear();
            self.revision = Some(revision);
        }
        self.entries.insert((resource, capability), value);
    }

    /// Forget every answer about `resource`
    pub fn invalidate(&mut self, resource: ResourceRef) {
        self.entries.retain(|(r, _), _| *r != resource);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.revision = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
