//! Capability queries over any policy

use crate::access::ResourceAccess;
use crate::capability::{Capability, CapabilityCache, CapabilityOverrides};
use crate::models::{
    Credential, Inventory, JobTemplate, Label, Organization, Project, ResourceRef, Schedule,
};
use std::collections::BTreeMap;
use tracing::debug;

/// An instance capabilities can be reported for
pub trait CapabilitySubject {
    fn resource_ref(&self) -> ResourceRef;

    /// Answers stored on the instance that win over live checks
    fn stored_capabilities(&self) -> Option<&CapabilityOverrides> {
        None
    }
}

impl CapabilitySubject for JobTemplate {
    fn resource_ref(&self) -> ResourceRef {
        self.id.into()
    }

    fn stored_capabilities(&self) -> Option<&CapabilityOverrides> {
        Some(&self.capabilities_cache)
    }
}

macro_rules! plain_subject {
    ($($ty:ty),+) => {
        $(
            impl CapabilitySubject for $ty {
                fn resource_ref(&self) -> ResourceRef {
                    self.id.into()
                }
            }
        )+
    };
}

plain_subject!(Organization, Project, Inventory, Credential, Schedule, Label);

/// Map each requested capability to a decision for the policy's principal.
///
/// A cached answer is used only when `spec.capabilityCache` is on, the cache
/// belongs to the same principal and it was filled at the snapshot's
/// revision.
pub fn get_user_capabilities<A>(
    access: &A,
    obj: &A::Object,
    methods: &[Capability],
    mut cache: Option<&mut CapabilityCache>,
) -> BTreeMap<Capability, bool>
where
    A: ResourceAccess,
    A::Object: CapabilitySubject,
{
    let ctx = access.context();
    let principal = ctx.principal().id;
    let revision = ctx.snapshot().revision();
    let caching = ctx.config().spec.capability_cache;
    let resource = obj.resource_ref();
    let stored = obj.stored_capabilities();

    let mut answers = BTreeMap::new();
    for &capability in methods {
        if let Some(&value) = stored.and_then(|s| s.get(&capability)) {
            debug!(%resource, %capability, value, "stored capability override");
            answers.insert(capability, value);
            continue;
        }

        if caching {
            if let Some(hit) = cache
                .as_deref()
                .and_then(|c| c.get(principal, revision, resource, capability))
            {
                answers.insert(capability, hit);
                continue;
            }
        }

        let value = access.capability(obj, capability);
        if caching {
            if let Some(c) = cache.as_deref_mut() {
                c.insert(principal, revision, resource, capability, value);
            }
        }
        answers.insert(capability, value);
    }
    answers
}
