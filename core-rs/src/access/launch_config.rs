//! Launch-time overrides carried by a schedule
//!
//! [`ScheduleAccess`](crate::access::ScheduleAccess) hands any inventory or
//! credential override to a [`LaunchConfigPolicy`]. The default
//! [`JobLaunchConfigAccess`] requires `use` on each overridden resource.

use crate::access::base::{can_use_all, changed};
use crate::access::bypass::Action;
use crate::access::AccessContext;
use crate::models::{Principal, ResourceRef, Schedule, SchedulePayload};
use crate::store::Snapshot;

/// Decides on the launch-override part of a schedule payload
pub trait LaunchConfigPolicy {
    /// Called with the full creation payload
    fn can_add(&self, payload: &SchedulePayload) -> bool;

    /// Called with the stored schedule and the submitted changes
    fn can_change(&self, schedule: &Schedule, payload: &SchedulePayload) -> bool;
}

pub struct JobLaunchConfigAccess<'a> {
    ctx: AccessContext<'a>,
}

impl<'a> JobLaunchConfigAccess<'a> {
    pub fn new(principal: &'a Principal, snapshot: &'a Snapshot) -> Self {
        JobLaunchConfigAccess {
            ctx: AccessContext::new(principal, snapshot),
        }
    }
}

impl LaunchConfigPolicy for JobLaunchConfigAccess<'_> {
    fn can_add(&self, payload: &SchedulePayload) -> bool {
        if let Some(decision) = self.ctx.bypass(Action::Add) {
            return decision;
        }
        let mut references: Vec<ResourceRef> = payload.inventory.map(ResourceRef::from).into_iter().collect();
        references.extend(
            payload
                .credentials
                .iter()
                .flatten()
                .map(|id| ResourceRef::from(*id)),
        );
        can_use_all(&self.ctx, Action::Add, references)
    }

    fn can_change(&self, schedule: &Schedule, payload: &SchedulePayload) -> bool {
        if let Some(decision) = self.ctx.bypass(Action::Change) {
            return decision;
        }
        let mut references: Vec<ResourceRef> = changed(payload.inventory, schedule.inventory)
            .map(ResourceRef::from)
            .into_iter()
            .collect();
        references.extend(
            payload
                .credentials
                .iter()
                .flatten()
                .filter(|id| !schedule.credentials.contains(*id))
                .map(|id| ResourceRef::from(*id)),
        );
        can_use_all(&self.ctx, Action::Change, references)
    }
}
