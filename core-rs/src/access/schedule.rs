//! Schedule policy
//!
//! Schedules have no roles of their own. Authority comes from the job
//! template they launch: `execute` to create one, and for edits either
//! `admin` on the template or being the schedule's creator while still
//! holding `execute`. A schedule is never moved to another template.

use crate::access::base::deny;
use crate::access::bypass::Action;
use crate::access::launch_config::{JobLaunchConfigAccess, LaunchConfigPolicy};
use crate::access::{AccessContext, ResourceAccess};
use crate::models::{Principal, ResourceKind, Schedule, SchedulePayload};
use crate::rbac::RoleName;
use crate::store::Snapshot;

pub struct ScheduleAccess<'a> {
    ctx: AccessContext<'a>,
    launch_config: Box<dyn LaunchConfigPolicy + 'a>,
}

impl<'a> ScheduleAccess<'a> {
    pub fn new(principal: &'a Principal, snapshot: &'a Snapshot) -> Self {
        ScheduleAccess::with_launch_config(
            principal,
            snapshot,
            JobLaunchConfigAccess::new(principal, snapshot),
        )
    }

    /// Use `launch_config` for the override sub-check
    pub fn with_launch_config(
        principal: &'a Principal,
        snapshot: &'a Snapshot,
        launch_config: impl LaunchConfigPolicy + 'a,
    ) -> Self {
        ScheduleAccess {
            ctx: AccessContext::new(principal, snapshot),
            launch_config: Box::new(launch_config),
        }
    }

    fn is_creator(&self, schedule: &Schedule) -> bool {
        schedule.created_by == Some(self.ctx.principal().id)
    }

    fn has_authority(&self, schedule: &Schedule) -> bool {
        let template = schedule.unified_job_template;
        self.ctx.has(template, RoleName::Admin)
            || (self.is_creator(schedule) && self.ctx.has(template, RoleName::Execute))
    }
}

impl ResourceAccess for ScheduleAccess<'_> {
    type Object = Schedule;
    type Payload = SchedulePayload;

    fn context(&self) -> &AccessContext<'_> {
        &self.ctx
    }

    fn can_read(&self, schedule: &Schedule) -> bool {
        if let Some(decision) = self.ctx.bypass(Action::Read) {
            return decision;
        }
        self.ctx.has(schedule.unified_job_template, RoleName::Read)
    }

    fn can_add(&self, payload: &SchedulePayload) -> bool {
        if let Some(decision) = self.ctx.bypass(Action::Add) {
            return decision;
        }
        let template = match payload.unified_job_template {
            Some(template) => template,
            None => {
                return deny(&self.ctx, Action::Add, ResourceKind::Schedule, "unified_job_template is required")
            }
        };
        if !self.ctx.has(template, RoleName::Execute) {
            return deny(&self.ctx, Action::Add, template, "missing execute");
        }
        if payload.has_launch_overrides() {
            return self.launch_config.can_add(payload);
        }
        true
    }

    /// Relinking to another template is refused for everyone, superusers
    /// included.
    fn can_change(&self, schedule: &Schedule, payload: Option<&SchedulePayload>) -> bool {
        if let Some(target) = payload.and_then(|p| p.unified_job_template) {
            if target != schedule.unified_job_template {
                return deny(&self.ctx, Action::Change, schedule.id, "schedule cannot change template");
            }
        }
        if let Some(decision) = self.ctx.bypass(Action::Change) {
            return decision;
        }
        if !self.has_authority(schedule) {
            return deny(&self.ctx, Action::Change, schedule.id, "not creator with execute, not template admin");
        }
        match payload {
            Some(payload) if payload.has_launch_overrides() => self.launch_config.can_change(schedule, payload),
            _ => true,
        }
    }

    fn can_delete(&self, schedule: &Schedule) -> bool {
        if let Some(decision) = self.ctx.bypass(Action::Delete) {
            return decision;
        }
        self.has_authority(schedule)
            || deny(&self.ctx, Action::Delete, schedule.id, "not creator with execute, not template admin")
    }
}
