//! Schedule payload validation

use crate::access::{Action, LaunchConfigPolicy, ResourceAccess, ScheduleAccess};
use crate::errors::{AccessError, Result};
use crate::models::{Principal, ResourceKind, Schedule, SchedulePayload};
use crate::store::Snapshot;
use crate::validation::require;
use once_cell::sync::Lazy;
use regex::Regex;

/// `DTSTART:<utc timestamp> RRULE:FREQ=<freq>[;KEY=VALUE...]`
static RRULE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^DTSTART(;TZID=[^:]+)?:\d{8}T\d{6}Z?\s+RRULE:FREQ=(SECONDLY|MINUTELY|HOURLY|DAILY|WEEKLY|MONTHLY|YEARLY)(;[A-Z]+=[^;\s]+)*$",
    )
    .expect("rrule pattern compiles")
});

pub fn validate_rrule(rrule: &str) -> Result<()> {
    if RRULE_REGEX.is_match(rrule.trim()) {
        Ok(())
    } else {
        Err(AccessError::validation("rrule", format!("not a valid recurrence rule: {}", rrule)))
    }
}

pub struct ScheduleValidator<'a> {
    snapshot: &'a Snapshot,
    access: ScheduleAccess<'a>,
}

impl<'a> ScheduleValidator<'a> {
    pub fn new(principal: &'a Principal, snapshot: &'a Snapshot) -> Self {
        ScheduleValidator {
            snapshot,
            access: ScheduleAccess::new(principal, snapshot),
        }
    }

    pub fn with_launch_config(
        principal: &'a Principal,
        snapshot: &'a Snapshot,
        launch_config: impl LaunchConfigPolicy + 'a,
    ) -> Self {
        ScheduleValidator {
            snapshot,
            access: ScheduleAccess::with_launch_config(principal, snapshot, launch_config),
        }
    }

    /// Validate a create (`instance` is `None`) or an update
    pub fn validate(&self, instance: Option<&Schedule>, payload: &SchedulePayload) -> Result<()> {
        if instance.is_none() {
            if payload.unified_job_template.is_none() {
                return Err(AccessError::validation("unified_job_template", "this field is required"));
            }
            if payload.rrule.is_none() {
                return Err(AccessError::validation("rrule", "this field is required"));
            }
        }
        if let Some(rrule) = &payload.rrule {
            validate_rrule(rrule)?;
        }
        self.check_prompts(instance, payload)?;

        match instance {
            Some(schedule) => require(
                self.access.can_change(schedule, Some(payload)),
                Action::Change,
                schedule.id,
            ),
            None => require(self.access.can_add(payload), Action::Add, ResourceKind::Schedule),
        }
    }

    /// Overrides are only accepted for fields the template prompts for
    fn check_prompts(&self, instance: Option<&Schedule>, payload: &SchedulePayload) -> Result<()> {
        if !payload.has_launch_overrides() {
            return Ok(());
        }
        let template_id = match instance {
            Some(schedule) => schedule.unified_job_template,
            None => match payload.unified_job_template {
                Some(id) => id,
                None => return Ok(()),
            },
        };
        let template = self.snapshot.require_job_template(template_id)?;

        if payload.inventory.is_some() && !template.ask_inventory_on_launch {
            return Err(AccessError::validation(
                "inventory",
                "field can not be set, the template does not prompt for it",
            ));
        }
        let has_credentials = payload.credentials.as_ref().is_some_and(|c| !c.is_empty());
        if has_credentials && !template.ask_credential_on_launch {
            return Err(AccessError::validation(
                "credentials",
                "field can not be set, the template does not prompt for it",
            ));
        }
        Ok(())
    }
}
