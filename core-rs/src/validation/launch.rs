//! Launch request validation

use crate::access::{Action, JobTemplateAccess};
use crate::errors::Result;
use crate::models::{CredentialKind, JobTemplate, LaunchPayload, Principal};
use crate::store::Snapshot;
use crate::validation::{check_slot_kind, require};

pub struct LaunchValidator<'a> {
    snapshot: &'a Snapshot,
    access: JobTemplateAccess<'a>,
}

impl<'a> LaunchValidator<'a> {
    pub fn new(principal: &'a Principal, snapshot: &'a Snapshot) -> Self {
        LaunchValidator {
            snapshot,
            access: JobTemplateAccess::new(principal, snapshot),
        }
    }

    /// A prompted value the principal may not supply is refused outright,
    /// even for fields the template marks promptable.
    pub fn validate_launch(&self, template: &JobTemplate, launch: &LaunchPayload) -> Result<()> {
        check_slot_kind(self.snapshot, CredentialKind::Machine, launch.credential)?;
        check_slot_kind(self.snapshot, CredentialKind::Vault, launch.vault_credential)?;
        require(self.access.can_start(template, Some(launch)), Action::Start, template.id)
    }
}
