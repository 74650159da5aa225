//! Job template payload validation

use crate::access::{Action, JobTemplateAccess, ResourceAccess};
use crate::config::SlotResubmitPolicy;
use crate::errors::{AccessError, Result};
use crate::ids::CredentialId;
use crate::models::{CredentialKind, JobTemplate, JobTemplatePayload, Principal, ResourceKind};
use crate::rbac::{RoleId, RoleName};
use crate::store::Snapshot;
use crate::validation::{check_slot_kind, require};
use std::collections::BTreeSet;
use tracing::debug;

const SLOT_KINDS: [CredentialKind; 2] = [CredentialKind::Machine, CredentialKind::Vault];

pub struct JobTemplateValidator<'a> {
    principal: &'a Principal,
    snapshot: &'a Snapshot,
    access: JobTemplateAccess<'a>,
}

impl<'a> JobTemplateValidator<'a> {
    pub fn new(principal: &'a Principal, snapshot: &'a Snapshot) -> Self {
        JobTemplateValidator {
            principal,
            snapshot,
            access: JobTemplateAccess::new(principal, snapshot),
        }
    }

    /// Validate a create (`instance` is `None`) or an update.
    ///
    /// Order: slot kinds, credential cardinality, `use` on changed slot
    /// values, then `can_add`/`can_change`.
    pub fn validate(&self, instance: Option<&JobTemplate>, payload: &JobTemplatePayload) -> Result<()> {
        for kind in SLOT_KINDS {
            check_slot_kind(self.snapshot, kind, payload.slot(kind))?;
        }
        self.check_cardinality(instance, payload)?;
        self.check_slot_use(instance, payload)?;

        match instance {
            Some(template) => require(
                self.access.can_change(template, Some(payload)),
                Action::Change,
                template.id,
            ),
            None => require(self.access.can_add(payload), Action::Add, ResourceKind::JobTemplate),
        }
    }

    /// The credential set the template would end up with
    fn resulting_credentials(
        &self,
        instance: Option<&JobTemplate>,
        payload: &JobTemplatePayload,
    ) -> BTreeSet<CredentialId> {
        let mut resulting: BTreeSet<CredentialId> = match (&payload.credentials, instance) {
            (Some(listed), _) => listed.iter().copied().collect(),
            (None, Some(template)) => template.credentials.clone(),
            (None, None) => BTreeSet::new(),
        };
        for kind in SLOT_KINDS {
            if let Some(id) = payload.slot(kind) {
                // a slot value replaces whatever held that slot unless the
                // full list was submitted alongside it
                if payload.credentials.is_none() {
                    let world = self.snapshot.world();
                    resulting.retain(|c| world.credential(*c).map_or(true, |c| c.kind != kind));
                }
                resulting.insert(id);
            }
        }
        resulting
    }

    fn check_cardinality(&self, instance: Option<&JobTemplate>, payload: &JobTemplatePayload) -> Result<()> {
        let resulting = self.resulting_credentials(instance, payload);
        let world = self.snapshot.world();
        for kind in SLOT_KINDS {
            let count = resulting
                .iter()
                .filter_map(|id| world.credential(*id))
                .filter(|c| c.kind == kind)
                .count();
            if count > 1 {
                return Err(AccessError::validation(
                    "credentials",
                    format!("cannot assign multiple {} credentials", kind),
                ));
            }
        }
        Ok(())
    }

    fn check_slot_use(&self, instance: Option<&JobTemplate>, payload: &JobTemplatePayload) -> Result<()> {
        let policy = self.snapshot.config().spec.deprecated_slot_resubmit;
        for kind in SLOT_KINDS {
            let id = match payload.slot(kind) {
                Some(id) => id,
                None => continue,
            };
            let attached = instance.is_some_and(|t| t.credentials.contains(&id));
            if attached && policy == SlotResubmitPolicy::Noop {
                debug!(credential = %id, "slot value already attached, skipping use check");
                continue;
            }
            let usable = self.principal.is_superuser
                || self
                    .snapshot
                    .has_role(self.principal.id, RoleId::new(id, RoleName::Use));
            if !usable {
                return Err(AccessError::permission_denied("use", id.to_string()));
            }
        }
        Ok(())
    }
}
