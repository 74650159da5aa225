//! Validation layer
//!
//! Callers that need an outcome rather than a boolean go through these
//! validators. Each one reports malformed payloads as
//! [`AccessError::Validation`] and refused operations as
//! [`AccessError::PermissionDenied`], always checking structure first.

pub mod job_template;
pub mod launch;
pub mod schedule;

pub use job_template::JobTemplateValidator;
pub use launch::LaunchValidator;
pub use schedule::{validate_rrule, ScheduleValidator};

use crate::access::Action;
use crate::errors::{AccessError, Result};
use crate::ids::CredentialId;
use crate::models::CredentialKind;
use crate::store::World;
use std::fmt::Display;

/// Turn a policy decision into an outcome
pub(crate) fn require(allowed: bool, action: Action, resource: impl Display) -> Result<()> {
    if allowed {
        Ok(())
    } else {
        Err(AccessError::permission_denied(action.as_str(), resource.to_string()))
    }
}

/// The deprecated `credential` and `vault_credential` fields must name an
/// existing credential of the slot's kind
pub(crate) fn check_slot_kind(world: &World, kind: CredentialKind, submitted: Option<CredentialId>) -> Result<()> {
    let (id, field) = match (submitted, kind.slot_field()) {
        (Some(id), Some(field)) => (id, field),
        _ => return Ok(()),
    };
    match world.credential(id) {
        Some(credential) if credential.kind == kind => Ok(()),
        Some(credential) => Err(AccessError::validation(
            field,
            format!("credential {} is a {} credential, expected {}", id, credential.kind, kind),
        )),
        None => Err(AccessError::validation(field, format!("credential {} does not exist", id))),
    }
}
