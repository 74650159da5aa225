//! Prospective field values submitted for create/update/launch
//!
//! A field that is `None` was not submitted; policies only check the fields
//! that are present (and, on update, that differ from the stored value).

use crate::ids::{CredentialId, InventoryId, JobTemplateId, OrganizationId, ProjectId};
use crate::models::resources::{CredentialKind, JobTemplate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobTemplatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<InventoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playbook: Option<String>,
    /// Deprecated single-slot machine credential
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<CredentialId>,
    /// Deprecated single-slot vault credential
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_credential: Option<CredentialId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Vec<CredentialId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask_inventory_on_launch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask_credential_on_launch: Option<bool>,
}

impl JobTemplatePayload {
    pub fn is_empty(&self) -> bool {
        self == &JobTemplatePayload::default()
    }

    /// Payload that would recreate `template`'s references, used for copies
    pub fn from_template(template: &JobTemplate) -> Self {
        JobTemplatePayload {
            name: Some(template.name.clone()),
            project: template.project,
            inventory: template.inventory,
            playbook: Some(template.playbook.clone()),
            credentials: Some(template.credentials.iter().copied().collect()),
            ask_inventory_on_launch: Some(template.ask_inventory_on_launch),
            ask_credential_on_launch: Some(template.ask_credential_on_launch),
            ..Default::default()
        }
    }

    /// Every credential the payload references, slot fields included
    pub fn referenced_credentials(&self) -> Vec<CredentialId> {
        let mut ids: Vec<CredentialId> = self.credentials.clone().unwrap_or_default();
        ids.extend(self.credential);
        ids.extend(self.vault_credential);
        ids.sort();
        ids.dedup();
        ids
    }

    /// The deprecated slot field for `kind`, if the payload set it
    pub fn slot(&self, kind: CredentialKind) -> Option<CredentialId> {
        match kind {
            CredentialKind::Machine => self.credential,
            CredentialKind::Vault => self.vault_credential,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unified_job_template: Option<JobTemplateId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<InventoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Vec<CredentialId>>,
}

impl SchedulePayload {
    /// True when the payload carries launch-time overrides
    pub fn has_launch_overrides(&self) -> bool {
        self.inventory.is_some() || self.credentials.is_some()
    }
}

/// Values prompted for when a job template is launched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<InventoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<CredentialId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_credential: Option<CredentialId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Vec<CredentialId>>,
}

impl LaunchPayload {
    pub fn supplied_credentials(&self) -> Vec<CredentialId> {
        let mut ids: Vec<CredentialId> = self.credentials.clone().unwrap_or_default();
        ids.extend(self.credential);
        ids.extend(self.vault_credential);
        ids.sort();
        ids.dedup();
        ids
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationPayload {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectPayload {
    pub name: Option<String>,
    pub organization: Option<OrganizationId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryPayload {
    pub name: Option<String>,
    pub organization: Option<OrganizationId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialPayload {
    pub name: Option<String>,
    pub kind: Option<CredentialKind>,
    pub organization: Option<OrganizationId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelPayload {
    pub name: Option<String>,
    pub organization: Option<OrganizationId>,
}
