//! Resource instances
//!
//! Every resource except organizations and labels may be orphaned: its
//! `organization` (or, for job templates, `project`) is `None`.

use crate::capability::CapabilityOverrides;
use crate::ids::{
    CredentialId, InventoryId, JobTemplateId, LabelId, OrganizationId, PrincipalId, ProjectId,
    ScheduleId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub organization: Option<OrganizationId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub id: InventoryId,
    pub name: String,
    pub organization: Option<OrganizationId>,
    pub created_at: DateTime<Utc>,
}

/// Credential category
///
/// A job template may hold at most one `Machine` (the deprecated primary ssh
/// slot) and one `Vault` credential; other kinds are unrestricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialKind {
    #[serde(alias = "ssh")]
    Machine,
    Vault,
    Net,
    Cloud,
    Scm,
    Insights,
}

impl CredentialKind {
    /// Kinds that occupy a single deprecated slot on a job template
    pub fn is_single_slot(&self) -> bool {
        matches!(self, CredentialKind::Machine | CredentialKind::Vault)
    }

    pub fn slot_field(&self) -> Option<&'static str> {
        match self {
            CredentialKind::Machine => Some("credential"),
            CredentialKind::Vault => Some("vault_credential"),
            _ => None,
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CredentialKind::Machine => "machine",
            CredentialKind::Vault => "vault",
            CredentialKind::Net => "net",
            CredentialKind::Cloud => "cloud",
            CredentialKind::Scm => "scm",
            CredentialKind::Insights => "insights",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub id: CredentialId,
    pub name: String,
    pub kind: CredentialKind,
    pub organization: Option<OrganizationId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTemplate {
    pub id: JobTemplateId,
    pub name: String,
    pub project: Option<ProjectId>,
    pub inventory: Option<InventoryId>,
    pub playbook: String,
    pub credentials: BTreeSet<CredentialId>,
    pub labels: BTreeSet<LabelId>,
    pub ask_inventory_on_launch: bool,
    pub ask_credential_on_launch: bool,
    /// Stored capability answers that take precedence over live checks
    /// when capabilities are reported to presentation layers.
    #[serde(default)]
    pub capabilities_cache: CapabilityOverrides,
    pub created_at: DateTime<Utc>,
}

impl JobTemplate {
    /// A template with no project has lost its ownership chain
    pub fn is_orphaned(&self) -> bool {
        self.project.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub name: String,
    pub unified_job_template: JobTemplateId,
    pub rrule: String,
    pub enabled: bool,
    /// Launch-time overrides
    pub inventory: Option<InventoryId>,
    pub credentials: BTreeSet<CredentialId>,
    pub created_by: Option<PrincipalId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub name: String,
    pub organization: OrganizationId,
    pub created_at: DateTime<Utc>,
}
