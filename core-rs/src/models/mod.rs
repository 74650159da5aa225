//! Data model: principals, resources and the payloads callers submit
//!
//! Resource instances are plain data owned by the store's `World`. Ownership
//! pointers (`organization`, `project`, `inventory`) are ids, resolved against
//! the snapshot at decision time so that a reassignment is visible to the
//! very next check.

pub mod payload;
pub mod principal;
pub mod resources;

pub use payload::{
    CredentialPayload, InventoryPayload, JobTemplatePayload, LabelPayload, LaunchPayload,
    OrganizationPayload, ProjectPayload, SchedulePayload,
};
pub use principal::Principal;
pub use resources::{
    Credential, CredentialKind, Inventory, JobTemplate, Label, Organization, Project, Schedule,
};

use crate::ids::{
    CredentialId, InventoryId, JobTemplateId, LabelId, OrganizationId, ProjectId, ScheduleId,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource types known to the access core
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Organization,
    Project,
    Inventory,
    Credential,
    JobTemplate,
    Schedule,
    Label,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Organization => "organization",
            ResourceKind::Project => "project",
            ResourceKind::Inventory => "inventory",
            ResourceKind::Credential => "credential",
            ResourceKind::JobTemplate => "job_template",
            ResourceKind::Schedule => "schedule",
            ResourceKind::Label => "label",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed pointer to one resource instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ResourceRef {
    Organization(OrganizationId),
    Project(ProjectId),
    Inventory(InventoryId),
    Credential(CredentialId),
    JobTemplate(JobTemplateId),
    Schedule(ScheduleId),
    Label(LabelId),
}

impl ResourceRef {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceRef::Organization(_) => ResourceKind::Organization,
            ResourceRef::Project(_) => ResourceKind::Project,
            ResourceRef::Inventory(_) => ResourceKind::Inventory,
            ResourceRef::Credential(_) => ResourceKind::Credential,
            ResourceRef::JobTemplate(_) => ResourceKind::JobTemplate,
            ResourceRef::Schedule(_) => ResourceKind::Schedule,
            ResourceRef::Label(_) => ResourceKind::Label,
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceRef::Organization(id) => write!(f, "organization:{}", id),
            ResourceRef::Project(id) => write!(f, "project:{}", id),
            ResourceRef::Inventory(id) => write!(f, "inventory:{}", id),
            ResourceRef::Credential(id) => write!(f, "credential:{}", id),
            ResourceRef::JobTemplate(id) => write!(f, "job_template:{}", id),
            ResourceRef::Schedule(id) => write!(f, "schedule:{}", id),
            ResourceRef::Label(id) => write!(f, "label:{}", id),
        }
    }
}

impl From<OrganizationId> for ResourceRef {
    fn from(id: OrganizationId) -> Self {
        ResourceRef::Organization(id)
    }
}

impl From<ProjectId> for ResourceRef {
    fn from(id: ProjectId) -> Self {
        ResourceRef::Project(id)
    }
}

impl From<InventoryId> for ResourceRef {
    fn from(id: InventoryId) -> Self {
        ResourceRef::Inventory(id)
    }
}

impl From<CredentialId> for ResourceRef {
    fn from(id: CredentialId) -> Self {
        ResourceRef::Credential(id)
    }
}

impl From<JobTemplateId> for ResourceRef {
    fn from(id: JobTemplateId) -> Self {
        ResourceRef::JobTemplate(id)
    }
}

impl From<ScheduleId> for ResourceRef {
    fn from(id: ScheduleId) -> Self {
        ResourceRef::Schedule(id)
    }
}

impl From<LabelId> for ResourceRef {
    fn from(id: LabelId) -> Self {
        ResourceRef::Label(id)
    }
}
