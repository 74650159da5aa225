//! Role names and role identities
//!
//! A role is a named capability bucket scoped to exactly one resource
//! instance. Its identity is the pair (resource, name), so roles never need a
//! table of their own: a role exists whenever its resource exists and the
//! name is part of that resource kind's catalogue.

use crate::errors::AccessError;
use crate::models::{ResourceKind, ResourceRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    Admin,
    Member,
    Auditor,
    Execute,
    ProjectAdmin,
    InventoryAdmin,
    CredentialAdmin,
    JobTemplateAdmin,
    Read,
    Use,
    Update,
    Adhoc,
}

const ORGANIZATION_ROLES: &[RoleName] = &[
    RoleName::Admin,
    RoleName::Member,
    RoleName::Auditor,
    RoleName::Execute,
    RoleName::ProjectAdmin,
    RoleName::InventoryAdmin,
    RoleName::CredentialAdmin,
    RoleName::JobTemplateAdmin,
    RoleName::Read,
];

const PROJECT_ROLES: &[RoleName] = &[RoleName::Admin, RoleName::Use, RoleName::Update, RoleName::Read];

const INVENTORY_ROLES: &[RoleName] = &[
    RoleName::Admin,
    RoleName::Update,
    RoleName::Adhoc,
    RoleName::Use,
    RoleName::Read,
];

const CREDENTIAL_ROLES: &[RoleName] = &[RoleName::Admin, RoleName::Use, RoleName::Read];

const JOB_TEMPLATE_ROLES: &[RoleName] = &[RoleName::Admin, RoleName::Execute, RoleName::Read];

impl RoleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "admin",
            RoleName::Member => "member",
            RoleName::Auditor => "auditor",
            RoleName::Execute => "execute",
            RoleName::ProjectAdmin => "project_admin",
            RoleName::InventoryAdmin => "inventory_admin",
            RoleName::CredentialAdmin => "credential_admin",
            RoleName::JobTemplateAdmin => "job_template_admin",
            RoleName::Read => "read",
            RoleName::Use => "use",
            RoleName::Update => "update",
            RoleName::Adhoc => "adhoc",
        }
    }

    /// Roles defined on each resource kind. Schedules and labels have none.
    pub fn catalogue(kind: ResourceKind) -> &'static [RoleName] {
        match kind {
            ResourceKind::Organization => ORGANIZATION_ROLES,
            ResourceKind::Project => PROJECT_ROLES,
            ResourceKind::Inventory => INVENTORY_ROLES,
            ResourceKind::Credential => CREDENTIAL_ROLES,
            ResourceKind::JobTemplate => JOB_TEMPLATE_ROLES,
            ResourceKind::Schedule | ResourceKind::Label => &[],
        }
    }

    pub fn defined_on(&self, kind: ResourceKind) -> bool {
        RoleName::catalogue(kind).contains(self)
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_role", self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = AccessError;

    /// Accepts both `admin` and `admin_role`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_suffix("_role").unwrap_or(s);
        let role = match name {
            "admin" => RoleName::Admin,
            "member" => RoleName::Member,
            "auditor" => RoleName::Auditor,
            "execute" => RoleName::Execute,
            "project_admin" => RoleName::ProjectAdmin,
            "inventory_admin" => RoleName::InventoryAdmin,
            "credential_admin" => RoleName::CredentialAdmin,
            "job_template_admin" => RoleName::JobTemplateAdmin,
            "read" => RoleName::Read,
            "use" => RoleName::Use,
            "update" => RoleName::Update,
            "adhoc" => RoleName::Adhoc,
            other => {
                return Err(AccessError::UnknownRole {
                    kind: "any".to_string(),
                    role: other.to_string(),
                })
            }
        };
        Ok(role)
    }
}

/// One role on one resource instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleId {
    pub resource: ResourceRef,
    pub name: RoleName,
}

impl RoleId {
    pub fn new(resource: impl Into<ResourceRef>, name: RoleName) -> Self {
        RoleId {
            resource: resource.into(),
            name,
        }
    }

    /// Errors when the role name is not in the resource kind's catalogue
    pub fn checked(resource: impl Into<ResourceRef>, name: RoleName) -> Result<Self, AccessError> {
        let resource = resource.into();
        if !name.defined_on(resource.kind()) {
            return Err(AccessError::UnknownRole {
                kind: resource.kind().to_string(),
                role: name.to_string(),
            });
        }
        Ok(RoleId { resource, name })
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource, self.name)
    }
}
