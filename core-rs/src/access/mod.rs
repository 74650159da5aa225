//! Policy Evaluator
//!
//! One policy type per resource kind, all implementing [`ResourceAccess`].
//! A policy is built from an authenticated [`Principal`] and a store
//! [`Snapshot`]; every `can_*` call is a pure read of that snapshot and
//! returns a plain `bool` so checks compose. Turning `false` into an error
//! is the job of [`crate::validation`].
//!
//! Evaluation order inside each check:
//!
//! 1. the global superuser/auditor bypass ([`bypass::global_override`]);
//! 2. the per-type rule, which asks the role graph about the resource and
//!    any referenced resources.

pub mod base;
pub mod bypass;
pub mod credential;
pub mod inventory;
pub mod job_template;
pub mod label;
pub mod launch_config;
pub mod organization;
pub mod project;
pub mod schedule;

pub use bypass::{global_override, Action};
pub use credential::CredentialAccess;
pub use inventory::InventoryAccess;
pub use job_template::JobTemplateAccess;
pub use label::LabelAccess;
pub use launch_config::{JobLaunchConfigAccess, LaunchConfigPolicy};
pub use organization::OrganizationAccess;
pub use project::ProjectAccess;
pub use schedule::ScheduleAccess;

use crate::capability::Capability;
use crate::config::AccessConfig;
use crate::errors::AccessError;
use crate::models::{Credential, Label, Principal, ResourceRef};
use crate::rbac::{RoleId, RoleName};
use crate::store::{Snapshot, World};
use std::fmt;
use std::str::FromStr;

/// Who is asking, and against which consistent view
#[derive(Debug, Clone, Copy)]
pub struct AccessContext<'a> {
    principal: &'a Principal,
    snapshot: &'a Snapshot,
}

impl<'a> AccessContext<'a> {
    pub fn new(principal: &'a Principal, snapshot: &'a Snapshot) -> Self {
        AccessContext { principal, snapshot }
    }

    pub fn principal(&self) -> &'a Principal {
        self.principal
    }

    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    pub fn world(&self) -> &'a World {
        self.snapshot.world()
    }

    pub fn config(&self) -> &'a AccessConfig {
        self.snapshot.config()
    }

    pub fn is_superuser(&self) -> bool {
        self.principal.is_superuser
    }

    pub fn bypass(&self, action: Action) -> Option<bool> {
        global_override(self.principal, action)
    }

    /// Does the principal hold `name` on `resource`
    pub fn has(&self, resource: impl Into<ResourceRef>, name: RoleName) -> bool {
        self.world()
            .has_role(self.principal.id, RoleId::new(resource, name))
    }
}

/// Many-to-many relations that support attach/unattach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Credentials,
    Labels,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Credentials => "credentials",
            Relation::Labels => "labels",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relation {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credentials" => Ok(Relation::Credentials),
            "labels" => Ok(Relation::Labels),
            other => Err(AccessError::InvalidRelation(other.to_string())),
        }
    }
}

/// The far side of an attach/unattach
#[derive(Debug, Clone, Copy)]
pub enum SubObject<'o> {
    Credential(&'o Credential),
    Label(&'o Label),
}

impl SubObject<'_> {
    pub fn resource_ref(&self) -> ResourceRef {
        match self {
            SubObject::Credential(c) => c.id.into(),
            SubObject::Label(l) => l.id.into(),
        }
    }

    /// Relation this kind of sub-object belongs to
    pub fn relation(&self) -> Relation {
        match self {
            SubObject::Credential(_) => Relation::Credentials,
            SubObject::Label(_) => Relation::Labels,
        }
    }
}

impl<'o> From<&'o Credential> for SubObject<'o> {
    fn from(credential: &'o Credential) -> Self {
        SubObject::Credential(credential)
    }
}

impl<'o> From<&'o Label> for SubObject<'o> {
    fn from(label: &'o Label) -> Self {
        SubObject::Label(label)
    }
}

/// Operations every per-type policy answers
pub trait ResourceAccess {
    type Object;
    type Payload;

    fn context(&self) -> &AccessContext<'_>;

    fn can_read(&self, obj: &Self::Object) -> bool;

    fn can_add(&self, payload: &Self::Payload) -> bool;

    /// `payload` is `None` when asking whether the instance is editable at
    /// all, without a concrete change in hand.
    fn can_change(&self, obj: &Self::Object, payload: Option<&Self::Payload>) -> bool;

    fn can_delete(&self, obj: &Self::Object) -> bool;

    fn can_attach(
        &self,
        _obj: &Self::Object,
        _sub_object: SubObject<'_>,
        _relation: Relation,
        _data: Option<&serde_json::Value>,
    ) -> bool {
        false
    }

    fn can_unattach(
        &self,
        _obj: &Self::Object,
        _sub_object: SubObject<'_>,
        _relation: Relation,
        _data: Option<&serde_json::Value>,
    ) -> bool {
        false
    }

    /// Live answer for one presentation-layer capability
    fn capability(&self, obj: &Self::Object, capability: Capability) -> bool {
        match capability {
            Capability::Edit => self.can_change(obj, None),
            Capability::Delete => self.can_delete(obj),
            _ => false,
        }
    }
}
