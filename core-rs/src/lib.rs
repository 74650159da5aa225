//! # rbac-core - access decisions for an automation controller
//!
//! Decides, for a (principal, action, resource) triple, whether the action
//! is permitted. Resources form an ownership hierarchy (organizations own
//! projects, inventories, credentials and labels; job templates reference a
//! project and an inventory; schedules launch a job template) and every
//! resource carries a small catalogue of roles that inherit from one another.
//!
//! ## Flow
//!
//! ```text
//!   caller ──▶ validation ──▶ access policy ──▶ bypass (superuser/auditor)
//!                                   │
//!                                   ▼
//!                         rbac::grants over a store Snapshot
//!                          (explicit edges + edges derived
//!                           from the live hierarchy)
//! ```
//!
//! All checks read one immutable [`store::Snapshot`], so any number of them
//! can run concurrently while writers commit new revisions through
//! [`store::AccessStore::transaction`].

pub mod access;
pub mod capability;
pub mod config;
pub mod errors;
pub mod hierarchy;
pub mod ids;
pub mod logging;
pub mod models;
pub mod rbac;
pub mod store;
pub mod validation;

pub use access::{
    AccessContext, Action, CredentialAccess, InventoryAccess, JobLaunchConfigAccess,
    JobTemplateAccess, LabelAccess, LaunchConfigPolicy, OrganizationAccess, ProjectAccess,
    Relation, ResourceAccess, ScheduleAccess, SubObject,
};
pub use capability::{get_user_capabilities, Capability, CapabilityCache, CapabilityOverrides};
pub use config::{AccessConfig, SlotResubmitPolicy};
pub use errors::{AccessError, ErrorKind};
pub use hierarchy::{HierarchyResolver, OwnershipChain};
pub use ids::{
    CredentialId, InventoryId, JobTemplateId, LabelId, OrganizationId, PrincipalId, ProjectId,
    ScheduleId,
};
pub use logging::init_logging;
pub use models::{Principal, ResourceKind, ResourceRef};
pub use rbac::{RoleId, RoleName};
pub use store::{AccessStore, NewJobTemplate, NewSchedule, Snapshot, Transaction};
pub use validation::{JobTemplateValidator, LaunchValidator, ScheduleValidator};

/// Crate version, reported in logs at startup
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
