//! Shared fixtures for the integration and contract suites
//!
//! Included from each test crate with `#[path = "../common/mod.rs"]`.

#![allow(dead_code)]

use rbac_core::models::CredentialKind;
use rbac_core::{
    AccessStore, CredentialId, InventoryId, JobTemplateId, NewJobTemplate, OrganizationId,
    Principal, ProjectId, RoleId, RoleName,
};

pub const RRULE: &str = "DTSTART:20151117T050000Z RRULE:FREQ=DAILY;INTERVAL=1;COUNT=1";
pub const RRULE2: &str = "DTSTART:20151117T050000Z RRULE:FREQ=WEEKLY;INTERVAL=1;COUNT=1";

/// A job template with a reasonably complete set of related objects
pub struct Linked {
    pub org: OrganizationId,
    pub project: ProjectId,
    pub inventory: InventoryId,
    /// Personal machine credential, not owned by any organization
    pub machine: CredentialId,
    pub vault: CredentialId,
    pub net: CredentialId,
    pub cloud: CredentialId,
    pub template: JobTemplateId,
}

impl Linked {
    pub fn credentials(&self) -> [CredentialId; 4] {
        [self.machine, self.vault, self.net, self.cloud]
    }
}

pub fn user(store: &AccessStore, name: &str) -> Principal {
    store.add_principal(Principal::new(name)).unwrap()
}

pub fn system_auditor(store: &AccessStore) -> Principal {
    store.add_principal(Principal::system_auditor("auditor")).unwrap()
}

pub fn superuser(store: &AccessStore) -> Principal {
    store.add_principal(Principal::superuser("admin")).unwrap()
}

pub fn grant(store: &AccessStore, role: RoleId, principal: &Principal) {
    store
        .transaction(|tx| tx.add_member(role, principal.id))
        .unwrap();
}

/// org1 owning proj1 and inventory1, and a template using them with a
/// machine, vault, net and cloud credential attached
pub fn jt_linked(store: &AccessStore) -> Linked {
    store
        .transaction(|tx| {
            let org = tx.create_organization("org1", None)?;
            let project = tx.create_project("proj1", Some(org), None)?;
            let inventory = tx.create_inventory("inventory1", Some(org), None)?;
            let machine = tx.create_credential("cred1", CredentialKind::Machine, None, None)?;
            let vault = tx.create_credential("vault-cred", CredentialKind::Vault, Some(org), None)?;
            let net = tx.create_credential("net-cred", CredentialKind::Net, Some(org), None)?;
            let cloud = tx.create_credential("aws-cred", CredentialKind::Cloud, Some(org), None)?;

            let mut spec = NewJobTemplate::new("testJT");
            spec.project = Some(project);
            spec.inventory = Some(inventory);
            spec.credentials = vec![machine];
            let template = tx.create_job_template(spec, None)?;
            tx.attach_credential(template, vault)?;
            tx.attach_credential(template, cloud)?;
            tx.attach_credential(template, net)?;

            Ok(Linked {
                org,
                project,
                inventory,
                machine,
                vault,
                net,
                cloud,
                template,
            })
        })
        .unwrap()
}

/// A bare template with no project or inventory
pub fn orphan_job_template(store: &AccessStore, name: &str) -> JobTemplateId {
    store
        .transaction(|tx| tx.create_job_template(NewJobTemplate::new(name), None))
        .unwrap()
}

pub fn role(resource: impl Into<rbac_core::ResourceRef>, name: RoleName) -> RoleId {
    RoleId::new(resource, name)
}
