//! Integration tests for organization ownership transfer
//!
//! Grants derived through an organization follow the resource to its new
//! owner in the same commit; older snapshots keep answering for the state
//! they captured.

#[path = "../common/mod.rs"]
mod common;

use common::{grant, jt_linked, role, system_auditor, user};
use rbac_core::hierarchy::HierarchyResolver;
use rbac_core::{AccessError, AccessStore, JobTemplateAccess, OrganizationId, ResourceAccess, RoleName};

#[test]
fn test_jt_org_ownership_change() {
    let store = AccessStore::default();
    let linked = jt_linked(&store);

    let admin1 = user(&store, "admin1");
    grant(&store, role(linked.org, RoleName::Admin), &admin1);

    {
        let snap = store.snapshot();
        let jt = snap.job_template(linked.template).unwrap();
        assert!(JobTemplateAccess::new(&admin1, &snap).can_read(jt));
    }

    let admin2 = user(&store, "admin2");
    let org2 = store
        .transaction(|tx| tx.create_organization("mrroboto", None))
        .unwrap();
    grant(&store, role(org2, RoleName::Admin), &admin2);

    {
        let snap = store.snapshot();
        let jt = snap.job_template(linked.template).unwrap();
        assert!(!JobTemplateAccess::new(&admin2, &snap).can_read(jt));
    }

    store
        .transaction(|tx| {
            tx.set_project_organization(linked.project, Some(org2))?;
            tx.set_inventory_organization(linked.inventory, Some(org2))
        })
        .unwrap();

    let snap = store.snapshot();
    let jt = snap.job_template(linked.template).unwrap();
    assert!(JobTemplateAccess::new(&admin2, &snap).can_read(jt));
    assert!(!JobTemplateAccess::new(&admin1, &snap).can_read(jt));
    assert_eq!(snap.organization_of(linked.template.into()), Some(org2));
}

#[test]
fn test_earlier_snapshot_keeps_old_answer() {
    let store = AccessStore::default();
    let linked = jt_linked(&store);
    let admin1 = user(&store, "admin1");
    grant(&store, role(linked.org, RoleName::Admin), &admin1);
    let org2 = store
        .transaction(|tx| tx.create_organization("org2", None))
        .unwrap();

    let before = store.snapshot();
    store
        .transaction(|tx| {
            tx.set_project_organization(linked.project, Some(org2))?;
            tx.set_inventory_organization(linked.inventory, Some(org2))
        })
        .unwrap();
    let after = store.snapshot();

    let old = before.job_template(linked.template).unwrap();
    let new = after.job_template(linked.template).unwrap();
    assert!(JobTemplateAccess::new(&admin1, &before).can_read(old));
    assert!(!JobTemplateAccess::new(&admin1, &after).can_read(new));
    assert!(after.revision() > before.revision());
}

#[test]
fn test_failed_transfer_changes_nothing() {
    let store = AccessStore::default();
    let linked = jt_linked(&store);
    let admin1 = user(&store, "admin1");
    grant(&store, role(linked.org, RoleName::Admin), &admin1);
    let revision = store.revision();

    // the project moves first, then the inventory move fails
    let err = store
        .transaction(|tx| {
            let org2 = tx.create_organization("org2", None)?;
            tx.set_project_organization(linked.project, Some(org2))?;
            tx.set_inventory_organization(linked.inventory, Some(OrganizationId::new()))
        })
        .unwrap_err();
    assert!(matches!(err, AccessError::NotFound { .. }));

    let snap = store.snapshot();
    assert_eq!(snap.revision(), revision);
    assert_eq!(snap.project(linked.project).unwrap().organization, Some(linked.org));
    assert!(JobTemplateAccess::new(&admin1, &snap).can_read(snap.job_template(linked.template).unwrap()));
}

#[test]
fn test_half_transfer_splits_template_admin() {
    let store = AccessStore::default();
    let linked = jt_linked(&store);
    let org2 = store
        .transaction(|tx| tx.create_organization("org2", None))
        .unwrap();
    let admin2 = user(&store, "admin2");
    grant(&store, role(org2, RoleName::Admin), &admin2);

    store
        .transaction(|tx| tx.set_inventory_organization(linked.inventory, Some(org2)))
        .unwrap();

    // the inventory's organization contributes its inventory admins
    let snap = store.snapshot();
    let jt = snap.job_template(linked.template).unwrap();
    let access = JobTemplateAccess::new(&admin2, &snap);
    assert!(access.can_read(jt));
    assert!(access.can_change(jt, None));
    assert!(snap.resolve(linked.template.into()).organizations().contains(&org2));
}

#[test]
fn test_deleting_organization_orphans_its_resources() {
    let store = AccessStore::default();
    let linked = jt_linked(&store);
    let admin1 = user(&store, "admin1");
    let auditor = system_auditor(&store);
    grant(&store, role(linked.org, RoleName::Admin), &admin1);

    store
        .transaction(|tx| tx.delete_organization(linked.org))
        .unwrap();

    let snap = store.snapshot();
    let jt = snap.job_template(linked.template).unwrap();
    assert!(snap.project(linked.project).unwrap().organization.is_none());
    assert!(!JobTemplateAccess::new(&admin1, &snap).can_read(jt));
    assert!(JobTemplateAccess::new(&auditor, &snap).can_read(jt));
    assert!(!JobTemplateAccess::new(&auditor, &snap).can_delete(jt));
}
