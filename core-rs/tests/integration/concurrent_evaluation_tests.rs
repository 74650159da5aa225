//! Concurrent evaluation against snapshots while ownership changes
//!
//! Readers never take a lock for a decision; each works on the snapshot it
//! grabbed. Every snapshot must show a project and inventory that moved in
//! one transaction as having moved together.

#[path = "../common/mod.rs"]
mod common;

use common::{grant, jt_linked, role, user};
use rbac_core::{AccessStore, JobTemplateAccess, ResourceAccess, RoleName};
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_see_consistent_snapshots_during_transfers() -> anyhow::Result<()> {
    let store = Arc::new(AccessStore::default());
    let linked = jt_linked(&store);
    let admin1 = user(&store, "admin1");
    grant(&store, role(linked.org, RoleName::Admin), &admin1);
    let org2 = store.transaction(|tx| tx.create_organization("org2", None))?;
    let (org1, project, inventory, template) =
        (linked.org, linked.project, linked.inventory, linked.template);

    let writer = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            for i in 0..50 {
                let target = if i % 2 == 0 { org2 } else { org1 };
                store
                    .transaction(|tx| {
                        tx.set_project_organization(project, Some(target))?;
                        tx.set_inventory_organization(inventory, Some(target))
                    })
                    .unwrap();
                tokio::task::yield_now().await;
            }
        })
    };

    let mut readers = Vec::new();
    for _ in 0..8 {
        let store = Arc::clone(&store);
        let admin1 = admin1.clone();
        readers.push(tokio::spawn(async move {
            let mut checked = 0;
            for _ in 0..100 {
                let snap = store.snapshot();
                let project_org = snap.project(project).unwrap().organization;
                let inventory_org = snap.inventory(inventory).unwrap().organization;
                assert_eq!(project_org, inventory_org, "torn transfer at revision {}", snap.revision());

                let jt = snap.job_template(template).unwrap();
                let can_read = JobTemplateAccess::new(&admin1, &snap).can_read(jt);
                assert_eq!(can_read, project_org == Some(org1));
                checked += 1;
                tokio::task::yield_now().await;
            }
            checked
        }));
    }

    writer.await?;
    for reader in readers {
        assert_eq!(reader.await?, 100);
    }
    assert_eq!(store.snapshot().project(project).map(|p| p.organization), Some(Some(org1)));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_checks_never_write() {
    let store = Arc::new(AccessStore::default());
    let linked = jt_linked(&store);
    let rando = user(&store, "rando");
    let template = linked.template;
    let revision = store.revision();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let rando = rando.clone();
            tokio::task::spawn_blocking(move || {
                let snap = store.snapshot();
                let access = JobTemplateAccess::new(&rando, &snap);
                let jt = snap.job_template(template).unwrap();
                (access.can_read(jt), access.can_delete(jt), access.can_start(jt, None))
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), (false, false, false));
    }
    assert_eq!(store.revision(), revision);
}
