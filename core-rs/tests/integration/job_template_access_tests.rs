//! Integration tests for job template access
//!
//! Covers the read/use/admin ladder on a fully linked template, credential
//! attach and detach, deprecated slot validation, orphans and launch prompts.

#[path = "../common/mod.rs"]
mod common;

use common::{grant, jt_linked, orphan_job_template, role, superuser, system_auditor, user};
use rbac_core::models::{CredentialKind, JobTemplatePayload, LabelPayload, LaunchPayload};
use rbac_core::{
    AccessStore, JobTemplateAccess, JobTemplateValidator, LabelAccess, LaunchValidator,
    NewJobTemplate, Relation, ResourceAccess, RoleName,
};

fn with_project(
    project: rbac_core::ProjectId,
    f: impl FnOnce(&mut JobTemplatePayload),
) -> JobTemplatePayload {
    let mut payload = JobTemplatePayload {
        project: Some(project),
        ..Default::default()
    };
    f(&mut payload);
    payload
}

#[test]
fn test_job_template_access_superuser() {
    let store = AccessStore::default();
    let linked = jt_linked(&store);
    let admin = superuser(&store);

    let snap = store.snapshot();
    let access = JobTemplateAccess::new(&admin, &snap);
    assert!(access.can_read(snap.job_template(linked.template).unwrap()));
    assert!(access.can_add(&JobTemplatePayload::default()));
}

#[test]
fn test_job_template_access_read_level() {
    let store = AccessStore::default();
    let linked = jt_linked(&store);
    let rando = user(&store, "rando");
    grant(&store, role(linked.project, RoleName::Read), &rando);
    grant(&store, role(linked.inventory, RoleName::Read), &rando);
    grant(&store, role(linked.machine, RoleName::Read), &rando);

    let snap = store.snapshot();
    let access = JobTemplateAccess::new(&rando, &snap);
    let jt = snap.job_template(linked.template).unwrap();

    assert!(!access.can_add(&with_project(linked.project, |p| p.inventory = Some(linked.inventory))));
    assert!(!access.can_add(&with_project(linked.project, |p| p.credential = Some(linked.machine))));
    assert!(!access.can_add(&with_project(linked.project, |p| p.vault_credential = Some(linked.vault))));

    for cred in snap.credentials_of(jt) {
        assert!(!access.can_unattach(jt, cred.into(), Relation::Credentials, None));
    }
}

#[test]
fn test_job_template_access_use_level() {
    let store = AccessStore::default();
    let linked = jt_linked(&store);
    let rando = user(&store, "rando");
    grant(&store, role(linked.project, RoleName::Use), &rando);
    grant(&store, role(linked.inventory, RoleName::Use), &rando);
    grant(&store, role(linked.machine, RoleName::Use), &rando);
    grant(&store, role(linked.vault, RoleName::Use), &rando);

    let snap = store.snapshot();
    let access = JobTemplateAccess::new(&rando, &snap);
    let jt = snap.job_template(linked.template).unwrap();

    assert!(access.can_add(&with_project(linked.project, |p| p.inventory = Some(linked.inventory))));
    assert!(access.can_add(&with_project(linked.project, |p| p.credential = Some(linked.machine))));
    assert!(access.can_add(&with_project(linked.project, |p| p.vault_credential = Some(linked.vault))));

    for cred in snap.credentials_of(jt) {
        assert!(!access.can_unattach(jt, cred.into(), Relation::Credentials, None));
    }
}

#[test]
fn test_job_template_access_admin() {
    let combinations: [&[RoleName]; 2] = [
        &[RoleName::Admin],
        &[RoleName::InventoryAdmin, RoleName::ProjectAdmin],
    ];

    for role_names in combinations {
        let store = AccessStore::default();
        let linked = jt_linked(&store);
        let rando = user(&store, "rando");
        for &name in role_names {
            grant(&store, role(linked.org, name), &rando);
            // the personal credential is handed to the organization the way
            // the create view does it
            store
                .transaction(|tx| tx.add_parent(role(linked.machine, RoleName::Admin), role(linked.org, name)))
                .unwrap();
        }

        let snap = store.snapshot();
        let access = JobTemplateAccess::new(&rando, &snap);
        let jt = snap.job_template(linked.template).unwrap();

        assert!(access.can_add(&with_project(linked.project, |p| p.inventory = Some(linked.inventory))));
        assert!(access.can_add(&with_project(linked.project, |p| p.credential = Some(linked.machine))));

        for cred in snap.credentials_of(jt) {
            assert!(
                access.can_unattach(jt, cred.into(), Relation::Credentials, None),
                "{:?} should detach {}",
                role_names,
                cred.name
            );
        }
        assert!(access.can_read(jt));
        assert!(access.can_delete(jt));
    }
}

#[test]
fn test_job_template_extra_credentials_prompts_access() {
    let store = AccessStore::default();
    let rando = user(&store, "rando");
    let (jt, vault) = store
        .transaction(|tx| {
            let project = tx.create_project("project", None, None)?;
            let inventory = tx.create_inventory("inventory", None, None)?;
            let machine = tx.create_credential("machine", CredentialKind::Machine, None, None)?;
            let vault = tx.create_credential("vault", CredentialKind::Vault, None, None)?;
            let mut spec = NewJobTemplate::new("test-jt");
            spec.project = Some(project);
            spec.inventory = Some(inventory);
            spec.ask_credential_on_launch = true;
            let jt = tx.create_job_template(spec, None)?;
            tx.attach_credential(jt, machine)?;
            tx.add_member(role(jt, RoleName::Execute), rando.id)?;
            Ok((jt, vault))
        })
        .unwrap();

    let snap = store.snapshot();
    let launch = LaunchPayload {
        vault_credential: Some(vault),
        ..Default::default()
    };
    let err = LaunchValidator::new(&rando, &snap)
        .validate_launch(snap.job_template(jt).unwrap(), &launch)
        .unwrap_err();
    assert!(err.is_permission_denied());
}

#[test]
fn test_job_template_cannot_add_extra_credentials() {
    let store = AccessStore::default();
    let rando = user(&store, "rando");
    let jt = orphan_job_template(&store, "jt");
    let cred = store
        .transaction(|tx| tx.create_credential("cred", CredentialKind::Machine, None, None))
        .unwrap();
    grant(&store, role(jt, RoleName::Admin), &rando);
    grant(&store, role(cred, RoleName::Read), &rando);

    let snap = store.snapshot();
    let access = JobTemplateAccess::new(&rando, &snap);
    let credential = snap.credential(cred).unwrap();
    assert!(!access.can_attach(
        snap.job_template(jt).unwrap(),
        credential.into(),
        Relation::Credentials,
        Some(&serde_json::json!({}))
    ));
}

#[test]
fn test_job_template_can_add_extra_credentials() {
    let store = AccessStore::default();
    let rando = user(&store, "rando");
    let jt = orphan_job_template(&store, "jt");
    let cred = store
        .transaction(|tx| tx.create_credential("cred", CredentialKind::Cloud, None, None))
        .unwrap();
    grant(&store, role(jt, RoleName::Admin), &rando);
    grant(&store, role(cred, RoleName::Use), &rando);

    let snap = store.snapshot();
    let access = JobTemplateAccess::new(&rando, &snap);
    assert!(access.can_attach(
        snap.job_template(jt).unwrap(),
        snap.credential(cred).unwrap().into(),
        Relation::Credentials,
        Some(&serde_json::json!({}))
    ));
}

mod vault_slot {
    use super::*;

    struct Setup {
        store: AccessStore,
        rando: rbac_core::Principal,
        project: rbac_core::ProjectId,
        vault: rbac_core::CredentialId,
        jt: rbac_core::JobTemplateId,
    }

    fn setup(attach_vault: bool) -> Setup {
        let store = AccessStore::default();
        let rando = user(&store, "rando");
        let (project, vault, jt) = store
            .transaction(|tx| {
                let project = tx.create_project("project", None, None)?;
                let vault = tx.create_credential("vault", CredentialKind::Vault, None, None)?;
                let mut spec = NewJobTemplate::new("jt");
                spec.project = Some(project);
                let jt = tx.create_job_template(spec, None)?;
                if attach_vault {
                    tx.attach_credential(jt, vault)?;
                }
                tx.add_member(role(jt, RoleName::Admin), rando.id)?;
                Ok((project, vault, jt))
            })
            .unwrap();
        Setup {
            store,
            rando,
            project,
            vault,
            jt,
        }
    }

    fn payload(s: &Setup) -> JobTemplatePayload {
        JobTemplatePayload {
            vault_credential: Some(s.vault),
            project: Some(s.project),
            playbook: Some("helloworld.yml".to_string()),
            ask_inventory_on_launch: Some(true),
            ..Default::default()
        }
    }

    #[test]
    fn test_job_template_vault_cred_check() {
        let s = setup(false);
        let snap = s.store.snapshot();
        let err = JobTemplateValidator::new(&s.rando, &snap)
            .validate(snap.job_template(s.jt), &payload(&s))
            .unwrap_err();
        assert!(err.is_permission_denied());
    }

    #[test]
    fn test_job_template_vault_cred_check_noop() {
        let s = setup(true);
        let snap = s.store.snapshot();
        JobTemplateValidator::new(&s.rando, &snap)
            .validate(snap.job_template(s.jt), &payload(&s))
            .unwrap();
    }

    #[test]
    fn test_new_jt_with_vault() {
        let store = AccessStore::default();
        let rando = user(&store, "rando");
        let (project, vault) = store
            .transaction(|tx| {
                let project = tx.create_project("project", None, None)?;
                let vault = tx.create_credential("vault", CredentialKind::Vault, None, None)?;
                tx.add_member(role(project, RoleName::Admin), rando.id)?;
                Ok((project, vault))
            })
            .unwrap();

        let snap = store.snapshot();
        let payload = JobTemplatePayload {
            name: Some("asdf".to_string()),
            vault_credential: Some(vault),
            project: Some(project),
            playbook: Some("helloworld.yml".to_string()),
            ask_inventory_on_launch: Some(true),
            ..Default::default()
        };
        let err = JobTemplateValidator::new(&rando, &snap)
            .validate(None, &payload)
            .unwrap_err();
        assert!(err.is_permission_denied());
    }
}

#[test]
fn test_orphan_jt_readable_by_system_auditor() {
    let store = AccessStore::default();
    let jt = orphan_job_template(&store, "orphan");
    let auditor = system_auditor(&store);

    let snap = store.snapshot();
    let template = snap.job_template(jt).unwrap();
    assert!(template.project.is_none());

    let access = JobTemplateAccess::new(&auditor, &snap);
    assert!(access.can_read(template));
    assert!(!access.can_delete(template));
    assert!(!access.can_change(template, None));
}

#[test]
fn test_job_template_creator_access() {
    let store = AccessStore::default();
    let rando = user(&store, "rando");
    let project = store
        .transaction(|tx| tx.create_project("project", None, None))
        .unwrap();
    grant(&store, role(project, RoleName::Admin), &rando);

    let payload = JobTemplatePayload {
        name: Some("newly-created-jt".to_string()),
        project: Some(project),
        playbook: Some("helloworld.yml".to_string()),
        ask_inventory_on_launch: Some(true),
        ask_credential_on_launch: Some(true),
        ..Default::default()
    };
    let snap = store.snapshot();
    JobTemplateValidator::new(&rando, &snap)
        .validate(None, &payload)
        .unwrap();

    let jt = store
        .transaction(|tx| {
            let mut spec = NewJobTemplate::new("newly-created-jt");
            spec.project = Some(project);
            spec.ask_inventory_on_launch = true;
            spec.ask_credential_on_launch = true;
            tx.create_job_template(spec, Some(rando.id))
        })
        .unwrap();

    let snap = store.snapshot();
    assert!(snap.has_role(rando.id, role(jt, RoleName::Admin)));
}

#[test]
fn test_associate_label() {
    let store = AccessStore::default();
    let joe = user(&store, "joe");
    let jt = orphan_job_template(&store, "jt");
    let (org, label) = store
        .transaction(|tx| {
            let org = tx.create_organization("label-org", None)?;
            let label = tx.create_label("prod", org)?;
            Ok((org, label))
        })
        .unwrap();
    grant(&store, role(jt, RoleName::Admin), &joe);
    grant(&store, role(org, RoleName::Read), &joe);

    let snap = store.snapshot();
    let access = JobTemplateAccess::new(&joe, &snap);
    let label = snap.label(label).unwrap();
    assert!(access.can_attach(snap.job_template(jt).unwrap(), label.into(), Relation::Labels, None));

    // reading the label alone does not allow creating labels in its org
    let labels = LabelAccess::new(&joe, &snap);
    assert!(!labels.can_add(&LabelPayload {
        name: Some("new".to_string()),
        organization: Some(org),
    }));
}
