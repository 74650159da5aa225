// Capability Override Contract Tests
//
// Stored capability answers and the per-request cache sit in front of the
// live policy checks. These contracts keep them from drifting into a second
// source of truth.
//
// **Problem**: a cached or stored answer outlives the state it described
// **Solution**: contracts on precedence, cache lifetime and read-only checks

#[path = "../common/mod.rs"]
mod common;

use common::{grant, jt_linked, role, user};
use rbac_core::models::LaunchPayload;
use rbac_core::{
    get_user_capabilities, AccessStore, Capability, CapabilityCache, CapabilityOverrides,
    JobTemplateAccess, OrganizationId, ResourceAccess, RoleName,
};

/// WHY: A stored override answers for its capability, whoever asks
/// REASON: Listing endpoints precompute answers; recomputing would disagree
/// BREAKS: UI consistency between list and detail views
#[test]
fn stored_override_beats_live_admin() {
    let store = AccessStore::default();
    let linked = jt_linked(&store);
    let admin = user(&store, "admin");
    grant(&store, role(linked.template, RoleName::Admin), &admin);

    let mut overrides = CapabilityOverrides::new();
    overrides.insert(Capability::Delete, false);
    store
        .transaction(|tx| tx.set_capability_overrides(linked.template, overrides))
        .unwrap();

    let snap = store.snapshot();
    let access = JobTemplateAccess::new(&admin, &snap);
    let jt = snap.job_template(linked.template).unwrap();
    let capabilities =
        get_user_capabilities(&access, jt, &[Capability::Edit, Capability::Delete], None);

    assert!(!capabilities[&Capability::Delete]);
    // only the stored capability is pinned
    assert!(capabilities[&Capability::Edit]);
    assert!(access.can_delete(jt), "the live check itself is untouched");
}

/// WHY: The cache is scoped to one revision of the store
/// REASON: Any commit may change grants; old answers are not evidence
/// BREAKS: Revocation if a cached `true` survives a transfer
#[test]
fn cache_never_survives_a_commit() {
    let store = AccessStore::default();
    let linked = jt_linked(&store);
    let alice = user(&store, "alice");
    grant(&store, role(linked.org, RoleName::Admin), &alice);
    let other: OrganizationId = store
        .transaction(|tx| tx.create_organization("other", None))
        .unwrap();

    let mut cache = CapabilityCache::new(alice.id);

    let snap = store.snapshot();
    let access = JobTemplateAccess::new(&alice, &snap);
    let jt = snap.job_template(linked.template).unwrap();
    let first = get_user_capabilities(&access, jt, &[Capability::Edit], Some(&mut cache));
    assert!(first[&Capability::Edit]);
    assert!(!cache.is_empty());

    store
        .transaction(|tx| {
            tx.set_project_organization(linked.project, Some(other))?;
            tx.set_inventory_organization(linked.inventory, Some(other))
        })
        .unwrap();

    let snap = store.snapshot();
    let access = JobTemplateAccess::new(&alice, &snap);
    let jt = snap.job_template(linked.template).unwrap();
    let second = get_user_capabilities(&access, jt, &[Capability::Edit], Some(&mut cache));
    assert!(!second[&Capability::Edit]);
}

/// WHY: Asking a question must not change the answer to any other question
/// REASON: Checks run concurrently on shared snapshots
/// BREAKS: Reproducibility of decisions and the revision counter
#[test]
fn checks_never_commit() {
    let store = AccessStore::default();
    let linked = jt_linked(&store);
    let alice = user(&store, "alice");
    grant(&store, role(linked.template, RoleName::Execute), &alice);
    let revision = store.revision();
    let committed_at = store.last_committed_at();

    let snap = store.snapshot();
    let access = JobTemplateAccess::new(&alice, &snap);
    let jt = snap.job_template(linked.template).unwrap();
    let mut cache = CapabilityCache::new(alice.id);
    for _ in 0..3 {
        access.can_read(jt);
        access.can_change(jt, None);
        access.can_start(jt, Some(&LaunchPayload::default()));
        access.can_copy(jt);
        get_user_capabilities(&access, jt, &Capability::ALL, Some(&mut cache));
    }

    assert_eq!(store.revision(), revision);
    assert_eq!(store.last_committed_at(), committed_at);
}
