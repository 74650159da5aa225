//! Job template policy
//!
//! Creation and edits need `use` on every newly referenced project,
//! inventory and credential. Edits, deletes and detaching need `admin` on the
//! template itself; launching needs `execute`.

use crate::access::base::{can_use_all, changed, deny};
use crate::access::bypass::Action;
use crate::access::label::LabelAccess;
use crate::access::{AccessContext, Relation, ResourceAccess, SubObject};
use crate::capability::Capability;
use crate::models::{
    CredentialKind, JobTemplate, JobTemplatePayload, LaunchPayload, Principal, ResourceKind,
    ResourceRef,
};
use crate::rbac::RoleName;
use crate::store::{Snapshot, World};
use std::collections::BTreeSet;

pub struct JobTemplateAccess<'a> {
    ctx: AccessContext<'a>,
}

impl<'a> JobTemplateAccess<'a> {
    pub fn new(principal: &'a Principal, snapshot: &'a Snapshot) -> Self {
        JobTemplateAccess {
            ctx: AccessContext::new(principal, snapshot),
        }
    }

    fn world(&self) -> &'a World {
        self.ctx.world()
    }

    /// `use` on every reference in `payload` that `current` does not
    /// already hold. Unchanged fields are not re-checked.
    fn can_use_references(
        &self,
        action: Action,
        current: Option<&JobTemplate>,
        payload: &JobTemplatePayload,
    ) -> bool {
        let mut references: Vec<ResourceRef> = Vec::new();
        references.extend(changed(payload.project, current.and_then(|jt| jt.project)).map(ResourceRef::from));
        references.extend(changed(payload.inventory, current.and_then(|jt| jt.inventory)).map(ResourceRef::from));
        for credential in payload.referenced_credentials() {
            let attached = current.is_some_and(|jt| jt.credentials.contains(&credential));
            if !attached {
                references.push(credential.into());
            }
        }
        can_use_all(&self.ctx, action, references)
    }

    /// May the principal launch `template`, optionally with prompted values.
    ///
    /// A prompted inventory must be allowed by `ask_inventory_on_launch`.
    /// A prompted credential that is not already attached must be allowed by
    /// `ask_credential_on_launch` and must be of a kind the template already
    /// carries. Superusers skip only the `use` checks on prompted values.
    pub fn can_start(&self, template: &JobTemplate, launch: Option<&LaunchPayload>) -> bool {
        let superuser = self.ctx.is_superuser();
        if !superuser && !self.ctx.has(template.id, RoleName::Execute) {
            return deny(&self.ctx, Action::Start, template.id, "missing execute");
        }
        let launch = match launch {
            Some(launch) => launch,
            None => return true,
        };

        if let Some(inventory) = changed(launch.inventory, template.inventory) {
            if !template.ask_inventory_on_launch {
                return deny(&self.ctx, Action::Start, template.id, "inventory is not promptable");
            }
            if !superuser && !self.ctx.has(inventory, RoleName::Use) {
                return deny(&self.ctx, Action::Start, inventory, "missing use on prompted inventory");
            }
        }

        let world = self.world();
        let attached_kinds: BTreeSet<CredentialKind> =
            world.credentials_of(template).map(|c| c.kind).collect();
        for id in launch.supplied_credentials() {
            if template.credentials.contains(&id) {
                continue;
            }
            if !template.ask_credential_on_launch {
                return deny(&self.ctx, Action::Start, template.id, "credentials are not promptable");
            }
            let credential = match world.credential(id) {
                Some(credential) => credential,
                None => return deny(&self.ctx, Action::Start, id, "unknown credential"),
            };
            if !attached_kinds.contains(&credential.kind) {
                return deny(&self.ctx, Action::Start, id, "credential kind not on template");
            }
            if !superuser && !self.ctx.has(id, RoleName::Use) {
                return deny(&self.ctx, Action::Start, id, "missing use on prompted credential");
            }
        }
        true
    }

    /// Admin on the template, and the right to create a template with the
    /// same project, inventory and credentials
    pub fn can_copy(&self, template: &JobTemplate) -> bool {
        if let Some(decision) = self.ctx.bypass(Action::Add) {
            return decision;
        }
        if !self.ctx.has(template.id, RoleName::Admin) {
            return deny(&self.ctx, Action::Add, template.id, "copy needs admin on source");
        }
        self.can_add(&JobTemplatePayload::from_template(template))
    }

    pub fn can_schedule(&self, template: &JobTemplate) -> bool {
        self.ctx.is_superuser() || self.ctx.has(template.id, RoleName::Execute)
    }
}

impl ResourceAccess for JobTemplateAccess<'_> {
    type Object = JobTemplate;
    type Payload = JobTemplatePayload;

    fn context(&self) -> &AccessContext<'_> {
        &self.ctx
    }

    fn can_read(&self, template: &JobTemplate) -> bool {
        if let Some(decision) = self.ctx.bypass(Action::Read) {
            return decision;
        }
        self.ctx.has(template.id, RoleName::Read)
    }

    /// An empty payload asks whether the principal could create any
    /// template at all.
    fn can_add(&self, payload: &JobTemplatePayload) -> bool {
        if let Some(decision) = self.ctx.bypass(Action::Add) {
            return decision;
        }
        if payload.is_empty() {
            return self
                .world()
                .holds_any(self.ctx.principal().id, ResourceKind::Project, RoleName::Use);
        }
        if payload.project.is_none() {
            return deny(&self.ctx, Action::Add, ResourceKind::JobTemplate, "project is required");
        }
        self.can_use_references(Action::Add, None, payload)
    }

    fn can_change(&self, template: &JobTemplate, payload: Option<&JobTemplatePayload>) -> bool {
        if let Some(decision) = self.ctx.bypass(Action::Change) {
            return decision;
        }
        if !self.ctx.has(template.id, RoleName::Admin) {
            return deny(&self.ctx, Action::Change, template.id, "missing admin");
        }
        match payload {
            Some(payload) => self.can_use_references(Action::Change, Some(template), payload),
            None => true,
        }
    }

    fn can_delete(&self, template: &JobTemplate) -> bool {
        if let Some(decision) = self.ctx.bypass(Action::Delete) {
            return decision;
        }
        self.ctx.has(template.id, RoleName::Admin)
            || deny(&self.ctx, Action::Delete, template.id, "missing admin")
    }

    fn can_attach(
        &self,
        template: &JobTemplate,
        sub_object: SubObject<'_>,
        relation: Relation,
        _data: Option<&serde_json::Value>,
    ) -> bool {
        if let Some(decision) = self.ctx.bypass(Action::Attach) {
            return decision;
        }
        if sub_object.relation() != relation {
            return deny(&self.ctx, Action::Attach, sub_object.resource_ref(), "wrong relation");
        }
        if !self.ctx.has(template.id, RoleName::Admin) {
            return deny(&self.ctx, Action::Attach, template.id, "missing admin");
        }
        match sub_object {
            SubObject::Credential(credential) => {
                self.ctx.has(credential.id, RoleName::Use)
                    || deny(&self.ctx, Action::Attach, credential.id, "missing use")
            }
            SubObject::Label(label) => {
                let labels = LabelAccess::new(self.ctx.principal(), self.ctx.snapshot());
                labels.can_read(label) || deny(&self.ctx, Action::Attach, label.id, "label not readable")
            }
        }
    }

    /// Admin on the template, whoever attached the sub-object
    fn can_unattach(
        &self,
        template: &JobTemplate,
        sub_object: SubObject<'_>,
        relation: Relation,
        _data: Option<&serde_json::Value>,
    ) -> bool {
        if let Some(decision) = self.ctx.bypass(Action::Unattach) {
            return decision;
        }
        if sub_object.relation() != relation {
            return deny(&self.ctx, Action::Unattach, sub_object.resource_ref(), "wrong relation");
        }
        self.ctx.has(template.id, RoleName::Admin)
            || deny(&self.ctx, Action::Unattach, template.id, "missing admin")
    }

    fn capability(&self, template: &JobTemplate, capability: Capability) -> bool {
        match capability {
            Capability::Edit => self.can_change(template, None),
            Capability::Delete => self.can_delete(template),
            Capability::Start => self.can_start(template, None),
            Capability::Schedule => self.can_schedule(template),
            Capability::Copy => self.can_copy(template),
        }
    }
}
