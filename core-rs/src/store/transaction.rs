//! Mutations applied inside one store transaction
//!
//! A `Transaction` edits a private copy of the world. The store publishes
//! the copy only when the whole closure succeeds.

use crate::capability::CapabilityOverrides;
use crate::errors::{AccessError, Result};
use crate::hierarchy::HierarchyResolver;
use crate::ids::{
    CredentialId, InventoryId, JobTemplateId, LabelId, OrganizationId, PrincipalId, ProjectId,
    ScheduleId,
};
use crate::models::{
    Credential, CredentialKind, Inventory, JobTemplate, Label, Organization, Principal, Project,
    ResourceRef, Schedule, SchedulePayload,
};
use crate::rbac::{would_cycle, RoleId, RoleName};
use crate::store::world::World;
use chrono::Utc;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Fields for a job template being created
#[derive(Debug, Clone, Default)]
pub struct NewJobTemplate {
    pub name: String,
    pub project: Option<ProjectId>,
    pub inventory: Option<InventoryId>,
    pub playbook: String,
    pub credentials: Vec<CredentialId>,
    pub ask_inventory_on_launch: bool,
    pub ask_credential_on_launch: bool,
}

impl NewJobTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        NewJobTemplate {
            name: name.into(),
            playbook: "helloworld.yml".to_string(),
            ..Default::default()
        }
    }
}

/// Fields for a schedule being created
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub name: String,
    pub unified_job_template: JobTemplateId,
    pub rrule: String,
    pub inventory: Option<InventoryId>,
    pub credentials: Vec<CredentialId>,
}

impl NewSchedule {
    pub fn new(unified_job_template: JobTemplateId, rrule: impl Into<String>) -> Self {
        NewSchedule {
            name: "schedule".to_string(),
            unified_job_template,
            rrule: rrule.into(),
            inventory: None,
            credentials: Vec::new(),
        }
    }
}

pub struct Transaction<'a> {
    world: &'a mut World,
    changes: usize,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(world: &'a mut World) -> Self {
        Transaction { world, changes: 0 }
    }

    pub(crate) fn changes(&self) -> usize {
        self.changes
    }

    /// Read access to the in-progress world
    pub fn world(&self) -> &World {
        self.world
    }

    fn touch(&mut self) {
        self.changes += 1;
    }

    fn ensure_exists(&self, resource: ResourceRef) -> Result<()> {
        if self.world.resource_exists(resource) {
            Ok(())
        } else {
            Err(AccessError::not_found(resource.kind().as_str(), resource))
        }
    }

    fn ensure_principal(&self, principal: PrincipalId) -> Result<()> {
        if self.world.principals.contains_key(&principal) {
            Ok(())
        } else {
            Err(AccessError::not_found("principal", principal))
        }
    }

    /// An ownership move changes implicit parents, which can close a loop
    /// through a stored edge that was acyclic when it was added. On a loop
    /// `undo` restores the previous pointer and the move is refused.
    fn finish_transfer<F>(&mut self, resource: ResourceRef, undo: F) -> Result<()>
    where
        F: FnOnce(&mut World),
    {
        let world: &World = self.world;
        let cycle = world
            .roles
            .explicit_edges()
            .find(|(child, parent)| would_cycle(world, *child, *parent));
        if let Some((child, parent)) = cycle {
            warn!(%resource, %child, %parent, "rejected ownership move: role cycle");
            undo(self.world);
            return Err(AccessError::RoleCycle {
                role: child.to_string(),
                parent: parent.to_string(),
            });
        }
        self.touch();
        Ok(())
    }

    /// The creator of a resource becomes a member of its admin role
    fn grant_creator(&mut self, resource: ResourceRef, created_by: Option<PrincipalId>) -> Result<()> {
        if let Some(creator) = created_by {
            self.ensure_principal(creator)?;
            let role = RoleId::checked(resource, RoleName::Admin)?;
            self.world.roles.add_member(role, creator);
            debug!(%creator, %resource, "creator granted admin");
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Principals and resources
    // ------------------------------------------------------------------

    pub fn add_principal(&mut self, principal: Principal) -> PrincipalId {
        let id = principal.id;
        self.world.principals.insert(id, principal);
        self.touch();
        id
    }

    pub fn create_organization(
        &mut self,
        name: impl Into<String>,
        created_by: Option<PrincipalId>,
    ) -> Result<OrganizationId> {
        let id = OrganizationId::new();
        self.world.organizations.insert(
            id,
            Organization {
                id,
                name: name.into(),
                created_at: Utc::now(),
            },
        );
        self.grant_creator(id.into(), created_by)?;
        self.touch();
        Ok(id)
    }

    pub fn create_project(
        &mut self,
        name: impl Into<String>,
        organization: Option<OrganizationId>,
        created_by: Option<PrincipalId>,
    ) -> Result<ProjectId> {
        if let Some(org) = organization {
            self.ensure_exists(org.into())?;
        }
        let id = ProjectId::new();
        self.world.projects.insert(
            id,
            Project {
                id,
                name: name.into(),
                organization,
                created_at: Utc::now(),
            },
        );
        self.grant_creator(id.into(), created_by)?;
        self.touch();
        Ok(id)
    }

    pub fn create_inventory(
        &mut self,
        name: impl Into<String>,
        organization: Option<OrganizationId>,
        created_by: Option<PrincipalId>,
    ) -> Result<InventoryId> {
        if let Some(org) = organization {
            self.ensure_exists(org.into())?;
        }
        let id = InventoryId::new();
        self.world.inventories.insert(
            id,
            Inventory {
                id,
                name: name.into(),
                organization,
                created_at: Utc::now(),
            },
        );
        self.grant_creator(id.into(), created_by)?;
        self.touch();
        Ok(id)
    }

    pub fn create_credential(
        &mut self,
        name: impl Into<String>,
        kind: CredentialKind,
        organization: Option<OrganizationId>,
        created_by: Option<PrincipalId>,
    ) -> Result<CredentialId> {
        if let Some(org) = organization {
            self.ensure_exists(org.into())?;
        }
        let id = CredentialId::new();
        self.world.credentials.insert(
            id,
            Credential {
                id,
                name: name.into(),
                kind,
                organization,
                created_at: Utc::now(),
            },
        );
        self.grant_creator(id.into(), created_by)?;
        self.touch();
        Ok(id)
    }

    pub fn create_job_template(
        &mut self,
        spec: NewJobTemplate,
        created_by: Option<PrincipalId>,
    ) -> Result<JobTemplateId> {
        if let Some(project) = spec.project {
            self.ensure_exists(project.into())?;
        }
        if let Some(inventory) = spec.inventory {
            self.ensure_exists(inventory.into())?;
        }
        for cred in &spec.credentials {
            self.ensure_exists((*cred).into())?;
        }

        let id = JobTemplateId::new();
        self.world.job_templates.insert(
            id,
            JobTemplate {
                id,
                name: spec.name,
                project: spec.project,
                inventory: spec.inventory,
                playbook: spec.playbook,
                credentials: spec.credentials.into_iter().collect(),
                labels: BTreeSet::new(),
                ask_inventory_on_launch: spec.ask_inventory_on_launch,
                ask_credential_on_launch: spec.ask_credential_on_launch,
                capabilities_cache: CapabilityOverrides::new(),
                created_at: Utc::now(),
            },
        );
        self.grant_creator(id.into(), created_by)?;
        self.touch();
        Ok(id)
    }

    /// Schedules have no roles; the creator is recorded instead
    pub fn create_schedule(
        &mut self,
        spec: NewSchedule,
        created_by: Option<PrincipalId>,
    ) -> Result<ScheduleId> {
        self.ensure_exists(spec.unified_job_template.into())?;
        if let Some(creator) = created_by {
            self.ensure_principal(creator)?;
        }
        let id = ScheduleId::new();
        self.world.schedules.insert(
            id,
            Schedule {
                id,
                name: spec.name,
                unified_job_template: spec.unified_job_template,
                rrule: spec.rrule,
                enabled: true,
                inventory: spec.inventory,
                credentials: spec.credentials.into_iter().collect(),
                created_by,
                created_at: Utc::now(),
            },
        );
        self.touch();
        Ok(id)
    }

    pub fn create_label(
        &mut self,
        name: impl Into<String>,
        organization: OrganizationId,
    ) -> Result<LabelId> {
        self.ensure_exists(organization.into())?;
        let id = LabelId::new();
        self.world.labels.insert(
            id,
            Label {
                id,
                name: name.into(),
                organization,
                created_at: Utc::now(),
            },
        );
        self.touch();
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Role membership and parentage
    // ------------------------------------------------------------------

    pub fn add_member(&mut self, role: RoleId, principal: PrincipalId) -> Result<()> {
        let role = self.world.role(role.resource, role.name)?;
        self.ensure_principal(principal)?;
        if self.world.roles.add_member(role, principal) {
            debug!(%principal, %role, "member added");
            self.touch();
        }
        Ok(())
    }

    pub fn remove_member(&mut self, role: RoleId, principal: PrincipalId) -> Result<()> {
        let role = self.world.role(role.resource, role.name)?;
        if self.world.roles.remove_member(role, principal) {
            debug!(%principal, %role, "member removed");
            self.touch();
        }
        Ok(())
    }

    /// Members of `parent` implicitly hold `child` from now on.
    ///
    /// Rejected with [`AccessError::RoleCycle`] when `child` is already an
    /// ancestor of `parent`, counting hierarchy-derived edges too.
    pub fn add_parent(&mut self, child: RoleId, parent: RoleId) -> Result<()> {
        let child = self.world.role(child.resource, child.name)?;
        let parent = self.world.role(parent.resource, parent.name)?;
        if would_cycle(&*self.world, child, parent) {
            warn!(%child, %parent, "rejected parent edge: cycle");
            return Err(AccessError::RoleCycle {
                role: child.to_string(),
                parent: parent.to_string(),
            });
        }
        if self.world.roles.insert_parent(child, parent) {
            debug!(%child, %parent, "parent edge added");
            self.touch();
        }
        Ok(())
    }

    pub fn remove_parent(&mut self, child: RoleId, parent: RoleId) -> Result<()> {
        if self.world.roles.remove_parent(child, parent) {
            self.touch();
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Ownership transfer
    // ------------------------------------------------------------------

    pub fn set_project_organization(
        &mut self,
        project: ProjectId,
        organization: Option<OrganizationId>,
    ) -> Result<()> {
        if let Some(org) = organization {
            self.ensure_exists(org.into())?;
        }
        let entry = self
            .world
            .projects
            .get_mut(&project)
            .ok_or_else(|| AccessError::not_found("project", project))?;
        let previous = std::mem::replace(&mut entry.organization, organization);
        self.finish_transfer(project.into(), |world| {
            if let Some(entry) = world.projects.get_mut(&project) {
                entry.organization = previous;
            }
        })?;
        info!(%project, from = ?previous, to = ?organization, "project ownership transfer");
        Ok(())
    }

    pub fn set_inventory_organization(
        &mut self,
        inventory: InventoryId,
        organization: Option<OrganizationId>,
    ) -> Result<()> {
        if let Some(org) = organization {
            self.ensure_exists(org.into())?;
        }
        let entry = self
            .world
            .inventories
            .get_mut(&inventory)
            .ok_or_else(|| AccessError::not_found("inventory", inventory))?;
        let previous = std::mem::replace(&mut entry.organization, organization);
        self.finish_transfer(inventory.into(), |world| {
            if let Some(entry) = world.inventories.get_mut(&inventory) {
                entry.organization = previous;
            }
        })?;
        info!(%inventory, from = ?previous, to = ?organization, "inventory ownership transfer");
        Ok(())
    }

    pub fn set_credential_organization(
        &mut self,
        credential: CredentialId,
        organization: Option<OrganizationId>,
    ) -> Result<()> {
        if let Some(org) = organization {
            self.ensure_exists(org.into())?;
        }
        let entry = self
            .world
            .credentials
            .get_mut(&credential)
            .ok_or_else(|| AccessError::not_found("credential", credential))?;
        let previous = std::mem::replace(&mut entry.organization, organization);
        self.finish_transfer(credential.into(), |world| {
            if let Some(entry) = world.credentials.get_mut(&credential) {
                entry.organization = previous;
            }
        })?;
        info!(%credential, from = ?previous, to = ?organization, "credential ownership transfer");
        Ok(())
    }

    fn job_template_mut(&mut self, id: JobTemplateId) -> Result<&mut JobTemplate> {
        self.world
            .job_templates
            .get_mut(&id)
            .ok_or_else(|| AccessError::not_found("job_template", id))
    }

    pub fn set_job_template_project(&mut self, template: JobTemplateId, project: Option<ProjectId>) -> Result<()> {
        if let Some(p) = project {
            self.ensure_exists(p.into())?;
        }
        let previous = std::mem::replace(&mut self.job_template_mut(template)?.project, project);
        self.finish_transfer(template.into(), |world| {
            if let Some(jt) = world.job_templates.get_mut(&template) {
                jt.project = previous;
            }
        })
    }

    pub fn set_job_template_inventory(
        &mut self,
        template: JobTemplateId,
        inventory: Option<InventoryId>,
    ) -> Result<()> {
        if let Some(i) = inventory {
            self.ensure_exists(i.into())?;
        }
        let previous = std::mem::replace(&mut self.job_template_mut(template)?.inventory, inventory);
        self.finish_transfer(template.into(), |world| {
            if let Some(jt) = world.job_templates.get_mut(&template) {
                jt.inventory = previous;
            }
        })
    }

    pub fn set_launch_prompts(&mut self, template: JobTemplateId, ask_inventory: bool, ask_credential: bool) -> Result<()> {
        let jt = self.job_template_mut(template)?;
        jt.ask_inventory_on_launch = ask_inventory;
        jt.ask_credential_on_launch = ask_credential;
        self.touch();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Many-to-many relations
    // ------------------------------------------------------------------

    pub fn attach_credential(&mut self, template: JobTemplateId, credential: CredentialId) -> Result<()> {
        self.ensure_exists(credential.into())?;
        if self.job_template_mut(template)?.credentials.insert(credential) {
            self.touch();
        }
        Ok(())
    }

    pub fn detach_credential(&mut self, template: JobTemplateId, credential: CredentialId) -> Result<()> {
        if self.job_template_mut(template)?.credentials.remove(&credential) {
            self.touch();
        }
        Ok(())
    }

    pub fn attach_label(&mut self, template: JobTemplateId, label: LabelId) -> Result<()> {
        self.ensure_exists(label.into())?;
        if self.job_template_mut(template)?.labels.insert(label) {
            self.touch();
        }
        Ok(())
    }

    pub fn detach_label(&mut self, template: JobTemplateId, label: LabelId) -> Result<()> {
        if self.job_template_mut(template)?.labels.remove(&label) {
            self.touch();
        }
        Ok(())
    }

    /// Replace the stored capability answers on a job template
    pub fn set_capability_overrides(
        &mut self,
        template: JobTemplateId,
        overrides: CapabilityOverrides,
    ) -> Result<()> {
        self.job_template_mut(template)?.capabilities_cache = overrides;
        self.touch();
        Ok(())
    }

    /// Apply submitted schedule fields. Whether the caller may do so is the
    /// access layer's decision, not the store's.
    pub fn update_schedule(&mut self, schedule: ScheduleId, payload: &SchedulePayload) -> Result<()> {
        if let Some(ujt) = payload.unified_job_template {
            self.ensure_exists(ujt.into())?;
        }
        let entry = self
            .world
            .schedules
            .get_mut(&schedule)
            .ok_or_else(|| AccessError::not_found("schedule", schedule))?;
        if let Some(name) = &payload.name {
            entry.name = name.clone();
        }
        if let Some(ujt) = payload.unified_job_template {
            entry.unified_job_template = ujt;
        }
        if let Some(rrule) = &payload.rrule {
            entry.rrule = rrule.clone();
        }
        if let Some(enabled) = payload.enabled {
            entry.enabled = enabled;
        }
        if let Some(inventory) = payload.inventory {
            entry.inventory = Some(inventory);
        }
        if let Some(credentials) = &payload.credentials {
            entry.credentials = credentials.iter().copied().collect();
        }
        self.touch();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Deletion
    // ------------------------------------------------------------------

    /// Templates referencing the project become orphans
    pub fn delete_project(&mut self, project: ProjectId) -> Result<()> {
        self.world
            .projects
            .remove(&project)
            .ok_or_else(|| AccessError::not_found("project", project))?;
        for jt in self.world.job_templates.values_mut() {
            if jt.project == Some(project) {
                jt.project = None;
            }
        }
        self.world.roles.forget_resource(project.into());
        self.touch();
        Ok(())
    }

    pub fn delete_inventory(&mut self, inventory: InventoryId) -> Result<()> {
        self.world
            .inventories
            .remove(&inventory)
            .ok_or_else(|| AccessError::not_found("inventory", inventory))?;
        for jt in self.world.job_templates.values_mut() {
            if jt.inventory == Some(inventory) {
                jt.inventory = None;
            }
        }
        for schedule in self.world.schedules.values_mut() {
            if schedule.inventory == Some(inventory) {
                schedule.inventory = None;
            }
        }
        self.world.roles.forget_resource(inventory.into());
        self.touch();
        Ok(())
    }

    pub fn delete_credential(&mut self, credential: CredentialId) -> Result<()> {
        self.world
            .credentials
            .remove(&credential)
            .ok_or_else(|| AccessError::not_found("credential", credential))?;
        for jt in self.world.job_templates.values_mut() {
            jt.credentials.remove(&credential);
        }
        for schedule in self.world.schedules.values_mut() {
            schedule.credentials.remove(&credential);
        }
        self.world.roles.forget_resource(credential.into());
        self.touch();
        Ok(())
    }

    /// Deletes the template's schedules with it
    pub fn delete_job_template(&mut self, template: JobTemplateId) -> Result<()> {
        self.world
            .job_templates
            .remove(&template)
            .ok_or_else(|| AccessError::not_found("job_template", template))?;
        self.world
            .schedules
            .retain(|_, s| s.unified_job_template != template);
        self.world.roles.forget_resource(template.into());
        self.touch();
        Ok(())
    }

    pub fn delete_schedule(&mut self, schedule: ScheduleId) -> Result<()> {
        self.world
            .schedules
            .remove(&schedule)
            .ok_or_else(|| AccessError::not_found("schedule", schedule))?;
        self.touch();
        Ok(())
    }

    pub fn delete_label(&mut self, label: LabelId) -> Result<()> {
        self.world
            .labels
            .remove(&label)
            .ok_or_else(|| AccessError::not_found("label", label))?;
        for jt in self.world.job_templates.values_mut() {
            jt.labels.remove(&label);
        }
        self.touch();
        Ok(())
    }

    /// Resources owned by the organization are orphaned; its labels go with it
    pub fn delete_organization(&mut self, organization: OrganizationId) -> Result<()> {
        self.world
            .organizations
            .remove(&organization)
            .ok_or_else(|| AccessError::not_found("organization", organization))?;
        let owned = Some(organization);
        for p in self.world.projects.values_mut() {
            if p.organization == owned {
                p.organization = None;
            }
        }
        for i in self.world.inventories.values_mut() {
            if i.organization == owned {
                i.organization = None;
            }
        }
        for c in self.world.credentials.values_mut() {
            if c.organization == owned {
                c.organization = None;
            }
        }
        let dropped: Vec<LabelId> = self
            .world
            .labels
            .values()
            .filter(|l| l.organization == organization)
            .map(|l| l.id)
            .collect();
        for label in dropped {
            self.delete_label(label)?;
        }
        self.world.roles.forget_resource(organization.into());
        self.touch();
        Ok(())
    }

    pub fn remove_principal(&mut self, principal: PrincipalId) -> Result<()> {
        self.world
            .principals
            .remove(&principal)
            .ok_or_else(|| AccessError::not_found("principal", principal))?;
        self.world.roles.forget_principal(principal);
        self.touch();
        Ok(())
    }
}
