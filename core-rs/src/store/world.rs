//! One consistent view of every principal, resource and role edge

use crate::errors::{AccessError, Result};
use crate::hierarchy::HierarchyResolver;
use crate::ids::{
    CredentialId, InventoryId, JobTemplateId, LabelId, OrganizationId, PrincipalId, ProjectId,
    ScheduleId,
};
use crate::models::{
    Credential, CredentialKind, Inventory, JobTemplate, Label, Organization, Principal, Project,
    ResourceKind, ResourceRef, Schedule,
};
use crate::rbac::{grants, implicit_parents, RoleGraph, RoleId, RoleLookup, RoleName};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct World {
    pub(crate) principals: BTreeMap<PrincipalId, Principal>,
    pub(crate) organizations: BTreeMap<OrganizationId, Organization>,
    pub(crate) projects: BTreeMap<ProjectId, Project>,
    pub(crate) inventories: BTreeMap<InventoryId, Inventory>,
    pub(crate) credentials: BTreeMap<CredentialId, Credential>,
    pub(crate) job_templates: BTreeMap<JobTemplateId, JobTemplate>,
    pub(crate) schedules: BTreeMap<ScheduleId, Schedule>,
    pub(crate) labels: BTreeMap<LabelId, Label>,
    pub(crate) roles: RoleGraph,
    pub(crate) max_role_depth: usize,
}

impl World {
    pub fn new(max_role_depth: usize) -> Self {
        World {
            principals: BTreeMap::new(),
            organizations: BTreeMap::new(),
            projects: BTreeMap::new(),
            inventories: BTreeMap::new(),
            credentials: BTreeMap::new(),
            job_templates: BTreeMap::new(),
            schedules: BTreeMap::new(),
            labels: BTreeMap::new(),
            roles: RoleGraph::new(),
            max_role_depth,
        }
    }

    pub fn principal(&self, id: PrincipalId) -> Option<&Principal> {
        self.principals.get(&id)
    }

    pub fn organization(&self, id: OrganizationId) -> Option<&Organization> {
        self.organizations.get(&id)
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.get(&id)
    }

    pub fn inventory(&self, id: InventoryId) -> Option<&Inventory> {
        self.inventories.get(&id)
    }

    pub fn credential(&self, id: CredentialId) -> Option<&Credential> {
        self.credentials.get(&id)
    }

    pub fn job_template(&self, id: JobTemplateId) -> Option<&JobTemplate> {
        self.job_templates.get(&id)
    }

    pub fn schedule(&self, id: ScheduleId) -> Option<&Schedule> {
        self.schedules.get(&id)
    }

    pub fn label(&self, id: LabelId) -> Option<&Label> {
        self.labels.get(&id)
    }

    pub fn require_job_template(&self, id: JobTemplateId) -> Result<&JobTemplate> {
        self.job_template(id)
            .ok_or_else(|| AccessError::not_found("job_template", id))
    }

    pub fn require_credential(&self, id: CredentialId) -> Result<&Credential> {
        self.credential(id)
            .ok_or_else(|| AccessError::not_found("credential", id))
    }

    pub fn require_schedule(&self, id: ScheduleId) -> Result<&Schedule> {
        self.schedule(id)
            .ok_or_else(|| AccessError::not_found("schedule", id))
    }

    pub fn job_templates(&self) -> impl Iterator<Item = &JobTemplate> {
        self.job_templates.values()
    }

    pub fn credentials_of<'a>(&'a self, template: &'a JobTemplate) -> impl Iterator<Item = &'a Credential> + 'a {
        template
            .credentials
            .iter()
            .filter_map(move |id| self.credentials.get(id))
    }

    /// The credential filling a deprecated single slot on `template`
    pub fn deprecated_credential<'a>(&'a self, template: &'a JobTemplate, kind: CredentialKind) -> Option<&'a Credential> {
        self.credentials_of(template).find(|c| c.kind == kind)
    }

    /// Role lookup that fails for unknown resources or names
    pub fn role(&self, resource: impl Into<ResourceRef>, name: RoleName) -> Result<RoleId> {
        let role = RoleId::checked(resource, name)?;
        if !self.resource_exists(role.resource) {
            return Err(AccessError::not_found(role.resource.kind().as_str(), role.resource));
        }
        Ok(role)
    }

    /// Does `principal` hold `role`, directly or by inheritance
    pub fn has_role(&self, principal: PrincipalId, role: RoleId) -> bool {
        self.resource_exists(role.resource) && grants(self, principal, role)
    }

    /// Does `principal` hold `name` on at least one resource of `kind`
    pub fn holds_any(&self, principal: PrincipalId, kind: ResourceKind, name: RoleName) -> bool {
        let mut refs: Box<dyn Iterator<Item = ResourceRef> + '_> = match kind {
            ResourceKind::Organization => Box::new(self.organizations.keys().map(|id| ResourceRef::from(*id))),
            ResourceKind::Project => Box::new(self.projects.keys().map(|id| ResourceRef::from(*id))),
            ResourceKind::Inventory => Box::new(self.inventories.keys().map(|id| ResourceRef::from(*id))),
            ResourceKind::Credential => Box::new(self.credentials.keys().map(|id| ResourceRef::from(*id))),
            ResourceKind::JobTemplate => Box::new(self.job_templates.keys().map(|id| ResourceRef::from(*id))),
            ResourceKind::Schedule | ResourceKind::Label => return false,
        };
        refs.any(|resource| grants(self, principal, RoleId::new(resource, name)))
    }

    pub fn explicit_parents(&self, role: RoleId) -> Vec<RoleId> {
        self.roles.explicit_parents(role).copied().collect()
    }

    pub fn direct_members(&self, role: RoleId) -> Vec<PrincipalId> {
        self.roles.members(role).copied().collect()
    }
}

impl HierarchyResolver for World {
    fn resource_exists(&self, resource: ResourceRef) -> bool {
        match resource {
            ResourceRef::Organization(id) => self.organizations.contains_key(&id),
            ResourceRef::Project(id) => self.projects.contains_key(&id),
            ResourceRef::Inventory(id) => self.inventories.contains_key(&id),
            ResourceRef::Credential(id) => self.credentials.contains_key(&id),
            ResourceRef::JobTemplate(id) => self.job_templates.contains_key(&id),
            ResourceRef::Schedule(id) => self.schedules.contains_key(&id),
            ResourceRef::Label(id) => self.labels.contains_key(&id),
        }
    }

    fn owners(&self, resource: ResourceRef) -> Vec<ResourceRef> {
        let org = |o: Option<OrganizationId>| -> Vec<ResourceRef> { o.map(ResourceRef::from).into_iter().collect() };
        match resource {
            ResourceRef::Organization(_) => Vec::new(),
            ResourceRef::Project(id) => org(self.project(id).and_then(|p| p.organization)),
            ResourceRef::Inventory(id) => org(self.inventory(id).and_then(|i| i.organization)),
            ResourceRef::Credential(id) => org(self.credential(id).and_then(|c| c.organization)),
            ResourceRef::Label(id) => org(self.label(id).map(|l| l.organization)),
            ResourceRef::JobTemplate(id) => match self.job_template(id) {
                Some(jt) => {
                    let mut owners = Vec::new();
                    owners.extend(jt.project.map(ResourceRef::from));
                    owners.extend(jt.inventory.map(ResourceRef::from));
                    owners
                }
                None => Vec::new(),
            },
            ResourceRef::Schedule(id) => self
                .schedule(id)
                .map(|s| vec![ResourceRef::from(s.unified_job_template)])
                .unwrap_or_default(),
        }
    }
}

impl RoleLookup for World {
    fn is_member(&self, principal: PrincipalId, role: RoleId) -> bool {
        self.roles.is_direct_member(role, principal)
    }

    fn parents(&self, role: RoleId) -> Vec<RoleId> {
        let mut parents = implicit_parents(self, role);
        parents.extend(self.roles.explicit_parents(role).copied());
        parents.sort();
        parents.dedup();
        parents
    }

    fn max_role_depth(&self) -> usize {
        self.max_role_depth
    }
}
