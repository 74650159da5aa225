//! Credential policy
//!
//! Credentials are never the parent side of a relation, so attach and
//! unattach keep the trait's deny-all defaults.

use crate::access::base::OwnedRules;
use crate::access::{AccessContext, ResourceAccess};
use crate::models::{Credential, CredentialPayload, Principal, ResourceKind};
use crate::rbac::RoleName;
use crate::store::Snapshot;

const CREDENTIAL_RULES: OwnedRules = OwnedRules {
    kind: ResourceKind::Credential,
    scoped_admin: RoleName::CredentialAdmin,
};

pub struct CredentialAccess<'a> {
    ctx: AccessContext<'a>,
}

impl<'a> CredentialAccess<'a> {
    pub fn new(principal: &'a Principal, snapshot: &'a Snapshot) -> Self {
        CredentialAccess {
            ctx: AccessContext::new(principal, snapshot),
        }
    }

    /// May the principal reference this credential from a template or launch
    pub fn can_use(&self, credential: &Credential) -> bool {
        self.ctx.is_superuser() || self.ctx.has(credential.id, RoleName::Use)
    }
}

impl ResourceAccess for CredentialAccess<'_> {
    type Object = Credential;
    type Payload = CredentialPayload;

    fn context(&self) -> &AccessContext<'_> {
        &self.ctx
    }

    fn can_read(&self, credential: &Credential) -> bool {
        CREDENTIAL_RULES.can_read(&self.ctx, credential)
    }

    fn can_add(&self, payload: &CredentialPayload) -> bool {
        CREDENTIAL_RULES.can_add(&self.ctx, payload.organization)
    }

    fn can_change(&self, credential: &Credential, payload: Option<&CredentialPayload>) -> bool {
        CREDENTIAL_RULES.can_change(&self.ctx, credential, payload.and_then(|p| p.organization))
    }

    fn can_delete(&self, credential: &Credential) -> bool {
        CREDENTIAL_RULES.can_delete(&self.ctx, credential)
    }
}
