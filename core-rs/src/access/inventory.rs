//! Inventory policy

use crate::access::base::OwnedRules;
use crate::access::{AccessContext, ResourceAccess};
use crate::models::{Inventory, InventoryPayload, Principal, ResourceKind};
use crate::rbac::RoleName;
use crate::store::Snapshot;

const INVENTORY_RULES: OwnedRules = OwnedRules {
    kind: ResourceKind::Inventory,
    scoped_admin: RoleName::InventoryAdmin,
};

pub struct InventoryAccess<'a> {
    ctx: AccessContext<'a>,
}

impl<'a> InventoryAccess<'a> {
    pub fn new(principal: &'a Principal, snapshot: &'a Snapshot) -> Self {
        InventoryAccess {
            ctx: AccessContext::new(principal, snapshot),
        }
    }
}

impl ResourceAccess for InventoryAccess<'_> {
    type Object = Inventory;
    type Payload = InventoryPayload;

    fn context(&self) -> &AccessContext<'_> {
        &self.ctx
    }

    fn can_read(&self, inventory: &Inventory) -> bool {
        INVENTORY_RULES.can_read(&self.ctx, inventory)
    }

    fn can_add(&self, payload: &InventoryPayload) -> bool {
        INVENTORY_RULES.can_add(&self.ctx, payload.organization)
    }

    fn can_change(&self, inventory: &Inventory, payload: Option<&InventoryPayload>) -> bool {
        INVENTORY_RULES.can_change(&self.ctx, inventory, payload.and_then(|p| p.organization))
    }

    fn can_delete(&self, inventory: &Inventory) -> bool {
        INVENTORY_RULES.can_delete(&self.ctx, inventory)
    }
}
