//! Global superuser and system-auditor bypass
//!
//! Evaluated before any per-type rule. The flags come from the principal
//! passed to the policy; there is no process-wide switch.

use crate::models::Principal;
use std::fmt;

/// Operation a policy is asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    Add,
    Change,
    Delete,
    Attach,
    Unattach,
    Start,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Add => "add",
            Action::Change => "change",
            Action::Delete => "delete",
            Action::Attach => "attach",
            Action::Unattach => "unattach",
            Action::Start => "start",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Some(decision)` when a global flag settles the question outright,
/// `None` when the per-type policy has to decide.
///
/// A system auditor only ever gains reads: deleting an orphan it can see
/// still goes through the normal rules.
pub fn global_override(principal: &Principal, action: Action) -> Option<bool> {
    if principal.is_superuser {
        return Some(true);
    }
    if principal.is_system_auditor && action == Action::Read {
        return Some(true);
    }
    None
}
