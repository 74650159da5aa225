//! Authenticated principal
//!
//! Identity is verified upstream. The core only needs the id and the two
//! global capability flags, which are threaded explicitly into every policy.

use crate::ids::PrincipalId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub username: String,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub is_system_auditor: bool,
}

impl Principal {
    /// Ordinary user with no global flags
    pub fn new(username: impl Into<String>) -> Self {
        Principal {
            id: PrincipalId::new(),
            username: username.into(),
            is_superuser: false,
            is_system_auditor: false,
        }
    }

    pub fn superuser(username: impl Into<String>) -> Self {
        Principal {
            is_superuser: true,
            ..Principal::new(username)
        }
    }

    pub fn system_auditor(username: impl Into<String>) -> Self {
        Principal {
            is_system_auditor: true,
            ..Principal::new(username)
        }
    }
}
