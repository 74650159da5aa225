//! Capability reporting for presentation layers
//!
//! [`get_user_capabilities`] answers a list of [`Capability`] questions for
//! one principal and one instance. Answers come from, in order:
//!
//! 1. override flags stored on the instance (authoritative, even for admins);
//! 2. a request-scoped [`CapabilityCache`], when one is supplied and enabled
//!    by `spec.capabilityCache`;
//! 3. the live policy check.

pub mod cache;
pub mod capabilities;

pub use cache::CapabilityCache;
pub use capabilities::{get_user_capabilities, CapabilitySubject};

use crate::errors::{AccessError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Edit,
    Delete,
    Start,
    Schedule,
    Copy,
}

/// Stored capability answers keyed by capability
pub type CapabilityOverrides = BTreeMap<Capability, bool>;

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Edit,
        Capability::Delete,
        Capability::Start,
        Capability::Schedule,
        Capability::Copy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Edit => "edit",
            Capability::Delete => "delete",
            Capability::Start => "start",
            Capability::Schedule => "schedule",
            Capability::Copy => "copy",
        }
    }

    /// Parse a caller-supplied method list such as `["edit", "copy"]`
    pub fn parse_list<S: AsRef<str>>(methods: &[S]) -> Result<Vec<Capability>> {
        methods.iter().map(|m| m.as_ref().parse()).collect()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = AccessError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AccessError::InvalidCapability(s.to_string()))
    }
}
