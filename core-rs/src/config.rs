/**
 * config.rs
 * Access core configuration (YAML)
 *
 * Format:
 * ```yaml
 * apiVersion: rbac-core/v1
 * kind: AccessConfig
 * metadata:
 *   name: default
 * spec:
 *   deprecatedSlotResubmit: noop
 *   maxRoleDepth: 32
 *   capabilityCache: true
 *   logging:
 *     level: info
 * ```
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::{AccessError, Result};
use crate::rbac::DEFAULT_MAX_ROLE_DEPTH;

pub const API_VERSION: &str = "rbac-core/v1";
pub const KIND: &str = "AccessConfig";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessConfig {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    #[serde(default)]
    pub spec: AccessSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metadata {
    pub name: String,
}

/// How a re-submitted deprecated slot value (`credential`,
/// `vault_credential`) that is already attached is validated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SlotResubmitPolicy {
    /// Already attached: no permission check, no error
    #[default]
    Noop,
    /// Use access on the credential is checked again
    Recheck,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessSpec {
    #[serde(default)]
    pub deprecated_slot_resubmit: SlotResubmitPolicy,
    #[serde(default = "default_max_role_depth")]
    pub max_role_depth: usize,
    #[serde(default = "default_true")]
    pub capability_cache: bool,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_max_role_depth() -> usize {
    DEFAULT_MAX_ROLE_DEPTH
}

fn default_true() -> bool {
    true
}

impl Default for AccessSpec {
    fn default() -> Self {
        AccessSpec {
            deprecated_slot_resubmit: SlotResubmitPolicy::default(),
            max_role_depth: default_max_role_depth(),
            capability_cache: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        AccessConfig::new("default")
    }
}

impl AccessConfig {
    pub fn new(name: impl Into<String>) -> Self {
        AccessConfig {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: Metadata { name: name.into() },
            spec: AccessSpec::default(),
        }
    }

    /// Load and validate a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(AccessError::Config(format!(
                "config file not found: {}",
                path.to_string_lossy()
            )));
        }

        let content = fs::read_to_string(path)?;
        let config: AccessConfig = serde_yaml::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Validate structure and bounds
    pub fn validate(&self) -> Result<()> {
        if self.api_version != API_VERSION {
            return Err(AccessError::Config(format!(
                "Invalid apiVersion: expected '{}', got '{}'",
                API_VERSION, self.api_version
            )));
        }

        if self.kind != KIND {
            return Err(AccessError::Config(format!(
                "Invalid kind: expected '{}', got '{}'",
                KIND, self.kind
            )));
        }

        if self.metadata.name.is_empty() {
            return Err(AccessError::Config("metadata.name cannot be empty".to_string()));
        }

        if self.spec.max_role_depth == 0 {
            return Err(AccessError::Config(
                "spec.maxRoleDepth must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path.as_ref(), yaml)?;
        Ok(())
    }

    pub fn with_slot_resubmit(mut self, policy: SlotResubmitPolicy) -> Self {
        self.spec.deprecated_slot_resubmit = policy;
        self
    }
}
