//! Error types for the access core

use thiserror::Error;

/// Coarse classification of an [`AccessError`].
///
/// Callers that surface errors to an end user only need to tell "you may not
/// do this" apart from "this payload is malformed"; they match on this rather
/// than on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    PermissionDenied,
    Validation,
    Structural,
    NotFound,
    Config,
    Io,
}

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("Permission denied: {action} on {resource}")]
    PermissionDenied { action: String, resource: String },

    #[error("Validation error on '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Role cycle: {parent} already inherits from {role}")]
    RoleCycle { role: String, parent: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    #[error("Role '{role}' does not exist on {kind}")]
    UnknownRole { kind: String, role: String },

    #[error("Invalid relation: {0}")]
    InvalidRelation(String),

    #[error("Invalid capability: {0}")]
    InvalidCapability(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(String),
}

impl AccessError {
    pub fn permission_denied(action: impl Into<String>, resource: impl Into<String>) -> Self {
        AccessError::PermissionDenied {
            action: action.into(),
            resource: resource.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AccessError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(kind: impl Into<String>, id: impl ToString) -> Self {
        AccessError::NotFound {
            kind: kind.into(),
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AccessError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            AccessError::Validation { .. }
            | AccessError::InvalidRelation(_)
            | AccessError::InvalidCapability(_) => ErrorKind::Validation,
            AccessError::RoleCycle { .. } | AccessError::UnknownRole { .. } => ErrorKind::Structural,
            AccessError::NotFound { .. } => ErrorKind::NotFound,
            AccessError::Config(_) | AccessError::Yaml(_) | AccessError::Regex(_) => ErrorKind::Config,
            AccessError::Io(_) | AccessError::Json(_) => ErrorKind::Io,
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        self.kind() == ErrorKind::PermissionDenied
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

impl From<regex::Error> for AccessError {
    fn from(err: regex::Error) -> Self {
        AccessError::Regex(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AccessError>;
