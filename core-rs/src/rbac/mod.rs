//! Role Graph
//!
//! Roles are scoped to one resource instance and inherit through parent
//! edges. Two kinds of edge feed the traversal:
//!
//! - explicit edges, attached with `add_parent` and stored in [`RoleGraph`];
//! - implicit edges, derived on read from the ownership hierarchy by
//!   [`implicit::implicit_parents`].
//!
//! [`grants`] walks the union of both. Because the implicit half is derived
//! from live ownership, reassigning a resource's organization needs no role
//! re-derivation step.

pub mod graph;
pub mod implicit;
pub mod role;

pub use graph::{ancestors, grants, would_cycle, RoleGraph, RoleLookup, DEFAULT_MAX_ROLE_DEPTH};
pub use implicit::implicit_parents;
pub use role::{RoleId, RoleName};
