//! Resource Hierarchy Resolver
//!
//! Answers "who owns this resource" against a live snapshot:
//!
//! ```text
//! JobTemplate ──► Project ───► Organization
//!      │
//!      └────────► Inventory ─► Organization
//!
//! Schedule ──► JobTemplate      Label / Credential ──► Organization
//! ```
//!
//! Nothing here is cached. Reassigning a project's organization changes the
//! next call's answer.

pub mod resolver;

pub use resolver::{HierarchyResolver, OwnershipChain};
