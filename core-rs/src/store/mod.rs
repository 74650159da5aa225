/**
 * store
 * Copy-on-write store of principals, resources and role edges
 *
 * Readers take a `Snapshot` (an `Arc` of the committed world) and evaluate
 * any number of access questions against it without holding a lock.
 * Writers run a closure over a private copy; the copy replaces the committed
 * world only if the closure returns `Ok`, and the revision advances by one.
 */

pub mod transaction;
pub mod world;

pub use transaction::{NewJobTemplate, NewSchedule, Transaction};
pub use world::World;

use crate::config::AccessConfig;
use crate::errors::Result;
use crate::models::Principal;
use chrono::{DateTime, Utc};
use std::ops::Deref;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

#[derive(Debug)]
struct Committed {
    world: Arc<World>,
    revision: u64,
    committed_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct AccessStore {
    state: RwLock<Committed>,
    config: Arc<AccessConfig>,
}

/// An immutable, consistent view of the store at one revision
#[derive(Debug, Clone)]
pub struct Snapshot {
    world: Arc<World>,
    config: Arc<AccessConfig>,
    revision: u64,
}

impl Snapshot {
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl Deref for Snapshot {
    type Target = World;

    fn deref(&self) -> &World {
        &self.world
    }
}

impl AccessStore {
    /// An empty store governed by `config`, which is validated first
    pub fn new(config: AccessConfig) -> Result<Self> {
        config.validate()?;
        Ok(AccessStore::empty(config))
    }

    fn empty(config: AccessConfig) -> Self {
        let world = World::new(config.spec.max_role_depth);
        AccessStore {
            state: RwLock::new(Committed {
                world: Arc::new(world),
                revision: 0,
                committed_at: Utc::now(),
            }),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    // A panicking writer never publishes its copy, so the committed
    // world behind a poisoned lock is still consistent.
    fn read_state(&self) -> RwLockReadGuard<'_, Committed> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Committed> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.read_state();
        Snapshot {
            world: Arc::clone(&state.world),
            config: Arc::clone(&self.config),
            revision: state.revision,
        }
    }

    pub fn revision(&self) -> u64 {
        self.read_state().revision
    }

    pub fn last_committed_at(&self) -> DateTime<Utc> {
        self.read_state().committed_at
    }

    /// Run `f` against a private copy of the world and publish it on success.
    ///
    /// Writers are serialized; readers holding older snapshots are unaffected.
    /// On `Err` nothing is published and the revision does not move.
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<T>,
    {
        let mut state = self.write_state();
        let mut world = World::clone(&state.world);

        let (value, changes) = {
            let mut tx = Transaction::new(&mut world);
            let value = f(&mut tx)?;
            (value, tx.changes())
        };

        if changes == 0 {
            debug!(revision = state.revision, "transaction made no changes");
            return Ok(value);
        }

        state.world = Arc::new(world);
        state.revision += 1;
        state.committed_at = Utc::now();
        info!(revision = state.revision, changes, "transaction committed");
        Ok(value)
    }

    /// Register a principal in its own transaction
    pub fn add_principal(&self, principal: Principal) -> Result<Principal> {
        self.transaction(|tx| {
            tx.add_principal(principal.clone());
            Ok(principal)
        })
    }
}

impl Default for AccessStore {
    fn default() -> Self {
        AccessStore::empty(AccessConfig::default())
    }
}
