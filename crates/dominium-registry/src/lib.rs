// SPDX-License-Identifier: Apache-2.0
//! `dominium-registry`: bounded, insertion-ordered keyed registries (spec
//! component C3).
//!
//! Every registry used by the simulation — goals, delegations, authority
//! grants, constraints, institutions, and (via `dominium-network`) networks,
//! nodes, and edges — is an instance of [`Registry<T>`]. Iteration always
//! walks entries in insertion order (an [`indexmap::IndexMap`] underneath);
//! deletion is swap-remove, so a deleted entry's slot is filled by the
//! collection's current last entry. This is a deliberate determinism
//! contract (spec §5), not an implementation detail: replay hashing treats
//! every registry as an ordered sequence, never as a set.
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

use indexmap::IndexMap;
use thiserror::Error;

/// Errors returned by [`Registry`] mutating operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The requested id is already present in the registry.
    #[error("id {0} already exists")]
    AlreadyExists(u64),
    /// The registry has reached its configured capacity.
    #[error("registry is full (capacity {0})")]
    Full(usize),
    /// The requested id was not found.
    #[error("id {0} not found")]
    NotFound(u64),
}

/// A trait implemented by record types that can contribute to a subject's
/// effective bitmask (delegations, authority grants, ...).
///
/// [`Registry::effective_mask`] folds every entry for which
/// [`MaskContributor::subject_id`] matches and [`MaskContributor::is_active`]
/// is true into the running mask via [`MaskContributor::mask_bits`].
pub trait MaskContributor {
    /// The subject (e.g. delegatee, grantee) this entry applies to.
    fn subject_id(&self) -> u64;
    /// Whether this entry is currently active: not revoked, and either no
    /// expiry or an expiry strictly in the future relative to `now`.
    fn is_active(&self, now: u64) -> bool;
    /// The bitmask this entry contributes when active.
    fn mask_bits(&self) -> u32;
}

/// Bounded, insertion-ordered keyed collection.
///
/// `capacity` of `0` means unbounded (used by registries spec.md does not
/// assign an explicit bound).
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: IndexMap<u64, T>,
    next_id: u64,
    capacity: usize,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T> Registry<T> {
    /// Creates an empty registry. `capacity == 0` means unbounded.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            next_id: 1,
            capacity,
        }
    }

    /// Registers `desc` under `id`, or an auto-allocated id when `id` is
    /// `None`. Auto-allocated ids are a monotonic counter seeded at `1` and
    /// never reused within a registry's lifetime, even across revokes.
    ///
    /// # Errors
    /// Returns [`RegistryError::AlreadyExists`] if `id` is already present,
    /// or [`RegistryError::Full`] if the registry is at capacity.
    pub fn register(&mut self, id: Option<u64>, desc: T) -> Result<u64, RegistryError> {
        if self.capacity != 0 && self.entries.len() >= self.capacity {
            return Err(RegistryError::Full(self.capacity));
        }
        let key = match id {
            Some(k) => k,
            None => self.allocate_id(),
        };
        if self.entries.contains_key(&key) {
            return Err(RegistryError::AlreadyExists(key));
        }
        self.entries.insert(key, desc);
        if key >= self.next_id {
            self.next_id = key + 1;
        }
        Ok(key)
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Removes `id` via swap-remove (spec §5 deletion discipline).
    ///
    /// # Errors
    /// Returns [`RegistryError::NotFound`] if `id` is absent.
    pub fn revoke(&mut self, id: u64) -> Result<T, RegistryError> {
        self.entries
            .swap_remove(&id)
            .ok_or(RegistryError::NotFound(id))
    }

    /// Looks up an entry by id.
    #[must_use]
    pub fn find(&self, id: u64) -> Option<&T> {
        self.entries.get(&id)
    }

    /// Looks up a mutable entry by id.
    pub fn find_mut(&mut self, id: u64) -> Option<&mut T> {
        self.entries.get_mut(&id)
    }

    /// Returns `true` if `id` is present.
    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of entries currently registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order (modulo prior swap-removes).
    pub fn iter(&self) -> impl Iterator<Item = (u64, &T)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// Iterates entries mutably in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u64, &mut T)> {
        self.entries.iter_mut().map(|(k, v)| (*k, v))
    }

    /// Iterates just the values, in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Iterates just the values mutably, in insertion order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.values_mut()
    }
}

impl<T: MaskContributor> Registry<T> {
    /// Folds every active entry whose subject matches `subject` into `base`,
    /// returning the combined effective mask.
    #[must_use]
    pub fn effective_mask(&self, subject: u64, base: u32, now: u64) -> u32 {
        self.entries.values().fold(base, |mask, entry| {
            if entry.subject_id() == subject && entry.is_active(now) {
                mask | entry.mask_bits()
            } else {
                mask
            }
        })
    }
}
