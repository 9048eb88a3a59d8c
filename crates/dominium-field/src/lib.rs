// SPDX-License-Identifier: Apache-2.0
//! `dominium-field`: sparse per-layer scalar field storage (spec component
//! C2).
//!
//! A [`Layer`] is created with fixed dimensions and a default sentinel at
//! world construction. Writing to an absent layer fails; reading from an
//! absent layer (or an absent cell within an existing layer) returns
//! `UNKNOWN` (modeled as `Option::None`) without allocating a cell.
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

use dominium_kernel::Q16;
use indexmap::IndexMap;
use thiserror::Error;

/// Errors returned by [`FieldStorage`] operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// The requested layer has not been created.
    #[error("no such layer: {0}")]
    NoSuchLayer(u32),
    /// The layer already exists.
    #[error("layer {0} already exists")]
    LayerExists(u32),
}

/// A discrete cell coordinate within a layer.
pub type Cell = (i32, i32, i32);

/// One sparse scalar grid: a dimensioned layer with a default sentinel and
/// a sparse overlay of cells that differ from that default.
#[derive(Debug, Clone)]
struct Layer {
    dims: (u32, u32, u32),
    default: Q16,
    cells: IndexMap<Cell, Q16>,
}

/// Sparse, multi-layer scalar field storage.
///
/// `dominium-sim::World` owns two instances: one objective (ground truth)
/// and one subjective per agent (written only through survey or scenario
/// injection), mirroring spec §4.2's objective/subjective split.
#[derive(Debug, Clone, Default)]
pub struct FieldStorage {
    layers: IndexMap<u32, Layer>,
}

impl FieldStorage {
    /// Creates empty field storage with no layers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a layer with the given dimensions and default sentinel.
    ///
    /// # Errors
    /// Returns [`FieldError::LayerExists`] if `layer_id` is already created.
    pub fn create_layer(
        &mut self,
        layer_id: u32,
        dims: (u32, u32, u32),
        default: Q16,
    ) -> Result<(), FieldError> {
        if self.layers.contains_key(&layer_id) {
            return Err(FieldError::LayerExists(layer_id));
        }
        self.layers.insert(
            layer_id,
            Layer {
                dims,
                default,
                cells: IndexMap::new(),
            },
        );
        Ok(())
    }

    /// Returns `true` if `layer_id` has been created.
    #[must_use]
    pub fn has_layer(&self, layer_id: u32) -> bool {
        self.layers.contains_key(&layer_id)
    }

    /// Returns a layer's dimensions, if it exists.
    #[must_use]
    pub fn layer_dims(&self, layer_id: u32) -> Option<(u32, u32, u32)> {
        self.layers.get(&layer_id).map(|l| l.dims)
    }

    /// Reads a cell. Returns `None` (`UNKNOWN`) if the layer or cell is
    /// absent; an absent cell within a known layer falls back to the
    /// layer's default sentinel, not `UNKNOWN`.
    #[must_use]
    pub fn get(&self, layer_id: u32, x: i32, y: i32, z: i32) -> Option<Q16> {
        let layer = self.layers.get(&layer_id)?;
        Some(
            layer
                .cells
                .get(&(x, y, z))
                .copied()
                .unwrap_or(layer.default),
        )
    }

    /// Writes a cell. Preserves layer existence: writing to an absent layer
    /// fails rather than implicitly creating one.
    ///
    /// # Errors
    /// Returns [`FieldError::NoSuchLayer`] if `layer_id` has not been
    /// created via [`FieldStorage::create_layer`].
    pub fn set(&mut self, layer_id: u32, x: i32, y: i32, z: i32, value: Q16) -> Result<(), FieldError> {
        let layer = self
            .layers
            .get_mut(&layer_id)
            .ok_or(FieldError::NoSuchLayer(layer_id))?;
        layer.cells.insert((x, y, z), value);
        Ok(())
    }

    /// Iterates the ids of created layers, in insertion order.
    pub fn layer_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.layers.keys().copied()
    }
}

/// Bitset of which field layers a viewing agent has observed.
///
/// This is the sole visibility gate exposed to agents (spec §4.2): a layer
/// bit is set only by survey (`dominium-process`) or scenario injection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KnowledgeMask(u32);

impl KnowledgeMask {
    /// Empty knowledge mask.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw bitmask value.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Constructs from a raw bitmask.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Marks `layer_id` (0..32) as known.
    pub fn mark_known(&mut self, layer_id: u32) {
        if layer_id < 32 {
            self.0 |= 1 << layer_id;
        }
    }

    /// Returns `true` if `layer_id` has been observed.
    #[must_use]
    pub fn knows(self, layer_id: u32) -> bool {
        layer_id < 32 && (self.0 & (1 << layer_id)) != 0
    }

    /// Returns `true` if every bit set in `required` is also set here.
    #[must_use]
    pub fn superset_contains(self, required: Self) -> bool {
        (self.0 & required.0) == required.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dominium_kernel::Q16;

    #[test]
    fn read_absent_layer_is_unknown() {
        let storage = FieldStorage::new();
        assert_eq!(storage.get(0, 0, 0, 0), None);
    }

    #[test]
    fn read_absent_cell_in_known_layer_is_default() {
        let mut storage = FieldStorage::new();
        storage.create_layer(1, (4, 4, 1), Q16::from_int(7)).unwrap();
        assert_eq!(storage.get(1, 2, 2, 0), Some(Q16::from_int(7)));
    }

    #[test]
    fn write_to_absent_layer_fails() {
        let mut storage = FieldStorage::new();
        assert_eq!(
            storage.set(1, 0, 0, 0, Q16::from_int(1)),
            Err(FieldError::NoSuchLayer(1))
        );
    }

    #[test]
    fn write_preserves_layer_existence_and_is_read_back() {
        let mut storage = FieldStorage::new();
        storage.create_layer(1, (4, 4, 1), Q16::zero()).unwrap();
        storage.set(1, 1, 1, 0, Q16::from_int(9)).unwrap();
        assert_eq!(storage.get(1, 1, 1, 0), Some(Q16::from_int(9)));
        assert_eq!(storage.get(1, 0, 0, 0), Some(Q16::zero()));
    }

    #[test]
    fn duplicate_layer_creation_fails() {
        let mut storage = FieldStorage::new();
        storage.create_layer(1, (1, 1, 1), Q16::zero()).unwrap();
        assert_eq!(
            storage.create_layer(1, (1, 1, 1), Q16::zero()),
            Err(FieldError::LayerExists(1))
        );
    }

    #[test]
    fn knowledge_mask_superset_contains() {
        let mut mask = KnowledgeMask::empty();
        mask.mark_known(3);
        mask.mark_known(5);
        let required = KnowledgeMask::from_bits((1 << 3) | (1 << 5));
        assert!(mask.superset_contains(required));
        assert!(!mask.superset_contains(KnowledgeMask::from_bits(1 << 7)));
    }
}
