// SPDX-License-Identifier: Apache-2.0
//! Shared refusal taxonomy (spec §7): every component-level error enum in
//! the workspace converges on one of these kinds at the `dominium-sim`
//! boundary, where it is rendered as a stable refusal code string.

use thiserror::Error;

/// The taxonomy of refusal kinds a handler can report, independent of which
/// component produced it. Component crates define their own fine-grained
/// error enums; each variant maps onto exactly one [`RefusalKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RefusalKind {
    /// Operation preconditions missing (no active world, empty registry).
    #[error("precondition not met")]
    Precondition,
    /// Mode, variant, or authority policy forbids the operation.
    #[error("policy forbids operation")]
    Policy,
    /// Buffer full, budget exhausted, or network over capacity.
    #[error("capacity or resource exhausted")]
    Capacity,
    /// Structured physical-process failure (see `dominium-process`).
    #[error("physical process refused")]
    PhysicalProcess,
    /// Save/load/template I/O failure.
    #[error("i/o failure")]
    Io,
}
