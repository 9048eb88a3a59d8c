//! What evaluating a physical process produces (spec §4.6).

use dominium_kernel::Q16;

/// The effect of a successfully evaluated process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessEffect {
    /// `survey` succeeded: the field layers it read are now known, and
    /// confidence/uncertainty were updated.
    Surveyed {
        /// Field layers newly marked known.
        surveyed_field_mask: u32,
        /// Updated confidence, Q16.16 (raw bit pattern, always nonnegative).
        confidence: Q16,
        /// Updated uncertainty, Q16.16 (raw bit pattern, always nonnegative).
        uncertainty: Q16,
    },
    /// `collect` or `assemble` advanced an assembly's progress.
    AssemblyAdvanced {
        /// The assembly mutated.
        assembly_id: u64,
        /// Its progress after this process ran.
        new_progress: Q16,
    },
    /// `connect` restored an edge to `Ok`.
    Connected {
        /// The node pair the restored edge joins.
        endpoints: (u64, u64),
    },
    /// `repair` restored a node to `Ok`.
    Repaired {
        /// The node restored.
        node_id: u64,
    },
}
