//! `local_process_desc`: the interpreter's input (spec §4.6).

use crate::kind::ProcessKind;
use dominium_kernel::Q16;
use dominium_world::{AuthorityMask, CapabilityMask};

/// One cell coordinate within a field layer.
pub type Cell = (i32, i32, i32);

/// A request to evaluate one physical process against the world.
#[derive(Debug, Clone, Copy)]
pub struct LocalProcessDesc {
    /// Which process to evaluate.
    pub kind: ProcessKind,
    /// Capabilities held by the physical context (the acting agent's
    /// effective capability mask).
    pub actor_capabilities: CapabilityMask,
    /// Authority held by the physical context.
    pub actor_authority: AuthorityMask,
    /// Agent or institution this process is scoped to, for constraint
    /// matching; `0` for an unscoped/global check.
    pub scope_ref: u64,
    /// Field layers this process requires knowledge of.
    pub required_field_mask: u32,
    /// The agent's current subjective knowledge mask, checked against
    /// `required_field_mask`.
    pub knowledge_mask: u32,
    /// Lets the process proceed despite `required_field_mask` not being a
    /// subset of `knowledge_mask`.
    pub allow_unknown: bool,
    /// The field layer and cell read (and, if `UNKNOWN`, refined) by a
    /// `survey`.
    pub field_id: u32,
    /// The cell this process reads or refines within `field_id`.
    pub cell: Cell,
    /// Amount of resource this process draws or deposits, if applicable.
    pub resource_amount: Option<Q16>,
    /// Energy load this process places on its network, if applicable.
    pub energy_load: Option<Q16>,
    /// Minimum structural support the configuration must meet.
    pub min_support: Option<Q16>,
    /// Actual structural support of the configuration being evaluated.
    pub support: Q16,
    /// Maximum surface gradient the configuration may not exceed.
    pub max_surface_gradient: Option<Q16>,
    /// Actual surface gradient of the configuration being evaluated.
    pub surface_gradient: Q16,
    /// The assembly this `collect`/`assemble` acts on.
    pub assembly_id: Option<u64>,
    /// The network node `repair` (or the resource source of `collect`)
    /// acts on.
    pub node_id: Option<u64>,
    /// The network edge `connect` acts on (as its unordered endpoints).
    pub edge_endpoints: Option<(u64, u64)>,
}
