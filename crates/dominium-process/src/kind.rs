//! The five physical process kinds (spec §2 C6 row, §4.6).

/// A physical process the interpreter can evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessKind {
    /// Reads the world surface into an agent's subjective knowledge.
    Survey,
    /// Draws resource into an assembly.
    Collect,
    /// Advances an assembly's construction progress.
    Assemble,
    /// Repairs or re-establishes a network edge.
    Connect,
    /// Restores a degraded or failed network node.
    Repair,
}

impl ProcessKind {
    /// The capability bit the physical context must hold for this kind.
    ///
    /// Bit assignment is this crate's own namespace (distinct from
    /// `dominium_world::StepKind`'s bits): spec.md does not name numeric
    /// capability bits for physical processes, only that one is checked.
    #[must_use]
    pub const fn required_capability_bit(self) -> u32 {
        match self {
            Self::Survey => 1 << 0,
            Self::Collect => 1 << 1,
            Self::Assemble => 1 << 2,
            Self::Connect => 1 << 3,
            Self::Repair => 1 << 4,
        }
    }

    /// The authority bit the physical context must hold for this kind.
    #[must_use]
    pub const fn required_authority_bit(self) -> u32 {
        self.required_capability_bit()
    }

    /// The bit this kind matches against an active constraint's
    /// `process_kind_mask`.
    #[must_use]
    pub const fn process_kind_bit(self) -> u32 {
        self.required_capability_bit()
    }

    /// Whether this kind draws on or mutates network state, and so is
    /// subject to the `RESOURCE_EMPTY`/`CAPACITY` precondition.
    #[must_use]
    pub const fn touches_network(self) -> bool {
        matches!(self, Self::Collect | Self::Connect | Self::Repair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_kind_has_a_distinct_bit() {
        let bits = [
            ProcessKind::Survey.required_capability_bit(),
            ProcessKind::Collect.required_capability_bit(),
            ProcessKind::Assemble.required_capability_bit(),
            ProcessKind::Connect.required_capability_bit(),
            ProcessKind::Repair.required_capability_bit(),
        ];
        for (i, a) in bits.iter().enumerate() {
            for (j, b) in bits.iter().enumerate() {
                assert!(i == j || a != b);
            }
        }
    }

    #[test]
    fn only_resource_touching_kinds_consult_the_network() {
        assert!(!ProcessKind::Survey.touches_network());
        assert!(!ProcessKind::Assemble.touches_network());
        assert!(ProcessKind::Collect.touches_network());
        assert!(ProcessKind::Connect.touches_network());
        assert!(ProcessKind::Repair.touches_network());
    }
}
