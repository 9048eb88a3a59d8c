//! Named bitmask wrappers shared by agents, goals, and grants.
//!
//! Each mask is a plain `u32` newtype; the bit assignments themselves are a
//! simulation-content concern (scenario/template data), not a kernel one, so
//! these types expose only set algebra, never named constants.

/// Capabilities an agent (or a command's requirement set) may hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapabilityMask(pub u32);

/// Authority bits, either held directly by an agent or contributed by
/// active delegations and grants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuthorityMask(pub u32);

macro_rules! mask_ops {
    ($ty:ty) => {
        impl $ty {
            /// The empty mask.
            #[must_use]
            pub const fn empty() -> Self {
                Self(0)
            }

            /// Returns `true` if every bit set in `required` is also set here.
            #[must_use]
            pub const fn superset_contains(self, required: Self) -> bool {
                (self.0 & required.0) == required.0
            }

            /// Bitwise union.
            #[must_use]
            pub const fn union(self, other: Self) -> Self {
                Self(self.0 | other.0)
            }
        }
    };
}

mask_ops!(CapabilityMask);
mask_ops!(AuthorityMask);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superset_contains_is_bitwise() {
        let held = CapabilityMask(0b1011);
        assert!(held.superset_contains(CapabilityMask(0b0011)));
        assert!(!held.superset_contains(CapabilityMask(0b0100)));
    }

    #[test]
    fn union_combines_bits() {
        let a = AuthorityMask(0b0001);
        let b = AuthorityMask(0b0010);
        assert_eq!(a.union(b), AuthorityMask(0b0011));
    }
}
