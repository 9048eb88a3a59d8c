//! Assembly records: physical construction progress mutated by `collect`
//! and `assemble` (spec §4.6).

use dominium_kernel::Q16;

/// One in-progress or completed physical assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assembly {
    /// Accumulated construction progress, Q16.16, clamped to `capacity`.
    pub progress: Q16,
    /// Progress required for this assembly to be considered complete.
    pub capacity: Q16,
}

impl Assembly {
    /// Creates an assembly with no progress yet made.
    #[must_use]
    pub fn new(capacity: Q16) -> Self {
        Self {
            progress: Q16::zero(),
            capacity,
        }
    }

    /// Returns `true` once `progress >= capacity`.
    #[must_use]
    pub fn is_complete(self) -> bool {
        self.progress.raw() >= self.capacity.raw()
    }

    /// Adds `amount` to `progress`, clamped to `[0, capacity]`.
    pub fn add_progress(&mut self, amount: Q16) {
        let raw = self.progress.raw().saturating_add(amount.raw());
        self.progress = Q16::from_raw(raw.clamp(0, self.capacity.raw()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_clamps_to_capacity() {
        let mut assembly = Assembly::new(Q16::from_int(10));
        assembly.add_progress(Q16::from_int(15));
        assert_eq!(assembly.progress, Q16::from_int(10));
        assert!(assembly.is_complete());
    }

    #[test]
    fn fresh_assembly_is_incomplete() {
        let assembly = Assembly::new(Q16::from_int(10));
        assert!(!assembly.is_complete());
    }
}
