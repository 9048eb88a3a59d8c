//! Institution records: the backing authority behind grants and constraints
//! (spec §3.3).

use dominium_kernel::Q16;

/// An institution's standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstitutionStatus {
    /// Issuing grants and enforcing constraints normally.
    Active,
    /// Collapsed; every grant and constraint it issued stops applying
    /// (enforced by `dominium-sim` at collapse time, not read lazily here).
    Collapsed,
}

/// An institution: the entity whose legitimacy backs the authority grants
/// and constraints issued in its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Institution {
    /// Current standing.
    pub status: InstitutionStatus,
    /// Current legitimacy, Q16.16. Collapse is triggered externally (e.g.
    /// by `dominium-risk` claim adjudication) when this falls to zero or
    /// below; it is not re-derived from legitimacy on every read.
    pub legitimacy: Q16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_construction_is_active() {
        let institution = Institution {
            status: InstitutionStatus::Active,
            legitimacy: Q16::from_int(1),
        };
        assert_eq!(institution.status, InstitutionStatus::Active);
    }
}
