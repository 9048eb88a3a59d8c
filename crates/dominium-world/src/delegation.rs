//! Delegation records: one agent lending process authorization to another
//! (spec §3.3).

use crate::mask::AuthorityMask;
use dominium_registry::MaskContributor;

/// What kind of relationship a delegation encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DelegationKind {
    /// Delegatee may act on the delegator's behalf for a bounded process set.
    ActOnBehalf,
    /// Delegatee inherits a copy of the delegator's authority outright.
    AuthorityTransfer,
}

/// One agent authorizing another to act on its behalf for a bounded set of
/// process kinds, for a bounded time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delegation {
    /// The agent granting the delegation.
    pub delegator_ref: u64,
    /// The agent receiving it.
    pub delegatee_ref: u64,
    /// The relationship this delegation encodes.
    pub delegation_kind: DelegationKind,
    /// Bitmask of process kinds this delegation authorizes. A zero mask
    /// authorizes no process, which is a valid (if useless) delegation.
    pub allowed_process_mask: u32,
    /// Authority bits contributed to the delegatee's effective authority
    /// while this delegation is active.
    pub authority_mask: AuthorityMask,
    /// Tick after which this delegation is no longer active, or `0` for no
    /// expiry.
    pub expiry: u64,
    /// The grant, institution, or scenario action that created this entry,
    /// for audit trails; `0` if none.
    pub provenance_ref: u64,
    /// Set by an explicit revocation command; once `true`, this entry
    /// contributes nothing regardless of `expiry`.
    pub revoked: bool,
}

impl MaskContributor for Delegation {
    fn subject_id(&self) -> u64 {
        self.delegatee_ref
    }

    fn is_active(&self, now: u64) -> bool {
        !self.revoked && (self.expiry == 0 || self.expiry > now)
    }

    fn mask_bits(&self) -> u32 {
        self.authority_mask.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delegation() -> Delegation {
        Delegation {
            delegator_ref: 1,
            delegatee_ref: 2,
            delegation_kind: DelegationKind::ActOnBehalf,
            allowed_process_mask: 0b1,
            authority_mask: AuthorityMask(0b10),
            expiry: 0,
            provenance_ref: 0,
            revoked: false,
        }
    }

    #[test]
    fn active_until_revoked() {
        let mut delegation = delegation();
        assert!(delegation.is_active(100));
        delegation.revoked = true;
        assert!(!delegation.is_active(100));
    }

    #[test]
    fn expiry_of_zero_never_expires() {
        let delegation = delegation();
        assert!(delegation.is_active(u64::MAX));
    }

    #[test]
    fn expiry_excludes_at_and_after() {
        let mut delegation = delegation();
        delegation.expiry = 10;
        assert!(delegation.is_active(9));
        assert!(!delegation.is_active(10));
        assert!(!delegation.is_active(11));
    }
}
