//! Fixed tuning constants carried verbatim from
//! `original_source/engine/modules/world/risk_fields.cpp`.

use dominium_kernel::Q16;

/// `1.0` as a ratio, `DOM_RISK_RATIO_ONE_Q16` in the original.
pub const RATIO_ONE: Q16 = Q16::from_raw(0x0001_0000);

/// Below this audit score a policy's payout is penalized,
/// `DOM_RISK_AUDIT_MIN_Q16` in the original.
pub const AUDIT_MIN: Q16 = Q16::from_raw(0x0000_8000);

/// The flat ratio subtracted from `1.0` to penalize a sub-`AUDIT_MIN`
/// payout, `DOM_RISK_AUDIT_PENALTY_Q16` in the original.
pub const AUDIT_PENALTY: Q16 = Q16::from_raw(0x0000_8000);

/// Fallback per-record budget cost when a domain's policy does not name one,
/// `DOM_RISK_RESOLVE_COST_BASE` in the original.
pub const RESOLVE_COST_BASE: u32 = 1;

/// Number of histogram bins a collapsed region's exposure ratio is binned
/// into, `DOM_RISK_HIST_BINS` in the original.
pub const HIST_BINS: usize = 4;

/// Number of risk classes a collapsed region's capsule counts by,
/// `DOM_RISK_CLASS_COUNT` in the original.
pub const CLASS_COUNT: usize = 6;
