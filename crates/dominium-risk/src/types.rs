//! Risk/liability/insurance records, ported from `dom_risk_*`/
//! `dom_liability_*`/`dom_insurance_*` (spec §3 Risk surface).

use dominium_kernel::{Q16, Q48};

/// A point in world space, used only to compute a field's falloff distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    /// X coordinate, Q16.16.
    pub x: Q16,
    /// Y coordinate, Q16.16.
    pub y: Q16,
    /// Z coordinate, Q16.16.
    pub z: Q16,
}

/// Which hazard category a risk type belongs to, `dom_risk_class`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskClass {
    /// Fire hazard.
    Fire,
    /// Flood hazard.
    Flood,
    /// Toxic exposure hazard.
    Toxic,
    /// Thermal hazard.
    Thermal,
    /// Financial hazard.
    Financial,
    /// Informational/reputational hazard.
    Info,
}

impl RiskClass {
    /// This class's 1-based slot in a [`crate::MacroCapsule`]'s
    /// `risk_type_counts`, mirroring the original's `risk_class - 1`.
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::Fire => 0,
            Self::Flood => 1,
            Self::Toxic => 2,
            Self::Thermal => 3,
            Self::Financial => 4,
            Self::Info => 5,
        }
    }
}

/// A named hazard category with default exposure/impact parameters,
/// `dom_risk_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskType {
    /// Hazard category.
    pub risk_class: RiskClass,
    /// Default per-tick exposure rate new exposures inherit.
    pub default_exposure_rate: Q16,
    /// Default mean impact of an event of this type.
    pub default_impact_mean: Q48,
    /// Default spread (uncertainty width) of impact.
    pub default_impact_spread: Q16,
    /// Default uncertainty carried by exposures of this type.
    pub default_uncertainty: Q16,
}

/// A spatial source of risk, `dom_risk_field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskField {
    /// The risk type this field radiates.
    pub risk_type_id: u64,
    /// Per-tick exposure rate at the field's center.
    pub exposure_rate: Q16,
    /// Region this field belongs to, for region-scoped folds.
    pub region_id: u32,
    /// Distance at which this field's contribution falls to zero.
    pub radius: Q16,
    /// World-space center of the field.
    pub center: Point,
}

/// A subject's accumulating exposure to a risk type, `dom_risk_exposure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskExposure {
    /// The risk type this exposure tracks, or `0` to match any type.
    pub risk_type_id: u64,
    /// Scales every field contribution this exposure accumulates.
    pub exposure_rate: Q16,
    /// Accumulated exposure above which `OVER_LIMIT` is raised; `0` disables
    /// the limit.
    pub exposure_limit: Q48,
    /// Running accumulated exposure.
    pub exposure_accumulated: Q48,
    /// Scales every field contribution (e.g. protective equipment reduces
    /// this below `1.0`).
    pub sensitivity: Q16,
    /// Uncertainty carried into profile aggregation.
    pub uncertainty: Q16,
    /// The agent or institution this exposure belongs to.
    pub subject_ref_id: u64,
    /// Region this exposure belongs to, for region-scoped folds.
    pub region_id: u32,
    /// World-space location used to evaluate field falloff.
    pub location: Point,
    /// Set once accumulated exposure reaches `exposure_limit`.
    pub over_limit: bool,
}

/// An aggregated risk summary for one subject within one region,
/// `dom_risk_profile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RiskProfile {
    /// Subject this profile summarizes, or `0` to aggregate all subjects.
    pub subject_ref_id: u64,
    /// Region this profile is scoped to.
    pub region_id: u32,
    /// Sum of matched exposures' accumulated value.
    pub exposure_total: Q48,
    /// Ratio-weighted sum of matched risk types' default impact mean.
    pub impact_mean: Q48,
    /// Average impact spread across matched exposures.
    pub impact_spread: Q16,
    /// Average uncertainty across matched exposures.
    pub uncertainty: Q16,
}

impl Default for Point {
    fn default() -> Self {
        Self {
            x: Q16::zero(),
            y: Q16::zero(),
            z: Q16::zero(),
        }
    }
}

/// A realized loss, `dom_liability_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiabilityEvent {
    /// The risk type this loss realizes.
    pub risk_type_id: u64,
    /// The exposure this loss is attributed to, or `0` if none.
    pub exposure_ref_id: u64,
    /// Size of the loss.
    pub loss_amount: Q48,
    /// Tick this event occurred.
    pub event_tick: u64,
    /// Subject who suffered the loss.
    pub subject_ref_id: u64,
    /// Region this event occurred in.
    pub region_id: u32,
}

/// An insurance contract, `dom_insurance_policy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsurancePolicy {
    /// The agent or institution this policy covers.
    pub holder_ref_id: u64,
    /// Risk type covered, or `0` to cover every type.
    pub risk_type_id: u64,
    /// Fraction of a post-deductible loss this policy pays out.
    pub coverage_ratio: Q16,
    /// Maximum single payout.
    pub payout_limit: Q48,
    /// Amount of loss the holder absorbs before coverage applies.
    pub deductible: Q48,
    /// Compliance/audit score; below [`crate::constants::AUDIT_MIN`]
    /// triggers a flat payout penalty.
    pub audit_score: Q16,
    /// Tick this policy becomes active, or `0` for always-active.
    pub start_tick: u64,
    /// Tick this policy lapses, or `0` for never.
    pub end_tick: u64,
    /// Region this policy covers, or `0` for every region.
    pub region_id: u32,
}

/// A filed claim against a policy, `dom_insurance_claim`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsuranceClaim {
    /// The policy this claim is filed against.
    pub policy_id: u64,
    /// The event this claim is filed for.
    pub event_id: u64,
    /// Amount claimed; `0` means unbounded (payout is not clamped to it).
    pub claim_amount: Q48,
    /// Amount approved once resolved.
    pub approved_amount: Q48,
    /// Tick this claim was filed.
    pub filed_tick: u64,
    /// Tick this claim was resolved, or `0` if still pending.
    pub resolved_tick: u64,
    /// Whether this claim resolved approved or denied.
    pub status: ClaimStatus,
}

/// A claim's resolution outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimStatus {
    /// Not yet resolved by `resolve`.
    Pending,
    /// Resolved with a nonzero payout.
    Approved,
    /// Resolved with no payout (policy/event mismatch, lapsed, or audit-zeroed).
    Denied,
}

/// A region's summarized risk state, replacing its live records once
/// collapsed, `dom_risk_macro_capsule`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroCapsule {
    /// The region this capsule summarizes.
    pub region_id: u32,
    /// Fields that were live in this region at collapse time.
    pub field_count: u32,
    /// Exposures that were live in this region at collapse time.
    pub exposure_count: u32,
    /// Profiles that were live in this region at collapse time.
    pub profile_count: u32,
    /// Sum of accumulated exposure at collapse time.
    pub exposure_total: Q48,
    /// Count of fields per [`RiskClass`] slot at collapse time.
    pub risk_type_counts: [u32; crate::constants::CLASS_COUNT],
    /// Histogram of exposures' accumulated/limit ratio at collapse time.
    pub exposure_hist: [Q16; crate::constants::HIST_BINS],
}
