//! A risk domain's live records and tuning policy, `dom_risk_domain`.

use dominium_kernel::{Q16, Q48};
use dominium_registry::Registry;

use crate::constants::{CLASS_COUNT, HIST_BINS};
use crate::types::{
    InsuranceClaim, InsurancePolicy, LiabilityEvent, MacroCapsule, RiskExposure, RiskField,
    RiskProfile, RiskType,
};

/// Per-record-kind budget costs a domain charges `resolve` for touching one
/// record, `dom_domain_policy`'s `cost_*` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// Cost of the flat per-call base charge.
    pub cost_base: u32,
    /// Cost of touching one field.
    pub cost_field: u32,
    /// Cost of touching one exposure (including its inner field scan).
    pub cost_exposure: u32,
    /// Cost of touching one profile.
    pub cost_profile: u32,
    /// Cost of touching one claim.
    pub cost_claim: u32,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            cost_base: crate::constants::RESOLVE_COST_BASE,
            cost_field: crate::constants::RESOLVE_COST_BASE,
            cost_exposure: crate::constants::RESOLVE_COST_BASE,
            cost_profile: crate::constants::RESOLVE_COST_BASE,
            cost_claim: crate::constants::RESOLVE_COST_BASE,
        }
    }
}

/// The owning aggregate of one risk surface's live records plus any
/// collapsed regions, `dom_risk_domain`.
#[derive(Debug, Clone)]
pub struct RiskDomain {
    /// Whether `resolve` treats this domain as live. An inactive domain
    /// refuses every `resolve` call with `DomainInactive`.
    pub active: bool,
    /// Budget costs this domain charges per record kind.
    pub policy: Policy,
    /// Hazard categories.
    pub types: Registry<RiskType>,
    /// Spatial risk sources.
    pub fields: Registry<RiskField>,
    /// Subjects' accumulating exposures.
    pub exposures: Registry<RiskExposure>,
    /// Aggregated per-subject/region summaries.
    pub profiles: Registry<RiskProfile>,
    /// Realized losses.
    pub events: Registry<LiabilityEvent>,
    /// Insurance contracts.
    pub policies: Registry<InsurancePolicy>,
    /// Filed claims.
    pub claims: Registry<InsuranceClaim>,
    /// Capsules for collapsed regions, keyed by `region_id` cast to `u64`.
    ///
    /// `pub(crate)` rather than private so `resolve` can borrow it alongside
    /// another field of this struct directly (disjoint field borrows do not
    /// work through an accessor method).
    pub(crate) capsules: Registry<MacroCapsule>,
}

impl RiskDomain {
    /// Creates an active domain with the default policy and no records.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: true,
            policy: Policy::default(),
            types: Registry::new(0),
            fields: Registry::new(0),
            exposures: Registry::new(0),
            profiles: Registry::new(0),
            events: Registry::new(0),
            policies: Registry::new(0),
            claims: Registry::new(0),
            capsules: Registry::new(0),
        }
    }

    /// Whether `region_id` has been replaced by a [`MacroCapsule`] summary.
    #[must_use]
    pub fn region_collapsed(&self, region_id: u32) -> bool {
        is_region_collapsed(&self.capsules, region_id)
    }

    /// The capsule summarizing `region_id`, if it has been collapsed.
    #[must_use]
    pub fn capsule(&self, region_id: u32) -> Option<&MacroCapsule> {
        self.capsules.find(u64::from(region_id))
    }

    /// Replaces every live record in `region_id` with a single
    /// [`MacroCapsule`] summary, `dom_risk_domain_collapse_region`.
    ///
    /// Returns `false` if `region_id` is `0` or already collapsed.
    pub fn collapse_region(&mut self, region_id: u32) -> bool {
        if region_id == 0 || self.region_collapsed(region_id) {
            return false;
        }

        let mut field_count = 0u32;
        let mut risk_type_counts = [0u32; CLASS_COUNT];
        for (_, field) in self.fields.iter() {
            if field.region_id != region_id {
                continue;
            }
            field_count += 1;
            if let Some(risk_type) = self.types.find(field.risk_type_id) {
                risk_type_counts[risk_type.risk_class.slot()] += 1;
            }
        }

        let mut exposure_count = 0u32;
        let mut exposure_total = Q48::zero();
        let mut hist_bins = [0u32; HIST_BINS];
        for (_, exposure) in self.exposures.iter() {
            if exposure.region_id != region_id {
                continue;
            }
            exposure_count += 1;
            exposure_total = exposure_total.add(exposure.exposure_accumulated);
            let ratio = exposure_over_limit_ratio(exposure);
            hist_bins[crate::falloff::hist_bin(ratio)] += 1;
        }

        let mut profile_count = 0u32;
        for (_, profile) in self.profiles.iter() {
            if profile.region_id == region_id {
                profile_count += 1;
            }
        }

        let mut exposure_hist = [Q16::zero(); HIST_BINS];
        for (bin, count) in hist_bins.iter().enumerate() {
            exposure_hist[bin] = crate::falloff::hist_bin_ratio(*count, exposure_count);
        }

        let capsule = MacroCapsule {
            region_id,
            field_count,
            exposure_count,
            profile_count,
            exposure_total,
            risk_type_counts,
            exposure_hist,
        };
        // `region_collapsed` was just checked false above, so this cannot
        // hit `AlreadyExists`; `capsules` is unbounded so it cannot hit
        // `Full` either.
        let _ = self.capsules.register(Some(u64::from(region_id)), capsule);
        true
    }

    /// Restores `region_id` to live-record resolution by discarding its
    /// capsule, `dom_risk_domain_expand_region`.
    ///
    /// Returns `false` if `region_id` was not collapsed. The underlying
    /// live records were never deleted by `collapse_region`, so nothing is
    /// reconstructed; this simply makes `resolve` stop short-circuiting.
    pub fn expand_region(&mut self, region_id: u32) -> bool {
        if region_id == 0 {
            return false;
        }
        self.capsules.revoke(u64::from(region_id)).is_ok()
    }

    /// Number of regions currently collapsed.
    #[must_use]
    pub fn capsule_count(&self) -> usize {
        self.capsules.len()
    }
}

impl Default for RiskDomain {
    fn default() -> Self {
        Self::new()
    }
}

/// Standalone check over a capsule registry, usable while another field of
/// [`RiskDomain`] is already mutably borrowed.
pub(crate) fn is_region_collapsed(capsules: &Registry<MacroCapsule>, region_id: u32) -> bool {
    region_id != 0 && capsules.contains(u64::from(region_id))
}

fn exposure_over_limit_ratio(exposure: &RiskExposure) -> Q16 {
    if exposure.exposure_limit.raw() <= 0 {
        return Q16::zero();
    }
    exposure
        .exposure_accumulated
        .div(exposure.exposure_limit)
        .to_q16()
}
