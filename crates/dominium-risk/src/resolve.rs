//! The budgeted resolve fold, ported from `dom_risk_resolve`.

use dominium_kernel::{Q16, Q48};

use crate::budget::Budget;
use crate::constants::AUDIT_MIN;
use crate::domain::{is_region_collapsed, RiskDomain};
use crate::falloff::falloff;
use crate::types::ClaimStatus;

/// Flags describing why a [`ResolveResult`] is incomplete or what happened
/// during the fold, `dom_risk_resolve_flags`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveFlags {
    /// The budget ran out before every matching record was scanned.
    pub partial: bool,
    /// At least one exposure crossed its `exposure_limit` this call.
    pub over_limit: bool,
    /// At least one claim was approved this call.
    pub claim_approved: bool,
    /// At least one claim was denied this call.
    pub claim_denied: bool,
}

/// Why `resolve` refused to fold at all, `dom_risk_refusal_reason`
/// (collapsed to the two reasons `resolve` itself can produce; missing-record
/// reasons belong to the query API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefusalReason {
    /// No refusal; `ok` is `true`.
    #[default]
    None,
    /// The domain is not active.
    DomainInactive,
    /// The budget was exhausted before the base charge could be paid.
    Budget,
}

/// Outcome of one `resolve` call, `dom_risk_resolve_result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveResult {
    /// Whether the fold ran at all (`false` only on domain-inactive or
    /// base-budget refusal).
    pub ok: bool,
    /// Why `ok` is `false`, or [`RefusalReason::None`].
    pub refusal_reason: RefusalReason,
    /// What happened during the fold.
    pub flags: ResolveFlags,
    /// Fields scanned.
    pub field_count: u32,
    /// Exposures scanned.
    pub exposure_count: u32,
    /// Exposures that crossed their limit this call.
    pub exposure_over_limit_count: u32,
    /// Profiles scanned.
    pub profile_count: u32,
    /// Claims scanned.
    pub claim_count: u32,
    /// Claims approved this call.
    pub claim_approved_count: u32,
    /// Claims denied this call.
    pub claim_denied_count: u32,
    /// Sum of scanned exposures' accumulated value.
    pub exposure_total: Q48,
    /// Sum of scanned profiles' impact mean.
    pub impact_mean_total: Q48,
    /// Sum of this call's approved claim payouts.
    pub claim_paid_total: Q48,
}

impl ResolveResult {
    fn capsule(capsule: &crate::types::MacroCapsule) -> Self {
        Self {
            ok: true,
            refusal_reason: RefusalReason::None,
            flags: ResolveFlags {
                partial: true,
                ..ResolveFlags::default()
            },
            field_count: capsule.field_count,
            exposure_count: capsule.exposure_count,
            profile_count: capsule.profile_count,
            exposure_total: capsule.exposure_total,
            ..Self::default()
        }
    }

    fn refused(reason: RefusalReason) -> Self {
        Self {
            ok: false,
            refusal_reason: reason,
            ..Self::default()
        }
    }
}

/// Folds a region's (or the whole domain's, if `region_id == 0`) live risk
/// records forward by `tick_delta` ticks: accumulates exposure, refreshes
/// profiles, and adjudicates claims, charging `budget` per record touched.
///
/// Mirrors `dom_risk_resolve`'s five stages exactly: a domain/budget gate, a
/// field scan, exposure accumulation (field falloff folded into each
/// matching exposure), profile aggregation (`Q48::apply_ratio` over matched
/// exposures), and claim adjudication (deductible, coverage ratio, an audit
/// penalty below [`AUDIT_MIN`], then claim- and policy-level clamping).
#[tracing::instrument(skip(domain, budget), fields(region_id, tick))]
pub fn resolve(
    domain: &mut RiskDomain,
    region_id: u32,
    tick: u64,
    tick_delta: u64,
    budget: &mut Budget,
) -> ResolveResult {
    if !domain.active {
        return ResolveResult::refused(RefusalReason::DomainInactive);
    }

    if !budget.consume(domain.policy.cost_base) {
        return ResolveResult::refused(RefusalReason::Budget);
    }

    if region_id != 0 {
        if let Some(capsule) = domain.capsule(region_id) {
            return ResolveResult::capsule(capsule);
        }
    }

    let tick_delta = if tick_delta == 0 { 1 } else { tick_delta };

    let mut result = ResolveResult {
        ok: true,
        ..ResolveResult::default()
    };

    scan_fields(domain, region_id, budget, &mut result);
    accumulate_exposures(domain, region_id, tick_delta, budget, &mut result);
    aggregate_profiles(domain, region_id, budget, &mut result);
    adjudicate_claims(domain, tick, budget, &mut result);

    result
}

fn mark_partial_budget(result: &mut ResolveResult) {
    result.flags.partial = true;
    if result.refusal_reason == RefusalReason::None {
        result.refusal_reason = RefusalReason::Budget;
    }
}

fn scan_fields(domain: &RiskDomain, region_id: u32, budget: &mut Budget, result: &mut ResolveResult) {
    let cost = domain.policy.cost_field;
    for (_, field) in domain.fields.iter() {
        if region_id != 0 && field.region_id != region_id {
            continue;
        }
        if region_id == 0 && is_region_collapsed(&domain.capsules, field.region_id) {
            result.flags.partial = true;
            continue;
        }
        if !budget.consume(cost) {
            mark_partial_budget(result);
            break;
        }
        result.field_count += 1;
    }
}

fn accumulate_exposures(
    domain: &mut RiskDomain,
    region_id: u32,
    tick_delta: u64,
    budget: &mut Budget,
    result: &mut ResolveResult,
) {
    let cost_exposure = domain.policy.cost_exposure;
    let cost_field = domain.policy.cost_field;
    let RiskDomain {
        capsules,
        exposures,
        fields,
        ..
    } = domain;
    for (_, exposure) in exposures.iter_mut() {
        let exposure_region = exposure.region_id;
        if region_id != 0 && exposure_region != region_id {
            continue;
        }
        if region_id == 0 && is_region_collapsed(capsules, exposure_region) {
            result.flags.partial = true;
            continue;
        }
        if !budget.consume(cost_exposure) {
            mark_partial_budget(result);
            break;
        }

        let mut delta_total = Q48::zero();
        for (_, field) in fields.iter() {
            if region_id != 0 && field.region_id != region_id {
                continue;
            }
            if region_id == 0 && is_region_collapsed(capsules, field.region_id) {
                result.flags.partial = true;
                continue;
            }
            if exposure.risk_type_id != 0 && exposure.risk_type_id != field.risk_type_id {
                continue;
            }
            if !budget.consume(cost_field) {
                mark_partial_budget(result);
                break;
            }
            if field.exposure_rate.raw() <= 0 {
                continue;
            }
            let fall = falloff(field, exposure.location);
            if fall.raw() <= 0 {
                continue;
            }
            let mut contribution = field.exposure_rate.mul(fall);
            if exposure.exposure_rate.raw() > 0 {
                contribution = contribution.mul(exposure.exposure_rate);
            }
            if exposure.sensitivity.raw() > 0 {
                contribution = contribution.mul(exposure.sensitivity);
            }
            if contribution.raw() > 0 {
                let mut delta = contribution.to_q48();
                if tick_delta > 1 {
                    delta = delta.mul(Q48::from_int(i64::try_from(tick_delta).unwrap_or(i64::MAX)));
                }
                delta_total = delta_total.add(delta);
            }
        }

        if delta_total.raw() != 0 {
            exposure.exposure_accumulated = exposure.exposure_accumulated.add(delta_total);
        }
        if exposure.exposure_limit.raw() > 0
            && exposure.exposure_accumulated.raw() >= exposure.exposure_limit.raw()
        {
            exposure.over_limit = true;
            result.flags.over_limit = true;
            result.exposure_over_limit_count += 1;
        }
        result.exposure_total = result.exposure_total.add(exposure.exposure_accumulated);
        result.exposure_count += 1;
    }
}

fn aggregate_profiles(
    domain: &mut RiskDomain,
    region_id: u32,
    budget: &mut Budget,
    result: &mut ResolveResult,
) {
    let cost = domain.policy.cost_profile;
    let RiskDomain {
        capsules,
        types,
        exposures,
        profiles,
        ..
    } = domain;
    for (_, profile) in profiles.iter_mut() {
        let profile_region = profile.region_id;
        if region_id != 0 && profile_region != region_id {
            continue;
        }
        if region_id == 0 && is_region_collapsed(capsules, profile_region) {
            result.flags.partial = true;
            continue;
        }
        if !budget.consume(cost) {
            mark_partial_budget(result);
            break;
        }

        let mut exposure_total = Q48::zero();
        let mut impact_mean = Q48::zero();
        let mut spread_sum = Q16::zero();
        let mut uncertainty_sum = Q16::zero();
        let mut matched = 0u32;

        for (_, exposure) in exposures.iter() {
            if profile.subject_ref_id != 0 && exposure.subject_ref_id != profile.subject_ref_id {
                continue;
            }
            if profile_region != 0 && exposure.region_id != profile_region {
                continue;
            }
            exposure_total = exposure_total.add(exposure.exposure_accumulated);
            let ratio = if exposure.exposure_limit.raw() > 0 {
                exposure
                    .exposure_accumulated
                    .div(exposure.exposure_limit)
                    .to_q16()
                    .clamp_ratio()
            } else {
                crate::constants::RATIO_ONE
            };
            if let Some(risk_type) = types.find(exposure.risk_type_id) {
                impact_mean = impact_mean.add(risk_type.default_impact_mean.apply_ratio(ratio));
                spread_sum = spread_sum.add(risk_type.default_impact_spread);
            }
            uncertainty_sum = uncertainty_sum.add(exposure.uncertainty);
            matched += 1;
        }

        profile.exposure_total = exposure_total;
        profile.impact_mean = impact_mean;
        if matched > 0 {
            let divisor = Q16::from_int(i32::try_from(matched).unwrap_or(i32::MAX));
            profile.impact_spread = spread_sum.div(divisor);
            profile.uncertainty = uncertainty_sum.div(divisor);
        }
        result.impact_mean_total = result.impact_mean_total.add(impact_mean);
        result.profile_count += 1;
    }
}

fn adjudicate_claims(domain: &mut RiskDomain, tick: u64, budget: &mut Budget, result: &mut ResolveResult) {
    let cost = domain.policy.cost_claim;
    let RiskDomain {
        policies,
        events,
        claims,
        ..
    } = domain;
    for (_, claim) in claims.iter_mut() {
        if !budget.consume(cost) {
            mark_partial_budget(result);
            break;
        }
        result.claim_count += 1;

        let Some(policy) = policies.find(claim.policy_id) else {
            deny(claim, result);
            continue;
        };
        let Some(event) = events.find(claim.event_id) else {
            deny(claim, result);
            continue;
        };

        let active = !(policy.start_tick != 0 && tick < policy.start_tick)
            && !(policy.end_tick != 0 && tick > policy.end_tick);
        if !active {
            deny(claim, result);
            continue;
        }
        if policy.risk_type_id != 0 && policy.risk_type_id != event.risk_type_id {
            deny(claim, result);
            continue;
        }
        if policy.region_id != 0 && policy.region_id != event.region_id {
            deny(claim, result);
            continue;
        }

        let mut payout = if event.loss_amount.raw() > policy.deductible.raw() {
            event.loss_amount.sub(policy.deductible)
        } else {
            Q48::zero()
        };
        payout = payout.apply_ratio(policy.coverage_ratio);
        if policy.audit_score.raw() < AUDIT_MIN.raw() {
            let audit_ratio = crate::constants::RATIO_ONE.sub(crate::constants::AUDIT_PENALTY);
            payout = payout.apply_ratio(audit_ratio);
        }
        if claim.claim_amount.raw() > 0 && payout.raw() > claim.claim_amount.raw() {
            payout = claim.claim_amount;
        }
        if policy.payout_limit.raw() > 0 && payout.raw() > policy.payout_limit.raw() {
            payout = policy.payout_limit;
        }

        claim.approved_amount = payout;
        claim.resolved_tick = tick;
        if payout.raw() > 0 {
            claim.status = ClaimStatus::Approved;
            result.claim_approved_count += 1;
            result.flags.claim_approved = true;
            result.claim_paid_total = result.claim_paid_total.add(payout);
        } else {
            deny(claim, result);
        }
    }
}

fn deny(claim: &mut crate::types::InsuranceClaim, result: &mut ResolveResult) {
    claim.status = ClaimStatus::Denied;
    result.claim_denied_count += 1;
    result.flags.claim_denied = true;
}

#[cfg(test)]
mod tests {
    use super::{resolve, RefusalReason};
    use crate::budget::Budget;
    use crate::domain::RiskDomain;
    use crate::types::{
        ClaimStatus, InsuranceClaim, InsurancePolicy, LiabilityEvent, Point, RiskExposure,
        RiskField,
    };
    use dominium_kernel::{Q16, Q48};

    fn domain_with_field_and_exposure() -> RiskDomain {
        let mut domain = RiskDomain::new();
        domain
            .fields
            .register(
                None,
                RiskField {
                    risk_type_id: 1,
                    exposure_rate: Q16::from_int(1),
                    region_id: 1,
                    radius: Q16::from_int(10),
                    center: Point::default(),
                },
            )
            .unwrap();
        domain
            .exposures
            .register(
                None,
                RiskExposure {
                    risk_type_id: 1,
                    exposure_rate: Q16::from_int(1),
                    exposure_limit: Q48::from_int(100),
                    exposure_accumulated: Q48::zero(),
                    sensitivity: Q16::from_int(1),
                    uncertainty: Q16::zero(),
                    subject_ref_id: 1,
                    region_id: 1,
                    location: Point::default(),
                    over_limit: false,
                },
            )
            .unwrap();
        domain
    }

    #[test]
    fn inactive_domain_refuses() {
        let mut domain = RiskDomain::new();
        domain.active = false;
        let mut budget = Budget::unbounded();
        let result = resolve(&mut domain, 0, 1, 1, &mut budget);
        assert!(!result.ok);
        assert_eq!(result.refusal_reason, RefusalReason::DomainInactive);
    }

    #[test]
    fn exhausted_budget_refuses_before_base_charge() {
        let mut domain = RiskDomain::new();
        let mut budget = Budget::new(0);
        let result = resolve(&mut domain, 0, 1, 1, &mut budget);
        assert!(!result.ok);
        assert_eq!(result.refusal_reason, RefusalReason::Budget);
    }

    #[test]
    fn exposure_accumulates_from_field_falloff() {
        let mut domain = domain_with_field_and_exposure();
        let mut budget = Budget::unbounded();
        let result = resolve(&mut domain, 0, 1, 1, &mut budget);
        assert!(result.ok);
        assert_eq!(result.exposure_count, 1);
        assert!(result.exposure_total.raw() > 0);
        let (_, exposure) = domain.exposures.iter().next().unwrap();
        assert!(exposure.exposure_accumulated.raw() > 0);
    }

    #[test]
    fn collapsed_region_short_circuits_to_capsule_totals() {
        let mut domain = domain_with_field_and_exposure();
        domain.collapse_region(1);
        let mut budget = Budget::unbounded();
        let result = resolve(&mut domain, 1, 1, 1, &mut budget);
        assert!(result.ok);
        assert!(result.flags.partial);
        assert_eq!(result.field_count, 1);
        assert_eq!(result.exposure_count, 1);
    }

    #[test]
    fn claim_approves_within_policy_limits() {
        let mut domain = RiskDomain::new();
        let policy_id = domain
            .policies
            .register(
                None,
                InsurancePolicy {
                    holder_ref_id: 1,
                    risk_type_id: 1,
                    coverage_ratio: crate::constants::RATIO_ONE,
                    payout_limit: Q48::from_int(1_000),
                    deductible: Q48::from_int(10),
                    audit_score: crate::constants::RATIO_ONE,
                    start_tick: 0,
                    end_tick: 0,
                    region_id: 0,
                },
            )
            .unwrap();
        let event_id = domain
            .events
            .register(
                None,
                LiabilityEvent {
                    risk_type_id: 1,
                    exposure_ref_id: 0,
                    loss_amount: Q48::from_int(100),
                    event_tick: 5,
                    subject_ref_id: 1,
                    region_id: 0,
                },
            )
            .unwrap();
        domain
            .claims
            .register(
                None,
                InsuranceClaim {
                    policy_id,
                    event_id,
                    claim_amount: Q48::zero(),
                    approved_amount: Q48::zero(),
                    filed_tick: 5,
                    resolved_tick: 0,
                    status: ClaimStatus::Pending,
                },
            )
            .unwrap();

        let mut budget = Budget::unbounded();
        let result = resolve(&mut domain, 0, 5, 1, &mut budget);
        assert_eq!(result.claim_approved_count, 1);
        assert!(result.claim_paid_total.raw() > 0);
        let (_, claim) = domain.claims.iter().next().unwrap();
        assert_eq!(claim.status, ClaimStatus::Approved);
        assert_eq!(claim.approved_amount, Q48::from_int(90));
    }

    #[test]
    fn claim_denied_when_policy_missing() {
        let mut domain = RiskDomain::new();
        domain
            .claims
            .register(
                None,
                InsuranceClaim {
                    policy_id: 999,
                    event_id: 999,
                    claim_amount: Q48::zero(),
                    approved_amount: Q48::zero(),
                    filed_tick: 1,
                    resolved_tick: 0,
                    status: ClaimStatus::Pending,
                },
            )
            .unwrap();
        let mut budget = Budget::unbounded();
        let result = resolve(&mut domain, 0, 1, 1, &mut budget);
        assert_eq!(result.claim_denied_count, 1);
        assert_eq!(result.claim_paid_total, Q48::zero());
    }
}
