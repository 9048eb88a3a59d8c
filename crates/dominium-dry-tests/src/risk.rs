//! Ergonomic [`RiskField`]/[`RiskExposure`] construction for tests.
//!
//! Mirrors the fixture shape `dominium-risk`'s own `resolve` tests build by
//! hand (`domain_with_field_and_exposure`): one field and one exposure
//! sharing a `risk_type_id` and `region_id`, with a Q48 exposure limit large
//! enough that a unit-rate resolve never trips `over_limit` unless the
//! caller asks it to.

use dominium_kernel::{Q16, Q48};
use dominium_risk::{Point, RiskExposure, RiskField};

/// Builds a [`RiskField`] covering `region_id` at the origin, with a unit
/// exposure rate and the given radius.
#[must_use]
pub fn risk_field(risk_type_id: u64, region_id: u32, radius: Q16) -> RiskField {
    RiskField {
        risk_type_id,
        exposure_rate: Q16::from_int(1),
        region_id,
        radius,
        center: origin(),
    }
}

fn origin() -> Point {
    Point {
        x: Q16::zero(),
        y: Q16::zero(),
        z: Q16::zero(),
    }
}

/// Builds a [`RiskExposure`] in `region_id` for `subject_ref_id`, with a
/// unit rate/sensitivity, zero uncertainty, and the given accumulation
/// limit.
#[must_use]
pub fn risk_exposure(risk_type_id: u64, region_id: u32, subject_ref_id: u64, exposure_limit: Q48) -> RiskExposure {
    RiskExposure {
        risk_type_id,
        exposure_rate: Q16::from_int(1),
        exposure_limit,
        exposure_accumulated: Q48::zero(),
        sensitivity: Q16::from_int(1),
        uncertainty: Q16::zero(),
        subject_ref_id,
        region_id,
        location: origin(),
        over_limit: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_field_carries_the_requested_region_and_type() {
        let field = risk_field(1, 7, Q16::from_int(10));
        assert_eq!(field.risk_type_id, 1);
        assert_eq!(field.region_id, 7);
    }

    #[test]
    fn risk_exposure_starts_unaccumulated_and_under_limit() {
        let exposure = risk_exposure(1, 7, 3, Q48::from_int(100));
        assert_eq!(exposure.exposure_accumulated, Q48::zero());
        assert!(!exposure.over_limit);
    }
}
