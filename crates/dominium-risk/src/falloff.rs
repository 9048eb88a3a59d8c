//! Distance, falloff, and histogram-bin helpers shared by `resolve` and
//! `collapse_region`, ported from the small `static` helpers in
//! `risk_fields.cpp`.

use dominium_kernel::Q16;

use crate::constants::HIST_BINS;
use crate::types::{Point, RiskField};

/// Euclidean distance between two points, `dom_risk_distance_q16`.
#[must_use]
pub fn distance(a: Point, b: Point) -> Q16 {
    let dx = a.x.sub(b.x);
    let dy = a.y.sub(b.y);
    let dz = a.z.sub(b.z);
    let sum = dx.mul(dx).add(dy.mul(dy)).add(dz.mul(dz));
    if sum.raw() < 0 {
        Q16::zero()
    } else {
        sum.sqrt()
    }
}

/// Linear falloff ratio of `field`'s exposure contribution at `point`,
/// `dom_risk_falloff`. A radius of `0` is a point source: full strength at
/// the center, zero everywhere else.
#[must_use]
pub fn falloff(field: &RiskField, point: Point) -> Q16 {
    let radius = field.radius;
    let dist = distance(field.center, point);
    if radius.raw() <= 0 {
        return if dist.raw() <= 0 {
            crate::constants::RATIO_ONE
        } else {
            Q16::zero()
        };
    }
    if dist.raw() >= radius.raw() {
        return Q16::zero();
    }
    let remaining = radius.sub(dist);
    remaining.div(radius).clamp_ratio()
}

/// What fraction of `total` matched records fell in a histogram bin,
/// `dom_risk_hist_bin_ratio`.
#[must_use]
pub fn hist_bin_ratio(count: u32, total: u32) -> Q16 {
    if total == 0 {
        return Q16::zero();
    }
    let scaled = (u64::from(count) << 16) / u64::from(total);
    Q16::from_raw(i32::try_from(scaled).unwrap_or(i32::MAX))
}

/// Which of [`HIST_BINS`] buckets a clamped ratio falls into,
/// `dom_risk_hist_bin`.
#[must_use]
pub fn hist_bin(ratio: Q16) -> usize {
    let clamped = ratio.clamp_ratio();
    let bins = u64::try_from(HIST_BINS - 1).unwrap_or(0);
    let scaled = ((i64::from(clamped.raw()) as u64) * bins) >> 16;
    let scaled = usize::try_from(scaled).unwrap_or(HIST_BINS - 1);
    scaled.min(HIST_BINS - 1)
}
