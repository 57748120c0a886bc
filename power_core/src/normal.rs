//! # Standard Normal Quantile
//!
//! Inverse of the standard normal CDF, used for the critical values
//! `z_{1-α/2}` and `z_{power}`. Implemented with Acklam's rational
//! approximation, which has a relative error below 1.15e-9 over (0, 1).

use crate::errors::{require_probability, CalcResult};

// Central region, numerator and denominator
const A: [f64; 6] = [
    -3.969_683_028_665_376e1,
    2.209_460_984_245_205e2,
    -2.759_285_104_469_687e2,
    1.383_577_518_672_690e2,
    -3.066_479_806_614_716e1,
    2.506_628_277_459_239,
];
const B: [f64; 5] = [
    -5.447_609_879_822_406e1,
    1.615_858_368_580_409e2,
    -1.556_989_798_598_866e2,
    6.680_131_188_771_972e1,
    -1.328_068_155_288_572e1,
];

// Tail regions
const C: [f64; 6] = [
    -7.784_894_002_430_293e-3,
    -3.223_964_580_411_365e-1,
    -2.400_758_277_161_838,
    -2.549_732_539_343_734,
    4.374_664_141_464_968,
    2.938_163_982_698_783,
];
const D: [f64; 4] = [
    7.784_695_709_041_462e-3,
    3.224_671_290_700_398e-1,
    2.445_134_137_142_996,
    3.754_408_661_907_416,
];

/// Break-points between the tail and central approximations
const P_LOW: f64 = 0.02425;
const P_HIGH: f64 = 1.0 - P_LOW;

/// Quantile of the standard normal distribution.
///
/// Returns `z` such that `Φ(z) = p`. The quantile is infinite at 0 and 1,
/// so `p` must lie strictly inside the unit interval.
///
/// # Example
///
/// ```rust
/// use power_core::normal::std_normal_quantile;
///
/// let z = std_normal_quantile(0.975).unwrap();
/// assert!((z - 1.959964).abs() < 1e-6);
/// assert!(std_normal_quantile(1.0).is_err());
/// ```
pub fn std_normal_quantile(p: f64) -> CalcResult<f64> {
    let p = require_probability("p", p)?;
    Ok(acklam(p))
}

fn acklam(p: f64) -> f64 {
    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        tail(q)
    } else if p > P_HIGH {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -tail(q)
    } else {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    }
}

fn tail(q: f64) -> f64 {
    (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
        / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_median_is_zero() {
        assert_abs_diff_eq!(std_normal_quantile(0.5).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_common_critical_values() {
        assert_abs_diff_eq!(std_normal_quantile(0.975).unwrap(), 1.959_964, epsilon = 1e-6);
        assert_abs_diff_eq!(std_normal_quantile(0.80).unwrap(), 0.841_621, epsilon = 1e-6);
        assert_abs_diff_eq!(std_normal_quantile(0.995).unwrap(), 2.575_829, epsilon = 1e-6);
        assert_abs_diff_eq!(std_normal_quantile(0.90).unwrap(), 1.281_552, epsilon = 1e-6);
    }

    #[test]
    fn test_lower_tail() {
        // 0.007384489 falls in the lower tail region (< 0.02425)
        assert_abs_diff_eq!(
            std_normal_quantile(0.007_384_489).unwrap(),
            -2.437_995,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_symmetry() {
        for p in [0.01, 0.1, 0.3, 0.45] {
            let lo = std_normal_quantile(p).unwrap();
            let hi = std_normal_quantile(1.0 - p).unwrap();
            assert_abs_diff_eq!(lo, -hi, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_bounds_rejected() {
        assert!(std_normal_quantile(0.0).is_err());
        assert!(std_normal_quantile(1.0).is_err());
        assert!(std_normal_quantile(-0.2).is_err());
        assert!(std_normal_quantile(1.1).is_err());
        assert!(std_normal_quantile(f64::NAN).is_err());
    }
}
