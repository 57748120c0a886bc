//! # Power Curve
//!
//! Required treatment-group size `n1` as a function of target power. Power is
//! swept over 50 evenly spaced values from 0.50 to 0.99 inclusive and each
//! point is computed with [`calculate_sample_size`].
//!
//! ## Example
//!
//! ```rust
//! use power_core::calculations::power_curve::create_power_curve;
//! use power_core::design::StudyType;
//!
//! let curve = create_power_curve(0.5, 0.05, 1.0, StudyType::Parallel).unwrap();
//! assert_eq!(curve.len(), 50);
//!
//! let first = curve.points()[0];
//! let last = curve.points()[49];
//! assert_eq!(first.power, 0.50);
//! assert_eq!(last.power, 0.99);
//! assert!(last.sample_size > first.sample_size);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::calculations::sample_size::calculate_sample_size;
use crate::design::{StudyParameters, StudyType};
use crate::errors::CalcResult;

/// Number of points on a power curve
pub const CURVE_POINTS: usize = 50;

/// Lowest power on the curve
pub const MIN_POWER: f64 = 0.50;

/// Highest power on the curve
pub const MAX_POWER: f64 = 0.99;

/// The evenly spaced power grid `0.50, 0.51, ..., 0.99`.
///
/// Values are `MIN_POWER + i · step` with the last one pinned to exactly
/// `MAX_POWER`.
pub fn power_grid() -> impl ExactSizeIterator<Item = f64> + Clone {
    let step = (MAX_POWER - MIN_POWER) / (CURVE_POINTS - 1) as f64;
    (0..CURVE_POINTS).map(move |i| {
        if i == CURVE_POINTS - 1 {
            MAX_POWER
        } else {
            MIN_POWER + i as f64 * step
        }
    })
}

/// Everything in [`StudyParameters`] except power, which the curve sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveParameters {
    pub effect_size: f64,
    pub alpha: f64,
    pub allocation_ratio: f64,
    pub study_type: StudyType,
}

impl Default for CurveParameters {
    fn default() -> Self {
        StudyParameters::default().into()
    }
}

impl From<StudyParameters> for CurveParameters {
    fn from(params: StudyParameters) -> Self {
        CurveParameters {
            effect_size: params.effect_size,
            alpha: params.alpha,
            allocation_ratio: params.allocation_ratio,
            study_type: params.study_type,
        }
    }
}

impl CurveParameters {
    /// Full study parameters at the given power
    pub fn at_power(&self, power: f64) -> StudyParameters {
        StudyParameters {
            effect_size: self.effect_size,
            alpha: self.alpha,
            power,
            allocation_ratio: self.allocation_ratio,
            study_type: self.study_type,
        }
    }
}

/// One point of a power curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerCurvePoint {
    /// Target power
    pub power: f64,

    /// Required treatment-group size n1 at that power
    pub sample_size: u64,
}

/// A fully computed power curve, in increasing-power order.
///
/// Iterating with [`PowerCurve::iter`] can be repeated any number of times
/// and always yields the same points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerCurve {
    pub parameters: CurveParameters,
    points: Vec<PowerCurvePoint>,
}

impl PowerCurve {
    /// Compute the curve for `parameters`.
    ///
    /// Fails as a whole if the sample size at any grid power fails.
    pub fn compute(parameters: CurveParameters) -> CalcResult<Self> {
        let points = power_grid()
            .map(|power| {
                let result = calculate_sample_size(&parameters.at_power(power))?;
                trace!(power, n1 = result.n1, "power curve point");
                Ok(PowerCurvePoint {
                    power,
                    sample_size: result.n1,
                })
            })
            .collect::<CalcResult<Vec<_>>>()?;

        debug!(
            study_type = %parameters.study_type,
            effect_size = parameters.effect_size,
            points = points.len(),
            "power curve computed"
        );

        Ok(PowerCurve { parameters, points })
    }

    pub fn points(&self) -> &[PowerCurvePoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PowerCurvePoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Power values, the x-axis of the curve
    pub fn powers(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.power).collect()
    }

    /// Required n1 values, the y-axis of the curve
    pub fn sample_sizes(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.sample_size).collect()
    }

    /// Highest grid power whose requirement fits within `n1` subjects
    pub fn max_power_within(&self, n1: u64) -> Option<f64> {
        self.points
            .iter()
            .rev()
            .find(|p| p.sample_size <= n1)
            .map(|p| p.power)
    }
}

impl<'a> IntoIterator for &'a PowerCurve {
    type Item = &'a PowerCurvePoint;
    type IntoIter = std::slice::Iter<'a, PowerCurvePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for PowerCurve {
    type Item = PowerCurvePoint;
    type IntoIter = std::vec::IntoIter<PowerCurvePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

/// Compute the power curve for fixed effect size, α, allocation ratio and design.
pub fn create_power_curve(
    effect_size: f64,
    alpha: f64,
    allocation_ratio: f64,
    study_type: StudyType,
) -> CalcResult<PowerCurve> {
    PowerCurve::compute(CurveParameters {
        effect_size,
        alpha,
        allocation_ratio,
        study_type,
    })
}
