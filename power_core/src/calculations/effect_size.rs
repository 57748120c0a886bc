//! # Effect Size (Cohen's d)
//!
//! Standardized mean difference `d = |mean1 - mean2| / pooled_sd`, plus the
//! conventional small / medium / large labels used when choosing a planning
//! effect size.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{require_finite, require_positive, CalcResult};

/// Raw group summaries for estimating an effect size.
///
/// ## JSON Example
///
/// ```json
/// { "mean1": 12.0, "mean2": 10.0, "pooled_sd": 2.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectSizeInput {
    /// Mean of group 1
    pub mean1: f64,

    /// Mean of group 2
    pub mean2: f64,

    /// Pooled standard deviation of both groups
    pub pooled_sd: f64,
}

impl EffectSizeInput {
    pub fn calculate(&self) -> CalcResult<f64> {
        calculate_effect_size(self.mean1, self.mean2, self.pooled_sd)
    }
}

/// Calculate Cohen's d from group means and the pooled standard deviation.
///
/// The result is always nonnegative and does not depend on group order.
///
/// # Example
///
/// ```rust
/// use power_core::calculations::effect_size::calculate_effect_size;
///
/// assert_eq!(calculate_effect_size(12.0, 10.0, 2.0).unwrap(), 1.0);
/// assert_eq!(calculate_effect_size(10.0, 12.0, 2.0).unwrap(), 1.0);
/// assert!(calculate_effect_size(12.0, 10.0, 0.0).is_err());
/// ```
pub fn calculate_effect_size(mean1: f64, mean2: f64, pooled_sd: f64) -> CalcResult<f64> {
    require_finite("mean1", mean1)?;
    require_finite("mean2", mean2)?;
    require_positive("pooled_sd", pooled_sd)?;
    Ok((mean1 - mean2).abs() / pooled_sd)
}

/// Conventional magnitude of a standardized effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EffectMagnitude {
    /// d < 0.2
    Negligible,
    /// 0.2 ≤ d < 0.5
    Small,
    /// 0.5 ≤ d < 0.8
    Medium,
    /// d ≥ 0.8
    Large,
}

impl EffectMagnitude {
    pub const SMALL: f64 = 0.2;
    pub const MEDIUM: f64 = 0.5;
    pub const LARGE: f64 = 0.8;

    /// Bucket an effect size. The sign is ignored.
    pub fn classify(effect_size: f64) -> Self {
        let d = effect_size.abs();
        if d >= Self::LARGE {
            EffectMagnitude::Large
        } else if d >= Self::MEDIUM {
            EffectMagnitude::Medium
        } else if d >= Self::SMALL {
            EffectMagnitude::Small
        } else {
            EffectMagnitude::Negligible
        }
    }
}

impl fmt::Display for EffectMagnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EffectMagnitude::Negligible => "negligible",
            EffectMagnitude::Small => "small",
            EffectMagnitude::Medium => "medium",
            EffectMagnitude::Large => "large",
        };
        f.write_str(label)
    }
}
