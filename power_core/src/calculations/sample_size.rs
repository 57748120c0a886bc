//! # Sample Size for a Two-Arm Study
//!
//! Required group sizes for a two-sided test of a standardized mean
//! difference, using the normal approximation.
//!
//! With `K = (z_{1-α/2} + z_{power})² / d²`:
//!
//! - **Parallel**: `n1 = ⌈K · (1 + 1/r) / r⌉`, `n2 = ⌈n1 · r⌉`
//! - **Paired**: `n1 = n2 = ⌈K⌉`
//!
//! where `r` is the allocation ratio n2/n1. Sizes are always rounded up so
//! the achieved power is never below the target.
//!
//! `K` carries no leading factor of 2: the formulas are normalized so that
//! d = 0.5, α = 0.05, power = 0.80 gives 63 per group (parallel, r = 1) and
//! 32 pairs (paired). Doubling `K` would double both.
//!
//! ## Example
//!
//! ```rust
//! use power_core::calculations::sample_size::calculate_sample_size;
//! use power_core::design::{StudyParameters, StudyType};
//!
//! let params = StudyParameters::new(0.5); // α = 0.05, power = 0.80, r = 1
//! let result = calculate_sample_size(&params).unwrap();
//! assert_eq!((result.n1, result.n2), (63, 63));
//!
//! let paired = calculate_sample_size(&params.with_study_type(StudyType::Paired)).unwrap();
//! assert_eq!((paired.n1, paired.n2), (32, 32));
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::design::{StudyParameters, StudyType};
use crate::errors::{CalcResult, DomainError};
use crate::normal::std_normal_quantile;

/// Largest count representable exactly in an f64 (2^53)
const MAX_EXACT_COUNT: f64 = 9_007_199_254_740_992.0;

/// Required group sizes.
///
/// ## JSON Example
///
/// ```json
/// { "n1": 63, "n2": 63 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSizeResult {
    /// Treatment (primary) group size
    pub n1: u64,

    /// Control group size
    pub n2: u64,
}

impl SampleSizeResult {
    /// Total number of subjects across both groups
    pub fn total(&self) -> u64 {
        self.n1 + self.n2
    }
}

/// Critical values `(z_{1-α/2}, z_{power})` for a two-sided test.
pub fn critical_values(alpha: f64, power: f64) -> CalcResult<(f64, f64)> {
    let z_alpha = std_normal_quantile(1.0 - alpha / 2.0)?;
    let z_beta = std_normal_quantile(power)?;
    Ok((z_alpha, z_beta))
}

/// Calculate the required sample size.
///
/// # Arguments
///
/// * `params` - Effect size, α, power, allocation ratio and design
///
/// # Returns
///
/// * `Ok(SampleSizeResult)` - Group sizes, each at least 1
/// * `Err(DomainError)` - If any parameter lies outside its domain
pub fn calculate_sample_size(params: &StudyParameters) -> CalcResult<SampleSizeResult> {
    params.validate()?;

    let (z_alpha, z_beta) = critical_values(params.alpha, params.power)?;
    let k = (z_alpha + z_beta).powi(2) / params.effect_size.powi(2);

    let result = match params.study_type {
        StudyType::Parallel => {
            let r = params.allocation_ratio;
            let n1 = ceil_count(k * (1.0 + 1.0 / r) / r)?;
            let n2 = ceil_count(n1 as f64 * r)?;
            SampleSizeResult { n1, n2 }
        }
        StudyType::Paired => {
            let n = ceil_count(k)?;
            SampleSizeResult { n1: n, n2: n }
        }
    };

    debug!(
        study_type = %params.study_type,
        z_alpha,
        z_beta,
        k,
        n1 = result.n1,
        n2 = result.n2,
        "sample size computed"
    );

    Ok(result)
}

/// Round a fractional requirement up to a whole number of subjects.
fn ceil_count(raw: f64) -> CalcResult<u64> {
    if !raw.is_finite() || raw > MAX_EXACT_COUNT {
        return Err(DomainError::unbounded(format!(
            "{raw} subjects per group cannot be represented"
        )));
    }
    Ok((raw.ceil() as u64).max(1))
}
