//! # Calculations
//!
//! Each calculation follows the pattern:
//!
//! - an input type (JSON-serializable)
//! - a result type (JSON-serializable)
//! - a pure function `input -> CalcResult<result>`
//!
//! ## Available Calculations
//!
//! - [`sample_size`] - Required group sizes for a parallel or paired study
//! - [`effect_size`] - Cohen's d from group means and pooled SD
//! - [`power_curve`] - Required n1 across target powers 0.50 to 0.99
//!
//! [`CalculationRequest`] wraps all three so a caller can submit a single
//! JSON document and get a single JSON answer back.

pub mod effect_size;
pub mod power_curve;
pub mod sample_size;

use serde::{Deserialize, Serialize};

use crate::design::StudyParameters;
use crate::errors::CalcResult;

// Re-export commonly used types
pub use effect_size::{calculate_effect_size, EffectMagnitude, EffectSizeInput};
pub use power_curve::{create_power_curve, CurveParameters, PowerCurve, PowerCurvePoint};
pub use sample_size::{calculate_sample_size, SampleSizeResult};

/// A calculation to run, tagged by kind.
///
/// ## JSON Example
///
/// ```json
/// { "type": "SampleSize", "effect_size": 0.5, "study_type": "paired" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationRequest {
    /// Required group sizes
    SampleSize(StudyParameters),
    /// Cohen's d from raw summaries
    EffectSize(EffectSizeInput),
    /// Required n1 across the power grid
    PowerCurve(CurveParameters),
}

/// Result of a [`CalculationRequest`], tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationOutput {
    SampleSize(SampleSizeOutput),
    EffectSize(EffectSizeOutput),
    PowerCurve(PowerCurve),
}

/// Group sizes together with the parameters that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleSizeOutput {
    pub parameters: StudyParameters,
    pub n1: u64,
    pub n2: u64,
    pub total: u64,
}

/// An effect size with its conventional label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectSizeOutput {
    pub effect_size: f64,
    pub magnitude: EffectMagnitude,
}

impl CalculationRequest {
    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationRequest::SampleSize(_) => "SampleSize",
            CalculationRequest::EffectSize(_) => "EffectSize",
            CalculationRequest::PowerCurve(_) => "PowerCurve",
        }
    }

    /// Run the calculation.
    pub fn run(&self) -> CalcResult<CalculationOutput> {
        match self {
            CalculationRequest::SampleSize(params) => {
                let result = calculate_sample_size(params)?;
                Ok(CalculationOutput::SampleSize(SampleSizeOutput {
                    parameters: *params,
                    n1: result.n1,
                    n2: result.n2,
                    total: result.total(),
                }))
            }
            CalculationRequest::EffectSize(input) => {
                let effect_size = input.calculate()?;
                Ok(CalculationOutput::EffectSize(EffectSizeOutput {
                    effect_size,
                    magnitude: EffectMagnitude::classify(effect_size),
                }))
            }
            CalculationRequest::PowerCurve(params) => {
                Ok(CalculationOutput::PowerCurve(PowerCurve::compute(*params)?))
            }
        }
    }
}
