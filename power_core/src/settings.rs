//! # Calculator Settings
//!
//! Defaults and input ranges for a front end. The calculations never clamp
//! their inputs (they reject anything outside the domain); keeping a form or
//! command line inside sensible planning ranges is the caller's job, and
//! [`InputLimits::clamp`] does it.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "defaults": { "effect_size": 0.5, "alpha": 0.05, "power": 0.8 },
//!   "limits": { "power": { "min": 0.5, "max": 0.95 } }
//! }
//! ```
//!
//! Any field left out keeps its default value. Limits are checked on load:
//! every range must be ordered and lie inside the domain the calculations
//! accept, so clamping can never produce an input they reject.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::design::{StudyParameters, StudyType};

/// Settings for a calculator front end.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorSettings {
    /// Parameters used when the caller supplies none
    pub defaults: StudyParameters,

    /// Accepted input ranges
    pub limits: InputLimits,
}

/// Errors raised while loading settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Malformed settings JSON
    #[error("Settings parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A limit that is unordered or leaves the calculation domain
    #[error("Invalid limit for '{field}': [{min}, {max}] - {reason}")]
    InvalidLimit {
        field: String,
        min: f64,
        max: f64,
        reason: String,
    },
}

impl SettingsError {
    fn invalid_limit(field: &str, range: Range, reason: impl Into<String>) -> Self {
        SettingsError::InvalidLimit {
            field: field.to_string(),
            min: range.min,
            max: range.max,
            reason: reason.into(),
        }
    }
}

impl CalculatorSettings {
    /// Parse settings from JSON and validate the limits.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: CalculatorSettings = serde_json::from_str(json)?;
        settings.limits.validate()?;
        Ok(settings)
    }
}

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Range { min, max }
    }

    /// Clamp `value` into the range. NaN is passed through unchanged.
    pub fn clamp(&self, value: f64) -> f64 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Check that the range is finite, ordered and strictly above zero.
    fn validate_positive(&self, field: &str) -> Result<(), SettingsError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(SettingsError::invalid_limit(field, *self, "bounds must be finite"));
        }
        if self.min > self.max {
            return Err(SettingsError::invalid_limit(field, *self, "min exceeds max"));
        }
        if self.min <= 0.0 {
            return Err(SettingsError::invalid_limit(field, *self, "min must be strictly positive"));
        }
        Ok(())
    }

    /// As [`Range::validate_positive`], and also strictly below one.
    fn validate_probability(&self, field: &str) -> Result<(), SettingsError> {
        self.validate_positive(field)?;
        if self.max >= 1.0 {
            return Err(SettingsError::invalid_limit(field, *self, "max must be strictly below 1"));
        }
        Ok(())
    }
}

/// Input ranges for each planning parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    pub effect_size: Range,
    pub alpha: Range,
    pub power: Range,
    pub allocation_ratio: Range,

    /// Smallest pooled standard deviation accepted for effect-size estimation
    pub min_pooled_sd: f64,
}

impl Default for InputLimits {
    fn default() -> Self {
        InputLimits {
            effect_size: Range::new(0.1, 2.0),
            alpha: Range::new(0.01, 0.10),
            power: Range::new(0.50, 0.99),
            allocation_ratio: Range::new(0.1, 5.0),
            min_pooled_sd: 0.1,
        }
    }
}

impl InputLimits {
    /// Check every range against the domain of the calculations.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.effect_size.validate_positive("effect_size")?;
        self.alpha.validate_probability("alpha")?;
        self.power.validate_probability("power")?;
        self.allocation_ratio.validate_positive("allocation_ratio")?;
        Range::new(self.min_pooled_sd, self.min_pooled_sd).validate_positive("min_pooled_sd")?;
        Ok(())
    }

    /// Clamp every parameter into its range.
    ///
    /// Paired designs have no allocation ratio, so it is fixed at 1.0.
    pub fn clamp(&self, params: &StudyParameters) -> StudyParameters {
        let allocation_ratio = match params.study_type {
            StudyType::Parallel => self.allocation_ratio.clamp(params.allocation_ratio),
            StudyType::Paired => 1.0,
        };
        StudyParameters {
            effect_size: self.effect_size.clamp(params.effect_size),
            alpha: self.alpha.clamp(params.alpha),
            power: self.power.clamp(params.power),
            allocation_ratio,
            study_type: params.study_type,
        }
    }

    /// Raise a pooled standard deviation to the configured minimum
    pub fn clamp_pooled_sd(&self, pooled_sd: f64) -> f64 {
        if pooled_sd < self.min_pooled_sd {
            self.min_pooled_sd
        } else {
            pooled_sd
        }
    }
}
