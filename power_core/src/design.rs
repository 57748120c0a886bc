//! # Study Design
//!
//! Input types shared by every calculation: the study design
//! ([`StudyType`]) and the full parameter set ([`StudyParameters`]).
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "effect_size": 0.5,
//!   "alpha": 0.05,
//!   "power": 0.8,
//!   "allocation_ratio": 1.0,
//!   "study_type": "parallel"
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, require_probability, CalcResult, DomainError};

/// Two-arm study design.
///
/// Only these two designs are supported. Parsing any other identifier fails
/// with [`DomainError::UnsupportedDesign`]; there is no fallback design.
/// JSON input is parsed with the same rules as [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum StudyType {
    /// Two independent cohorts, each measured once
    #[default]
    Parallel,
    /// Same subjects measured under both conditions
    Paired,
}

impl StudyType {
    /// All supported designs
    pub const ALL: [StudyType; 2] = [StudyType::Parallel, StudyType::Paired];

    /// Identifier used in JSON and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            StudyType::Parallel => "parallel",
            StudyType::Paired => "paired",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            StudyType::Parallel => "Two independent groups",
            StudyType::Paired => "Same subjects measured twice",
        }
    }
}

impl fmt::Display for StudyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for StudyType {
    type Error = DomainError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl FromStr for StudyType {
    type Err = DomainError;

    /// Parse a design identifier (case-insensitive, surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parallel" => Ok(StudyType::Parallel),
            "paired" => Ok(StudyType::Paired),
            _ => Err(DomainError::unsupported_design(s)),
        }
    }
}

/// Parameters of a two-arm study.
///
/// `Default` gives the conventional planning values: medium effect (0.5),
/// α = 0.05, power = 0.80, equal allocation, parallel design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyParameters {
    /// Standardized effect size (Cohen's d)
    pub effect_size: f64,

    /// Two-sided significance level (Type I error rate)
    pub alpha: f64,

    /// Target power (1 - Type II error rate)
    pub power: f64,

    /// Control to treatment group size ratio (n2/n1), parallel designs only
    pub allocation_ratio: f64,

    /// Study design
    pub study_type: StudyType,
}

impl Default for StudyParameters {
    fn default() -> Self {
        StudyParameters {
            effect_size: 0.5,
            alpha: 0.05,
            power: 0.80,
            allocation_ratio: 1.0,
            study_type: StudyType::Parallel,
        }
    }
}

impl StudyParameters {
    /// Parameters for `effect_size` with every other field at its default.
    pub fn new(effect_size: f64) -> Self {
        StudyParameters {
            effect_size,
            ..StudyParameters::default()
        }
    }

    /// Set the two-sided significance level
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the target power
    pub fn with_power(mut self, power: f64) -> Self {
        self.power = power;
        self
    }

    /// Set the allocation ratio n2/n1
    pub fn with_allocation_ratio(mut self, allocation_ratio: f64) -> Self {
        self.allocation_ratio = allocation_ratio;
        self
    }

    /// Set the study design
    pub fn with_study_type(mut self, study_type: StudyType) -> Self {
        self.study_type = study_type;
        self
    }

    /// Validate input parameters.
    ///
    /// The allocation ratio is checked for both designs even though paired
    /// studies ignore it.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("effect_size", self.effect_size)?;
        require_probability("alpha", self.alpha)?;
        require_probability("power", self.power)?;
        require_positive("allocation_ratio", self.allocation_ratio)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_study_type_parse() {
        assert_eq!("parallel".parse::<StudyType>().unwrap(), StudyType::Parallel);
        assert_eq!(" Paired ".parse::<StudyType>().unwrap(), StudyType::Paired);
    }

    #[test]
    fn test_unknown_study_type_rejected() {
        let err = "crossover".parse::<StudyType>().unwrap_err();
        assert_eq!(err, DomainError::unsupported_design("crossover"));
        assert!("".parse::<StudyType>().is_err());
    }

    #[test]
    fn test_study_type_serialization() {
        let json = serde_json::to_string(&StudyType::Paired).unwrap();
        assert_eq!(json, "\"paired\"");
        let roundtrip: StudyType = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, StudyType::Paired);
    }

    #[test]
    fn test_json_accepts_same_spellings_as_parse() {
        for name in ["Paired", " paired ", "PAIRED"] {
            let json = serde_json::to_string(name).unwrap();
            let from_json: StudyType = serde_json::from_str(&json).unwrap();
            assert_eq!(from_json, name.parse::<StudyType>().unwrap());
        }
    }

    #[test]
    fn test_json_unknown_design_reports_domain_error() {
        let err = serde_json::from_str::<StudyType>("\"crossover\"").unwrap_err();
        let expected = DomainError::unsupported_design("crossover").to_string();
        assert!(err.to_string().starts_with(&expected), "{err}");
    }

    #[test]
    fn test_defaults() {
        let params = StudyParameters::default();
        assert_eq!(params.effect_size, 0.5);
        assert_eq!(params.alpha, 0.05);
        assert_eq!(params.power, 0.80);
        assert_eq!(params.allocation_ratio, 1.0);
        assert_eq!(params.study_type, StudyType::Parallel);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params: StudyParameters =
            serde_json::from_str(r#"{ "effect_size": 0.8, "study_type": "paired" }"#).unwrap();
        assert_eq!(params.effect_size, 0.8);
        assert_eq!(params.alpha, 0.05);
        assert_eq!(params.study_type, StudyType::Paired);
    }

    #[test]
    fn test_validate_rejects_out_of_domain() {
        let base = StudyParameters::new(0.5);
        assert!(StudyParameters::new(0.0).validate().is_err());
        assert!(StudyParameters::new(-0.3).validate().is_err());
        assert!(base.with_alpha(0.0).validate().is_err());
        assert!(base.with_alpha(1.0).validate().is_err());
        assert!(base.with_power(0.0).validate().is_err());
        assert!(base.with_power(1.0).validate().is_err());
        assert!(base.with_allocation_ratio(0.0).validate().is_err());
        assert!(base.with_allocation_ratio(-1.0).validate().is_err());
        assert!(base.with_power(f64::NAN).validate().is_err());
    }
}
