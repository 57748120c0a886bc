//! # power_core - Sample Size Calculation Engine
//!
//! `power_core` computes required sample sizes for two-arm studies (parallel
//! or paired designs) from a standardized effect size, significance level and
//! target power, and derives the curve of sample size against power. All
//! inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Strict**: Out-of-domain inputs are a [`DomainError`], never clamped
//!
//! ## Quick Start
//!
//! ```rust
//! use power_core::{calculate_sample_size, create_power_curve, StudyParameters, StudyType};
//!
//! let params = StudyParameters::new(0.5).with_power(0.80);
//! let sizes = calculate_sample_size(&params).unwrap();
//! println!("n1 = {}, n2 = {}", sizes.n1, sizes.n2);
//!
//! let curve = create_power_curve(0.5, 0.05, 1.0, StudyType::Parallel).unwrap();
//! for point in &curve {
//!     println!("{:.2} -> {}", point.power, point.sample_size);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`design`] - Study design and parameters
//! - [`calculations`] - Sample size, effect size and power curve
//! - [`normal`] - Standard normal quantile function
//! - [`settings`] - Defaults and input ranges for front ends
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod design;
pub mod errors;
pub mod normal;
pub mod settings;

// Re-export commonly used types at crate root for convenience
pub use calculations::{
    calculate_effect_size, calculate_sample_size, create_power_curve, CalculationOutput,
    CalculationRequest, PowerCurve, PowerCurvePoint, SampleSizeResult,
};
pub use design::{StudyParameters, StudyType};
pub use errors::{CalcResult, DomainError};
pub use settings::{CalculatorSettings, InputLimits, SettingsError};
