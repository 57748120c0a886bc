//! # PowerPlan CLI
//!
//! Terminal front end for the power_core calculations: required sample size,
//! power curve and effect size estimation. Inputs are clamped to the
//! configured planning ranges (unless `--strict`) before being handed to the
//! core, which validates them again.
//!
//! ```text
//! power_cli size --effect-size 0.5 --power 0.9
//! power_cli curve --effect-size 0.3 --design paired
//! power_cli effect --mean1 12 --mean2 10 --pooled-sd 2
//! echo '{"type":"SampleSize","effect_size":0.5}' | power_cli request
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, warn, Level};

use power_core::calculations::{EffectMagnitude, EffectSizeOutput};
use power_core::calculations::power_curve::CurveParameters;
use power_core::{
    calculate_effect_size, calculate_sample_size, CalculationOutput, CalculationRequest,
    CalculatorSettings, DomainError, PowerCurve, StudyParameters, StudyType,
};

/// Sample size and power calculator for two-arm studies
#[derive(Parser, Debug)]
#[command(name = "power_cli")]
#[command(version)]
#[command(about = "Sample size and power calculator for parallel and paired studies", long_about = None)]
struct Cli {
    /// Settings file (JSON) with defaults and input limits
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Pass inputs to the calculator without clamping them to the limits
    #[arg(long, global = true)]
    strict: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Required group sizes for one set of parameters
    Size {
        #[command(flatten)]
        study: StudyArgs,

        /// Target power (1 - beta)
        #[arg(short, long)]
        power: Option<f64>,
    },
    /// Required treatment group size for powers 0.50 to 0.99
    Curve {
        #[command(flatten)]
        study: StudyArgs,
    },
    /// Cohen's d from group means and pooled standard deviation
    Effect {
        #[arg(long, allow_hyphen_values = true)]
        mean1: f64,

        #[arg(long, allow_hyphen_values = true)]
        mean2: f64,

        #[arg(long, allow_hyphen_values = true)]
        pooled_sd: f64,
    },
    /// Run a JSON calculation request from a file, or stdin when omitted
    Request {
        file: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct StudyArgs {
    /// Standardized effect size (Cohen's d)
    #[arg(short, long, allow_hyphen_values = true)]
    effect_size: Option<f64>,

    /// Two-sided significance level
    #[arg(short, long)]
    alpha: Option<f64>,

    /// Allocation ratio n2/n1 (parallel designs)
    #[arg(short, long, allow_hyphen_values = true)]
    ratio: Option<f64>,

    /// Study design: parallel or paired
    #[arg(short, long)]
    design: Option<String>,
}

impl StudyArgs {
    /// Merge command-line values over the configured defaults.
    fn resolve(&self, defaults: &StudyParameters, power: Option<f64>) -> Result<StudyParameters> {
        let study_type = match &self.design {
            Some(name) => name.parse::<StudyType>()?,
            None => defaults.study_type,
        };
        Ok(StudyParameters {
            effect_size: self.effect_size.unwrap_or(defaults.effect_size),
            alpha: self.alpha.unwrap_or(defaults.alpha),
            power: power.unwrap_or(defaults.power),
            allocation_ratio: self.ratio.unwrap_or(defaults.allocation_ratio),
            study_type,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, cli.json);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli.config.as_deref())?;

    match &cli.command {
        Command::Size { study, power } => {
            let params = study.resolve(&settings.defaults, *power)?;
            let params = apply_limits(cli, &settings, params);

            if cli.json {
                let output = CalculationRequest::SampleSize(params).run()?;
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                let result = calculate_sample_size(&params)?;
                print_sample_size(&params, result.n1, result.n2);
            }
        }
        Command::Curve { study } => {
            let params = study.resolve(&settings.defaults, None)?;
            let params = apply_limits(cli, &settings, params);
            let curve = PowerCurve::compute(CurveParameters::from(params))?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&curve)?);
            } else {
                print_power_curve(&curve);
            }
        }
        Command::Effect {
            mean1,
            mean2,
            pooled_sd,
        } => {
            let pooled_sd = if cli.strict {
                *pooled_sd
            } else {
                let clamped = settings.limits.clamp_pooled_sd(*pooled_sd);
                if clamped != *pooled_sd {
                    warn!(from = *pooled_sd, to = clamped, "pooled SD raised to configured minimum");
                }
                clamped
            };
            let effect_size = calculate_effect_size(*mean1, *mean2, pooled_sd)?;
            let magnitude = EffectMagnitude::classify(effect_size);

            if cli.json {
                let output = EffectSizeOutput {
                    effect_size,
                    magnitude,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("Calculated effect size (Cohen's d): {:.3} ({})", effect_size, magnitude);
            }
        }
        Command::Request { file } => {
            let output = run_request(file.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<CalculatorSettings> {
    let Some(path) = path else {
        return Ok(CalculatorSettings::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading config file '{}'", path.display()))?;
    let settings = CalculatorSettings::from_json(&json)
        .with_context(|| format!("parsing config file '{}'", path.display()))?;
    debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

/// Read, parse and run a JSON calculation request.
fn run_request(path: Option<&Path>) -> Result<CalculationOutput> {
    let json = read_request(path)?;
    let request = parse_request(&json)?;
    debug!(calc_type = request.calc_type(), "running request");
    Ok(request.run()?)
}

/// Parse a request, reporting an unknown study design as a [`DomainError`].
fn parse_request(json: &str) -> Result<CalculationRequest> {
    let value: serde_json::Value =
        serde_json::from_str(json).context("parsing calculation request")?;
    if let Some(name) = value.get("study_type").and_then(|v| v.as_str()) {
        name.parse::<StudyType>()?;
    }
    let request = serde_json::from_value(value).context("parsing calculation request")?;
    Ok(request)
}

fn read_request(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading request file '{}'", path.display())),
        None => {
            let mut json = String::new();
            io::stdin()
                .read_to_string(&mut json)
                .context("reading request from stdin")?;
            Ok(json)
        }
    }
}

/// Clamp to the configured limits unless running strict.
fn apply_limits(cli: &Cli, settings: &CalculatorSettings, params: StudyParameters) -> StudyParameters {
    if cli.strict {
        return params;
    }
    let clamped = settings.limits.clamp(&params);
    if clamped != params {
        warn!(requested = ?params, used = ?clamped, "inputs adjusted to configured limits");
    }
    clamped
}

fn print_sample_size(params: &StudyParameters, n1: u64, n2: u64) {
    println!("═══════════════════════════════════════");
    println!("  SAMPLE SIZE");
    println!("═══════════════════════════════════════");
    println!();
    println!("Input:");
    println!("  Design:      {} ({})", params.study_type, params.study_type.description());
    println!(
        "  Effect size: {:.2} ({})",
        params.effect_size,
        EffectMagnitude::classify(params.effect_size)
    );
    println!("  Alpha:       {:.3}", params.alpha);
    println!("  Power:       {:.2}", params.power);
    if params.study_type == StudyType::Parallel {
        println!("  Ratio n2/n1: {:.2}", params.allocation_ratio);
    }
    println!();
    println!("Results:");
    println!("  Treatment group size: {}", n1);
    println!("  Control group size:   {}", n2);
    println!("  Total sample size:    {}", n1 + n2);
    println!("═══════════════════════════════════════");
}

fn print_power_curve(curve: &PowerCurve) {
    const BAR_WIDTH: f64 = 40.0;

    let params = &curve.parameters;
    println!(
        "Power vs. required sample size ({}, d = {:.2}, alpha = {:.3})",
        params.study_type, params.effect_size, params.alpha
    );
    println!();
    println!("  power     n1");

    let max = curve.sample_sizes().into_iter().max().unwrap_or(1).max(1) as f64;
    for point in curve {
        let bar = ((point.sample_size as f64 / max) * BAR_WIDTH).round() as usize;
        println!("  {:.2}  {:>6}  {}", point.power, point.sample_size, "█".repeat(bar));
    }
}

fn report_error(err: &anyhow::Error, json: bool) {
    eprintln!("Error: {:#}", err);
    if !json {
        return;
    }
    if let Some(json) = domain_error_json(err) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

/// JSON form of the error, when it is a domain error
fn domain_error_json(err: &anyhow::Error) -> Option<String> {
    let domain = err.downcast_ref::<DomainError>()?;
    serde_json::to_string_pretty(domain).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_size_args_override_defaults() {
        let cli = parse(&["power_cli", "size", "-e", "0.8", "--power", "0.9", "--design", "paired"]);
        let Command::Size { study, power } = &cli.command else {
            panic!("expected size command");
        };
        let params = study.resolve(&StudyParameters::default(), *power).unwrap();
        assert_eq!(params.effect_size, 0.8);
        assert_eq!(params.power, 0.9);
        assert_eq!(params.alpha, 0.05);
        assert_eq!(params.study_type, StudyType::Paired);
    }

    #[test]
    fn test_unknown_design_is_domain_error() {
        let cli = parse(&["power_cli", "curve", "--design", "crossover"]);
        let Command::Curve { study } = &cli.command else {
            panic!("expected curve command");
        };
        let err = study.resolve(&StudyParameters::default(), None).unwrap_err();
        assert!(err.downcast_ref::<DomainError>().is_some());
    }

    #[test]
    fn test_limits_applied_unless_strict() {
        let params = StudyParameters::new(0.5).with_alpha(0.5);

        let cli = parse(&["power_cli", "size"]);
        let clamped = apply_limits(&cli, &CalculatorSettings::default(), params);
        assert_eq!(clamped.alpha, 0.10);

        let cli = parse(&["power_cli", "--strict", "size"]);
        let raw = apply_limits(&cli, &CalculatorSettings::default(), params);
        assert_eq!(raw.alpha, 0.5);
    }

    #[test]
    fn test_negative_means_accepted() {
        let cli = parse(&["power_cli", "effect", "--mean1", "-3", "--mean2", "1", "--pooled-sd", "2"]);
        let Command::Effect { mean1, mean2, pooled_sd } = cli.command else {
            panic!("expected effect command");
        };
        assert_eq!(calculate_effect_size(mean1, mean2, pooled_sd).unwrap(), 2.0);
    }

    #[test]
    fn test_default_settings_without_config() {
        let settings = load_settings(None).unwrap();
        assert_eq!(settings, CalculatorSettings::default());
    }

    fn request_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_request_from_file() {
        let file = request_file(r#"{ "type": "SampleSize", "effect_size": 0.5, "study_type": "Paired" }"#);
        match run_request(Some(file.path())).unwrap() {
            CalculationOutput::SampleSize(out) => {
                assert_eq!(out.parameters.study_type, StudyType::Paired);
                assert_eq!((out.n1, out.n2), (32, 32));
            }
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn test_request_domain_error() {
        let file = request_file(r#"{ "type": "PowerCurve", "effect_size": 0 }"#);
        let err = run_request(Some(file.path())).unwrap_err();
        let domain = err.downcast_ref::<DomainError>().unwrap();
        assert_eq!(domain.field(), Some("effect_size"));

        let json = domain_error_json(&err).unwrap();
        assert!(json.contains("NonPositive"));
    }

    #[test]
    fn test_request_unknown_design_is_domain_error() {
        let file = request_file(r#"{ "type": "SampleSize", "effect_size": 0.5, "study_type": "crossover" }"#);
        let err = run_request(Some(file.path())).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DomainError>(),
            Some(&DomainError::unsupported_design("crossover"))
        );
        assert!(domain_error_json(&err).unwrap().contains("UnsupportedDesign"));
    }

    #[test]
    fn test_malformed_request() {
        let file = request_file(r#"{ "type": "SampleSize", "effect_size": "#);
        let err = run_request(Some(file.path())).unwrap_err();
        assert!(err.downcast_ref::<DomainError>().is_none());
        assert!(domain_error_json(&err).is_none());
        assert!(format!("{err:#}").contains("parsing calculation request"));
    }

    #[test]
    fn test_missing_request_file() {
        let err = run_request(Some(Path::new("/nonexistent/request.json"))).unwrap_err();
        assert!(format!("{err:#}").contains("reading request file"));
    }

    #[test]
    fn test_invalid_config_file() {
        let file = request_file(r#"{ "limits": { "power": { "min": 0.9, "max": 0.5 } } }"#);
        let err = load_settings(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("min exceeds max"));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
