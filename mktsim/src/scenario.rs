//! Running a single tax scenario end to end.
//!
//! A scenario solves the market, renders the outcome to the console, and
//! (when enabled) exports the price/quantity table. Failures to solve or to
//! export are reported on the console and recorded in the returned
//! [`ScenarioOutcome`]; only failures to write to the console itself are
//! returned as errors.

use crate::{ExportConfig, OutputFormat};
use mkt_solver::{Analysis, Elasticity, Market, Report, SolveError, export};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{Level, event, span};

/// What happened when a scenario was run
#[derive(Debug)]
pub enum ScenarioOutcome {
    /// The market has no positive equilibrium; nothing was reported or exported
    NoEquilibrium(SolveError),
    /// The analysis was reported and export is disabled
    Reported(Analysis),
    /// The analysis was reported and the table written
    Exported {
        /// The solved market
        analysis: Analysis,
        /// The number of data rows in the table
        rows: usize,
    },
    /// The analysis was reported but the table could not be written
    ExportFailed {
        /// The solved market
        analysis: Analysis,
        /// Why the export failed
        error: std::io::Error,
    },
}

impl ScenarioOutcome {
    /// The analysis, if the market could be solved
    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            Self::NoEquilibrium(_) => None,
            Self::Reported(analysis)
            | Self::Exported { analysis, .. }
            | Self::ExportFailed { analysis, .. } => Some(analysis),
        }
    }
}

// The shape of a scenario in JSON output. An infinite elasticity (flat demand)
// serializes as `null`; `classification` still reports it as elastic.
#[derive(Serialize)]
struct Record<'a> {
    tax: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<&'a Analysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    classification: Option<Elasticity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    export: Option<&'a Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> Record<'a> {
    fn new(tax: f64, outcome: &'a ScenarioOutcome, path: &'a Path) -> Self {
        let analysis = outcome.analysis();
        let (export, rows, error) = match outcome {
            ScenarioOutcome::NoEquilibrium(err) => (None, None, Some(err.to_string())),
            ScenarioOutcome::Reported(_) => (None, None, None),
            ScenarioOutcome::Exported { rows, .. } => (Some(path), Some(*rows), None),
            ScenarioOutcome::ExportFailed { error, .. } => (None, None, Some(error.to_string())),
        };
        Self {
            tax,
            analysis,
            classification: analysis.map(Analysis::classification),
            export,
            rows,
            error,
        }
    }
}

/// Solve, report and export a single tax scenario.
pub fn run_scenario(
    market: &Market,
    tax: f64,
    config: &ExportConfig,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<ScenarioOutcome> {
    let span = span!(Level::INFO, "scenario", tax);
    let _guard = span.enter();

    let outcome = match market.solve(tax) {
        Err(err) => {
            event!(Level::WARN, err = err.to_string(), "analysis skipped");
            ScenarioOutcome::NoEquilibrium(err)
        }
        Ok(analysis) => {
            if format == OutputFormat::Text {
                write!(out, "{}", Report(&analysis))?;
            }

            if !config.enabled {
                ScenarioOutcome::Reported(analysis)
            } else {
                match export::export_csv(market, &analysis, &config.path) {
                    Ok(rows) => {
                        event!(Level::INFO, path = %config.path.display(), rows, "exported table");
                        ScenarioOutcome::Exported { analysis, rows }
                    }
                    Err(error) => {
                        event!(Level::ERROR, err = error.to_string(), "export failed");
                        ScenarioOutcome::ExportFailed { analysis, error }
                    }
                }
            }
        }
    };

    match format {
        OutputFormat::Text => match &outcome {
            ScenarioOutcome::NoEquilibrium(_) => {
                writeln!(out, "Market Error: No positive equilibrium found.")?
            }
            ScenarioOutcome::Reported(_) => {}
            ScenarioOutcome::Exported { .. } => {
                writeln!(out, "[System] Data exported to {}", config.path.display())?
            }
            ScenarioOutcome::ExportFailed { error, .. } => {
                writeln!(out, "Export error: {error}")?
            }
        },
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, &Record::new(tax, &outcome, &config.path))?;
            writeln!(out)?;
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mkt_solver::{ConstantCurve, LinearCurve};
    use rstest::*;
    use std::path::PathBuf;

    #[fixture]
    fn market() -> Market {
        Market::new(
            LinearCurve::new("Demand", 100.0, -2.0).unwrap(),
            LinearCurve::new("Supply", 10.0, 3.0).unwrap(),
        )
    }

    fn scratch(name: &str) -> ExportConfig {
        ExportConfig {
            enabled: true,
            path: std::env::temp_dir().join(format!("mktsim-{}-{name}.csv", std::process::id())),
        }
    }

    #[rstest]
    fn test_exported(market: Market) {
        let config = scratch("exported");
        let mut out = Vec::new();
        let outcome = run_scenario(&market, 10.0, &config, OutputFormat::Text, &mut out).unwrap();
        let table = std::fs::read_to_string(&config.path).unwrap();
        std::fs::remove_file(&config.path).unwrap();

        assert!(matches!(outcome, ScenarioOutcome::Exported { rows: 25, .. }));
        assert_eq!(table.lines().count(), 26);

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("==="));
        assert!(out.contains("Deadweight Loss (DWL):   10.00"));
        assert!(out.ends_with(&format!(
            "[System] Data exported to {}\n",
            config.path.display()
        )));
    }

    #[rstest]
    fn test_no_equilibrium(market: Market) {
        let config = scratch("no-equilibrium");
        let mut out = Vec::new();
        let outcome = run_scenario(&market, 200.0, &config, OutputFormat::Text, &mut out).unwrap();

        assert!(matches!(
            outcome,
            ScenarioOutcome::NoEquilibrium(SolveError::NonPositiveQuantity { .. })
        ));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Market Error: No positive equilibrium found.\n"
        );
        // No export is attempted
        assert!(!config.path.exists());
    }

    #[test]
    fn test_parallel_curves() {
        let market = Market::new(
            LinearCurve::new("Demand", 100.0, 2.0).unwrap(),
            LinearCurve::new("Supply", 10.0, 2.0).unwrap(),
        );
        let config = scratch("parallel");
        let mut out = Vec::new();
        let outcome = run_scenario(&market, 0.0, &config, OutputFormat::Text, &mut out).unwrap();

        assert!(matches!(
            outcome,
            ScenarioOutcome::NoEquilibrium(SolveError::NoEquilibrium)
        ));
        let out = String::from_utf8(out).unwrap();
        assert!(!out.contains("NaN"));
        assert!(!config.path.exists());
    }

    #[rstest]
    fn test_export_failure_is_not_fatal(market: Market) {
        let config = ExportConfig {
            enabled: true,
            path: PathBuf::from("/definitely/not/a/dir/MarketData.csv"),
        };
        let mut out = Vec::new();
        let outcome = run_scenario(&market, 0.0, &config, OutputFormat::Text, &mut out).unwrap();

        assert!(matches!(outcome, ScenarioOutcome::ExportFailed { .. }));
        assert_eq!(outcome.analysis().map(|a| a.quantity), Some(18.0));

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Equilibrium Quantity (Q*): 18.00"));
        assert!(out.lines().last().unwrap().starts_with("Export error: "));
    }

    #[rstest]
    fn test_export_disabled(market: Market) {
        let config = ExportConfig {
            enabled: false,
            ..scratch("disabled")
        };
        let mut out = Vec::new();
        let outcome = run_scenario(&market, 0.0, &config, OutputFormat::Text, &mut out).unwrap();

        assert!(matches!(outcome, ScenarioOutcome::Reported(_)));
        assert!(!config.path.exists());
        assert!(String::from_utf8(out).unwrap().ends_with("===\n\n"));
    }

    #[rstest]
    fn test_json(market: Market) {
        let config = ExportConfig {
            enabled: false,
            ..scratch("json")
        };
        let mut out = Vec::new();
        run_scenario(&market, 10.0, &config, OutputFormat::Json, &mut out).unwrap();
        run_scenario(&market, 200.0, &config, OutputFormat::Json, &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines = out
            .lines()
            .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
            .collect::<Vec<_>>();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["tax"], 10.0);
        assert_eq!(lines[0]["analysis"]["quantity"], 16.0);
        assert_eq!(lines[0]["classification"], "Elastic");
        assert!(lines[0].get("error").is_none());

        assert_eq!(lines[1]["tax"], 200.0);
        assert!(lines[1].get("analysis").is_none());
        assert!(lines[1]["error"].as_str().unwrap().contains("positive"));
    }

    #[test]
    fn test_json_infinite_elasticity() {
        let market = Market::new(
            ConstantCurve::new("Demand", 50.0).unwrap(),
            LinearCurve::new("Supply", 10.0, 2.0).unwrap(),
        );
        let config = ExportConfig {
            enabled: false,
            ..scratch("json-flat")
        };
        let mut out = Vec::new();
        run_scenario(&market, 0.0, &config, OutputFormat::Json, &mut out).unwrap();

        let line = serde_json::from_slice::<serde_json::Value>(&out).unwrap();
        assert_eq!(line["analysis"]["quantity"], 20.0);
        assert!(line["analysis"]["elasticity"].is_null());
        assert_eq!(line["classification"], "Elastic");
    }
}
