#![warn(missing_docs)]
//! A command-line calculator for single-market equilibrium and tax incidence.
//!
//! The calculator pairs a demand curve with a supply curve, then for each
//! configured tax reports the equilibrium quantity and price, the price
//! elasticity of demand, and the deadweight loss of the tax. Each scenario
//! also writes a price/quantity table for plotting.

mod cli;
pub use cli::*;

mod config;
pub use config::*;

mod scenario;
pub use scenario::*;

use std::io::Write;

/// Run every configured scenario against the configured market, in order.
///
/// Invalid curve definitions are fatal. A scenario without a positive
/// equilibrium, or whose export fails, is reported and the remaining
/// scenarios still run.
pub fn run(
    config: &AppConfig,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<Vec<ScenarioOutcome>> {
    let market = config.market.build()?;

    config
        .scenarios
        .taxes()
        .iter()
        .map(|&tax| run_scenario(&market, tax, &config.export, format, &mut *out))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_run() {
        let mut config = AppConfig::default();
        config.export.enabled = false;

        let mut out = Vec::new();
        let outcomes = run(&config, OutputFormat::Text, &mut out).unwrap();

        let quantities = outcomes
            .iter()
            .map(|outcome| outcome.analysis().map(|a| a.quantity))
            .collect::<Vec<_>>();
        assert_eq!(quantities, vec![Some(18.0), Some(16.0)]);

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("ECONOMIC ANALYSIS REPORT (Tax: 0.0)"));
        assert!(out.contains("ECONOMIC ANALYSIS REPORT (Tax: 10.0)"));
        // Deadweight loss only appears in the taxed report
        assert_eq!(out.matches("Deadweight Loss").count(), 1);
    }

    #[test]
    fn test_later_scenarios_survive_failures() {
        let mut config = AppConfig::default();
        config.export.enabled = false;
        config.scenarios.taxes = Some(vec![500.0, 10.0]);

        let mut out = Vec::new();
        let outcomes = run(&config, OutputFormat::Text, &mut out).unwrap();

        assert!(matches!(outcomes[0], ScenarioOutcome::NoEquilibrium(_)));
        assert!(matches!(outcomes[1], ScenarioOutcome::Reported(_)));
    }
}
