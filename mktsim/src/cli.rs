//! Command-line interface definition and parsing.
//!
//! Every flag is optional: with none given, the calculator runs the default
//! scenarios against the default market and exports to the default path.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for the market calculator.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "MKT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Where to write the price/quantity table (overrides the configuration).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip writing the price/quantity table.
    #[arg(long)]
    pub no_export: bool,

    /// Per-unit tax to analyze; repeat to run several scenarios (overrides the configuration).
    #[arg(short, long = "tax", allow_negative_numbers = true)]
    pub taxes: Vec<f64>,

    /// How to render each scenario on stdout.
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

impl Cli {
    /// Parse command-line arguments.
    ///
    /// This method parses the command-line arguments according to the defined
    /// structure, including validation and help text generation.
    pub fn import() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}

/// The console rendering of a scenario
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The fixed-format report block
    #[default]
    Text,
    /// One JSON object per scenario
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags() {
        let cli = Cli::try_parse_from(["mktsim"]).unwrap();
        assert!(cli.output.is_none());
        assert!(!cli.no_export);
        assert!(cli.taxes.is_empty());
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_repeated_taxes() {
        let cli = Cli::try_parse_from(["mktsim", "--tax", "5", "-t", "2.5", "-t", "-1"]).unwrap();
        assert_eq!(cli.taxes, vec![5.0, 2.5, -1.0]);
    }

    #[test]
    fn test_format() {
        let cli = Cli::try_parse_from(["mktsim", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(Cli::try_parse_from(["mktsim", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_bad_tax() {
        assert!(Cli::try_parse_from(["mktsim", "--tax", "lots"]).is_err());
    }
}
