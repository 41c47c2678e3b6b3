//! Application configuration management.
//!
//! This module handles loading and merging configuration from multiple sources
//! with a clear precedence order. Configuration can come from default values,
//! a TOML file, environment variables, and finally command-line flags.

use crate::Cli;
use mkt_solver::{LinearCurveDto, Market, MarketCurve, MarketCurveDto, MarketCurveError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The main application configuration that composes all component configs
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// The demand and supply curves
    #[serde(default)]
    pub market: MarketConfig,

    /// Which taxes to analyze
    #[serde(default)]
    pub scenarios: ScenarioConfig,

    /// Where (and whether) to write the price/quantity table
    #[serde(default)]
    pub export: ExportConfig,
}

/// The two curves of the market.
///
/// A curve is either linear (`intercept` and `slope`) or constant (`price`).
/// A curve given in configuration must be complete; an omitted curve falls
/// back to demand `P = 100 - 2Q` or supply `P = 10 + 3Q`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct MarketConfig {
    /// The demand curve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demand: Option<MarketCurveDto>,

    /// The supply curve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply: Option<MarketCurveDto>,
}

impl MarketConfig {
    fn default_demand() -> MarketCurveDto {
        MarketCurveDto::Linear(LinearCurveDto {
            name: None,
            intercept: 100.0,
            slope: -2.0,
        })
    }

    fn default_supply() -> MarketCurveDto {
        MarketCurveDto::Linear(LinearCurveDto {
            name: None,
            intercept: 10.0,
            slope: 3.0,
        })
    }

    /// Validate both curves and pair them into a market
    pub fn build(&self) -> Result<Market, MarketCurveError> {
        let demand = self
            .demand
            .clone()
            .unwrap_or_else(Self::default_demand)
            .or_name("Demand");
        let supply = self
            .supply
            .clone()
            .unwrap_or_else(Self::default_supply)
            .or_name("Supply");

        Ok(Market::new(
            MarketCurve::try_from(demand)?,
            MarketCurve::try_from(supply)?,
        ))
    }
}

/// The scenarios to run, one per tax
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ScenarioConfig {
    /// Per-unit taxes, analyzed in order (defaults to a free market followed by a tax of 10)
    ///
    /// Besides a list, a single number or a comma-separated string is accepted,
    /// which is how the taxes arrive from `MKT_SCENARIOS__TAXES`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "taxes::deserialize"
    )]
    pub taxes: Option<Vec<f64>>,
}

impl ScenarioConfig {
    const DEFAULT_TAXES: [f64; 2] = [0.0, 10.0];

    /// The configured taxes, or the defaults if none were configured
    pub fn taxes(&self) -> &[f64] {
        self.taxes.as_deref().unwrap_or(&Self::DEFAULT_TAXES)
    }
}

/// Export configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Whether to write the table at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// The destination file, rewritten by every scenario
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

fn default_enabled() -> bool {
    true
}

fn default_path() -> PathBuf {
    PathBuf::from("MarketData.csv")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            path: default_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Command-line flags (highest priority)
    /// 2. Environment variables
    /// 3. Config file given by the CLI
    /// 4. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern:
    /// `MKT_<SECTION>__<KEY>` maps to `<section>.<key>`
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Write the table somewhere else
    /// export MKT_EXPORT__PATH="/tmp/market.csv"
    ///
    /// # Disable the export entirely
    /// export MKT_EXPORT__ENABLED=false
    /// ```
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        Self::load_with(cli, Self::environment())
    }

    /// The environment source, mapping `MKT_SCENARIOS__TAXES="0,10"` to a list
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix("MKT")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("scenarios.taxes")
            .try_parsing(true)
    }

    /// Load configuration as [`AppConfig::load`] does, with an explicit environment source
    pub fn load_with(cli: &Cli, environment: config::Environment) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Start with default values
        config = config.add_source(config::Config::try_from(&Self::default())?);

        // Layer on config file if it is specified and exists
        if let Some(path) = &cli.config {
            if path.exists() {
                config = config.add_source(config::File::from(path.as_path()))
            } else {
                return Err(ConfigError::MissingFile(path.clone()).into());
            }
        }

        // Override with environment variables
        // This maps MKT_EXPORT__PATH to export.path
        config = config.add_source(environment);

        let mut app: Self = config.build()?.try_deserialize()?;

        // Finally, explicit flags win over everything else
        if let Some(path) = &cli.output {
            app.export.path = path.clone();
        }
        if cli.no_export {
            app.export.enabled = false;
        }
        if !cli.taxes.is_empty() {
            app.scenarios.taxes = Some(cli.taxes.clone());
        }

        Ok(app)
    }
}

// Environment values arrive as numbers or strings rather than typed lists, so
// the tax list is deserialized leniently.
mod taxes {
    use serde::de::{self, Deserializer, SeqAccess, Visitor};
    use std::fmt;

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<f64>>, D::Error> {
        deserializer.deserialize_any(TaxesVisitor).map(Some)
    }

    struct TaxesVisitor;

    impl<'de> Visitor<'de> for TaxesVisitor {
        type Value = Vec<f64>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a number, a list of numbers, or comma-separated numbers")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(vec![v])
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(vec![v as f64])
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(vec![v as f64])
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.split(',').map(parse).collect()
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut taxes = Vec::with_capacity(seq.size_hint().unwrap_or_default());
            while let Some(Tax(tax)) = seq.next_element()? {
                taxes.push(tax);
            }
            Ok(taxes)
        }
    }

    fn parse<E: de::Error>(raw: &str) -> Result<f64, E> {
        raw.trim()
            .parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(raw), &"a number"))
    }

    // A single list element, which may itself be a string
    struct Tax(f64);

    impl<'de> de::Deserialize<'de> for Tax {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct TaxVisitor;

            impl Visitor<'_> for TaxVisitor {
                type Value = f64;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    write!(f, "a number")
                }

                fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
                    Ok(v)
                }

                fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
                    Ok(v as f64)
                }

                fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
                    Ok(v as f64)
                }

                fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
                    parse(v)
                }
            }

            deserializer.deserialize_any(TaxVisitor).map(Tax)
        }
    }
}

/// Errors specific to locating the configuration
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file passed with `--config` does not exist
    #[error("Config file {} does not exist", .0.display())]
    MissingFile(PathBuf),
}
