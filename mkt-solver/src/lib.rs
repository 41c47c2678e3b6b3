#![warn(missing_docs)]
//! Equilibrium analysis for a single market with affine demand and supply.
//!
//! A [`Market`] pairs a demand curve with a supply curve. Solving it for a
//! per-unit tax yields an [`Analysis`]: the equilibrium quantity and price,
//! the price elasticity of demand at that point, and the deadweight loss the
//! tax induces. The analysis can be rendered as a fixed-format [`Report`] or
//! tabulated to CSV with the functions in [`export`].

/**
 * The market and its solver.
 */
mod market;
pub use market::*;

/**
 * The result of solving a market.
 */
mod analysis;
pub use analysis::*;

mod report;
pub use report::Report;

/// Tabular export of the curves around an equilibrium.
pub mod export;

// Re-export the curve models so downstream crates need only depend on the solver
pub use mkt_core::models::*;
