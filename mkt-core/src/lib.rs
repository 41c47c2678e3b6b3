#![warn(missing_docs)]
//! Price curve models for single-market equilibrium analysis.
//!
//! A market is described by two price functions of quantity, one for demand
//! and one for supply. This crate holds the validated representations of those
//! functions; solving for the equilibrium lives in `mkt-solver`.

/// Core domain models.
///
/// Curves are immutable once constructed. Every public constructor validates
/// its inputs, and (with the `serde` feature) deserialization routes through
/// a DTO so that untrusted input is validated as well.
pub mod models;
