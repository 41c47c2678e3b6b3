use crate::Analysis;
use mkt_core::models::MarketCurve;
use tracing::{Level, event, span};

/// A single market: one demand curve and one supply curve.
///
/// Both curves are immutable for the lifetime of the market, so a market can
/// be solved any number of times (e.g. for several tax scenarios).
#[derive(Clone, Debug)]
pub struct Market {
    demand: MarketCurve,
    supply: MarketCurve,
}

impl Market {
    /// Pair a demand curve with a supply curve.
    ///
    /// A demand curve sloping upward or a supply curve sloping downward is
    /// accepted, but logged as a warning.
    pub fn new(demand: impl Into<MarketCurve>, supply: impl Into<MarketCurve>) -> Self {
        let demand = demand.into();
        let supply = supply.into();

        let (demand_slope, _) = demand.slope_intercept();
        let (supply_slope, _) = supply.slope_intercept();
        if demand_slope > 0.0 {
            event!(
                Level::WARN,
                curve = demand.name(),
                slope = demand_slope,
                "demand curve slopes upward"
            );
        }
        if supply_slope < 0.0 {
            event!(
                Level::WARN,
                curve = supply.name(),
                slope = supply_slope,
                "supply curve slopes downward"
            );
        }

        Self { demand, supply }
    }

    /// The demand curve
    pub fn demand(&self) -> &MarketCurve {
        &self.demand
    }

    /// The supply curve
    pub fn supply(&self) -> &MarketCurve {
        &self.supply
    }

    /// Solve `demand(Q) = supply(Q) + tax` for Q.
    ///
    /// Returns `None` when the curves are parallel, in which case they either
    /// never meet or coincide everywhere.
    pub fn equilibrium_quantity(&self, tax: f64) -> Option<f64> {
        let (b, a) = self.demand.slope_intercept();
        let (d, c) = self.supply.slope_intercept();

        // a + bQ = c + dQ + tax  =>  Q = (c - a + tax) / (b - d)
        let denominator = b - d;
        if denominator == 0.0 {
            None
        } else {
            Some((c - a + tax) / denominator)
        }
    }

    /// Compute the equilibrium, elasticity and deadweight loss under a per-unit tax.
    ///
    /// The tax is levied on sellers, shifting the supply curve up by `tax`.
    /// The reported price is the price buyers pay, read off the demand curve.
    ///
    /// Deadweight loss uses the triangle approximation
    /// `0.5 * tax * |Q(no tax) - Q(tax)|`.
    pub fn solve(&self, tax: f64) -> Result<Analysis, SolveError> {
        let span = span!(Level::DEBUG, "solve", tax);
        let _guard = span.enter();

        if !tax.is_finite() {
            return Err(SolveError::InvalidTax(tax));
        }

        let quantity = self
            .equilibrium_quantity(tax)
            .filter(|q| q.is_finite())
            .ok_or(SolveError::NoEquilibrium)?;

        // `!(q > 0)` rather than `q <= 0` so that a signed zero is rejected too
        if !(quantity > 0.0) {
            event!(Level::DEBUG, quantity, "equilibrium quantity is not positive");
            return Err(SolveError::NonPositiveQuantity { quantity });
        }

        let price = self.demand.evaluate(quantity);

        // PED = |(1/slope) * (P/Q)|. A flat demand curve is perfectly elastic at
        // any price, including zero where the formula would give inf * 0.
        let (demand_slope, _) = self.demand.slope_intercept();
        let elasticity = if demand_slope == 0.0 {
            f64::INFINITY
        } else {
            ((1.0 / demand_slope) * (price / quantity)).abs()
        };

        // The untaxed equilibrium shares the denominator, so it exists if the taxed one does
        let baseline = self
            .equilibrium_quantity(0.0)
            .ok_or(SolveError::NoEquilibrium)?;
        let deadweight_loss = 0.5 * tax * (baseline - quantity).abs();

        event!(
            Level::DEBUG,
            quantity,
            price,
            elasticity,
            deadweight_loss,
            "solved market"
        );

        Ok(Analysis {
            tax,
            quantity,
            price,
            elasticity,
            deadweight_loss,
        })
    }
}

/// Reasons a market may fail to produce an analysis
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SolveError {
    /// The curves are parallel (or the algebra otherwise produced a non-finite quantity)
    #[error("no equilibrium: demand and supply curves do not intersect")]
    NoEquilibrium,
    /// The curves intersect, but not at a positive quantity
    #[error("no positive equilibrium (quantity {quantity})")]
    NonPositiveQuantity {
        /// The computed, non-positive quantity
        quantity: f64,
    },
    /// The tax must be a finite number
    #[error("invalid tax: {0}")]
    InvalidTax(f64),
}
