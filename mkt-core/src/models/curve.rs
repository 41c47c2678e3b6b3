//! Price curve implementations.
//!
//! This module provides the curve shapes a market side can take:
//! - [`LinearCurve`]: an affine price function `intercept + slope * q`
//! - [`ConstantCurve`]: a flat price, i.e. a perfectly elastic market side

mod constant;
mod linear;

pub use constant::*;
pub use linear::*;

/// The name given to curves that are constructed without one
const DEFAULT_NAME: &str = "Curve";

#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "MarketCurveDto", into = "MarketCurveDto")
)]
#[derive(Clone, Debug, PartialEq)]
/// One side of a market, expressed as price as a function of quantity.
///
/// Every variant is affine, so the solver only needs [`MarketCurve::slope_intercept`]
/// and [`MarketCurve::evaluate`] and does not care which shape it was handed.
pub enum MarketCurve {
    /// Affine curve with arbitrary finite slope
    Linear(LinearCurve),
    /// Flat curve with zero slope
    Constant(ConstantCurve),
}

/// DTO for market curves to enable validation during deserialization
///
/// The representation is untagged: a map with `intercept` and `slope` is a
/// linear curve, a map with only `price` is a constant curve.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
#[derive(Clone, Debug)]
pub enum MarketCurveDto {
    /// Linear curve DTO
    Linear(LinearCurveDto),
    /// Constant curve DTO
    Constant(ConstantCurveDto),
}

impl MarketCurveDto {
    /// Fill in the name if the DTO does not already carry one
    pub fn or_name(mut self, name: &str) -> Self {
        let slot = match &mut self {
            Self::Linear(dto) => &mut dto.name,
            Self::Constant(dto) => &mut dto.name,
        };
        slot.get_or_insert_with(|| name.to_owned());
        self
    }
}

impl TryFrom<MarketCurveDto> for MarketCurve {
    type Error = MarketCurveError;

    /// Creates a market curve from a DTO, validating all constraints
    fn try_from(value: MarketCurveDto) -> Result<Self, Self::Error> {
        match value {
            MarketCurveDto::Linear(curve) => Ok(LinearCurve::try_from(curve)?.into()),
            MarketCurveDto::Constant(curve) => Ok(ConstantCurve::try_from(curve)?.into()),
        }
    }
}

impl Into<MarketCurveDto> for MarketCurve {
    fn into(self) -> MarketCurveDto {
        match self {
            Self::Linear(curve) => MarketCurveDto::Linear(curve.into()),
            Self::Constant(curve) => MarketCurveDto::Constant(curve.into()),
        }
    }
}

impl From<LinearCurve> for MarketCurve {
    fn from(value: LinearCurve) -> Self {
        Self::Linear(value)
    }
}

impl From<ConstantCurve> for MarketCurve {
    fn from(value: ConstantCurve) -> Self {
        Self::Constant(value)
    }
}

/// Errors that can occur when constructing market curves
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum MarketCurveError {
    /// Error from constructing a linear curve
    #[error("invalid linear curve: {0}")]
    Linear(#[from] LinearCurveError),
    /// Error from constructing a constant curve
    #[error("invalid constant curve: {0}")]
    Constant(#[from] ConstantCurveError),
}

impl MarketCurve {
    /// The display name of the curve
    pub fn name(&self) -> &str {
        match self {
            Self::Linear(curve) => curve.name(),
            Self::Constant(curve) => curve.name(),
        }
    }

    /// Evaluate the price at the given quantity
    pub fn evaluate(&self, quantity: f64) -> f64 {
        match self {
            Self::Linear(curve) => curve.evaluate(quantity),
            Self::Constant(curve) => curve.evaluate(quantity),
        }
    }

    /// Returns the curve in affine form
    ///
    /// # Returns
    /// A tuple `(slope, intercept)` such that `price(q) = intercept + slope * q`.
    pub fn slope_intercept(&self) -> (f64, f64) {
        match self {
            Self::Linear(curve) => (curve.slope(), curve.intercept()),
            Self::Constant(curve) => (0.0, curve.price()),
        }
    }
}
