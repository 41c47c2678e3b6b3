/// A flat price function, `price(q) = price`
///
/// A constant curve describes a perfectly elastic side of the market: any
/// quantity clears at the same price. It is the zero-slope special case of a
/// [`LinearCurve`](super::LinearCurve).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "ConstantCurveDto", into = "ConstantCurveDto")
)]
pub struct ConstantCurve {
    name: String,
    price: f64,
}

impl ConstantCurve {
    /// Creates a new constant curve with validation
    pub fn new(name: impl Into<String>, price: f64) -> Result<Self, ConstantCurveError> {
        let dto = ConstantCurveDto {
            name: Some(name.into()),
            price,
        };
        Self::try_from(dto)
    }

    /// Creates a new constant curve without validation
    ///
    /// # Safety
    /// The caller must ensure that the price is finite.
    pub unsafe fn new_unchecked(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    /// The display name of the curve
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The price at every quantity
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Evaluate the price at the given quantity
    pub fn evaluate(&self, _quantity: f64) -> f64 {
        self.price
    }
}

/// A DTO to ensure that we always validate when we deserialize from an untrusted source
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(deny_unknown_fields)
)]
#[derive(Clone, Debug)]
pub struct ConstantCurveDto {
    /// The display name, defaulting to "Curve" if None
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub name: Option<String>,
    /// The (finite) price
    pub price: f64,
}

impl Into<ConstantCurveDto> for ConstantCurve {
    fn into(self) -> ConstantCurveDto {
        ConstantCurveDto {
            name: Some(self.name),
            price: self.price,
        }
    }
}

impl TryFrom<ConstantCurveDto> for ConstantCurve {
    type Error = ConstantCurveError;

    fn try_from(value: ConstantCurveDto) -> Result<Self, Self::Error> {
        if value.price.is_nan() {
            return Err(ConstantCurveError::NaN);
        }
        if value.price.is_infinite() {
            return Err(ConstantCurveError::InfinitePrice);
        }

        Ok(Self {
            name: value
                .name
                .unwrap_or_else(|| super::DEFAULT_NAME.to_owned()),
            price: value.price,
        })
    }
}

/// Errors that can occur when creating or validating a ConstantCurve
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConstantCurveError {
    /// Error when the price is NaN
    #[error("NaN value encountered")]
    NaN,
    /// Error when the price is infinite
    #[error("Price cannot be infinite")]
    InfinitePrice,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat() {
        let curve = ConstantCurve::new("Supply", 40.0).unwrap();
        assert_eq!(curve.evaluate(0.0), 40.0);
        assert_eq!(curve.evaluate(1e6), 40.0);
    }

    #[test]
    fn test_infinite_price() {
        assert_eq!(
            ConstantCurve::new("x", f64::INFINITY).unwrap_err(),
            ConstantCurveError::InfinitePrice
        );
    }

    #[test]
    fn test_nan() {
        assert_eq!(
            ConstantCurve::new("x", f64::NAN).unwrap_err(),
            ConstantCurveError::NaN
        );
    }
}
