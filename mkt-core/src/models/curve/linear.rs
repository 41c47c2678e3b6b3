/// A straight-line price function, `price(q) = intercept + slope * q`
///
/// Demand curves conventionally slope downward (negative slope) and supply
/// curves upward (positive slope), but neither sign is enforced here: the
/// only requirement is that both coefficients are finite.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "LinearCurveDto", into = "LinearCurveDto")
)]
pub struct LinearCurve {
    name: String,
    intercept: f64,
    slope: f64,
}

impl LinearCurve {
    /// Creates a new linear curve with validation
    pub fn new(
        name: impl Into<String>,
        intercept: f64,
        slope: f64,
    ) -> Result<Self, LinearCurveError> {
        let dto = LinearCurveDto {
            name: Some(name.into()),
            intercept,
            slope,
        };
        Self::try_from(dto)
    }

    /// Creates a new linear curve without validation
    ///
    /// # Safety
    /// The caller must ensure that neither coefficient is NaN or infinite.
    /// Non-finite coefficients propagate into every price the curve produces.
    pub unsafe fn new_unchecked(name: impl Into<String>, intercept: f64, slope: f64) -> Self {
        Self {
            name: name.into(),
            intercept,
            slope,
        }
    }

    /// The display name of the curve (e.g. "Demand")
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The price at zero quantity
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// The change in price per unit of quantity
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Evaluate the price at the given quantity
    pub fn evaluate(&self, quantity: f64) -> f64 {
        self.intercept + self.slope * quantity
    }
}

/// A DTO to ensure that we always validate when we deserialize from an untrusted source
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(deny_unknown_fields)
)]
#[derive(Clone, Debug)]
pub struct LinearCurveDto {
    /// The display name, defaulting to "Curve" if None
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub name: Option<String>,
    /// The (finite) price at zero quantity
    pub intercept: f64,
    /// The (finite) slope
    pub slope: f64,
}

impl Into<LinearCurveDto> for LinearCurve {
    fn into(self) -> LinearCurveDto {
        LinearCurveDto {
            name: Some(self.name),
            intercept: self.intercept,
            slope: self.slope,
        }
    }
}

impl TryFrom<LinearCurveDto> for LinearCurve {
    type Error = LinearCurveError;

    fn try_from(value: LinearCurveDto) -> Result<Self, Self::Error> {
        let LinearCurveDto {
            name,
            intercept,
            slope,
        } = value;

        if intercept.is_nan() || slope.is_nan() {
            return Err(LinearCurveError::NaN);
        }
        if intercept.is_infinite() || slope.is_infinite() {
            return Err(LinearCurveError::Infinity);
        }

        Ok(Self {
            name: name.unwrap_or_else(|| super::DEFAULT_NAME.to_owned()),
            intercept,
            slope,
        })
    }
}

/// Errors that can occur when creating or validating a LinearCurve
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum LinearCurveError {
    /// Error when either coefficient is NaN
    #[error("NaN value encountered")]
    NaN,
    /// Error when either coefficient is infinite
    #[error("Coefficients must be finite")]
    Infinity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate() {
        let demand = LinearCurve::new("Demand", 100.0, -2.0).unwrap();
        assert_eq!(demand.evaluate(0.0), 100.0);
        assert_eq!(demand.evaluate(18.0), 64.0);
        // Any real quantity is accepted, including negative ones
        assert_eq!(demand.evaluate(-5.0), 110.0);
    }

    #[test]
    fn test_accessors() {
        let supply = LinearCurve::new("Supply", 10.0, 3.0).unwrap();
        assert_eq!(supply.name(), "Supply");
        assert_eq!(supply.intercept(), 10.0);
        assert_eq!(supply.slope(), 3.0);
    }

    #[test]
    fn test_nans() {
        assert_eq!(
            LinearCurve::new("x", f64::NAN, 1.0).unwrap_err(),
            LinearCurveError::NaN
        );
        assert_eq!(
            LinearCurve::new("x", 1.0, f64::NAN).unwrap_err(),
            LinearCurveError::NaN
        );
    }

    #[test]
    fn test_infinities() {
        assert_eq!(
            LinearCurve::new("x", f64::INFINITY, 1.0).unwrap_err(),
            LinearCurveError::Infinity
        );
        assert_eq!(
            LinearCurve::new("x", 1.0, f64::NEG_INFINITY).unwrap_err(),
            LinearCurveError::Infinity
        );
    }

    #[test]
    fn test_deserialize_default_name() {
        let raw = r#"{ "intercept": 100.0, "slope": -2.0 }"#;
        let curve = serde_json::from_str::<LinearCurve>(raw).unwrap();
        assert_eq!(curve.name(), "Curve");
        assert_eq!(curve.slope(), -2.0);
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let raw = r#"{ "intercept": 100.0, "slope": -2.0, "price": 3.0 }"#;
        assert!(serde_json::from_str::<LinearCurve>(raw).is_err());
    }
}
