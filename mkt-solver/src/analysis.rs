use std::fmt;

/// The equilibrium of a market under a given per-unit tax
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Analysis {
    /// The per-unit tax the market was solved under
    pub tax: f64,
    /// The equilibrium quantity (always positive)
    pub quantity: f64,
    /// The equilibrium price paid by buyers
    pub price: f64,
    /// The price elasticity of demand at the equilibrium, in absolute value
    ///
    /// Infinite for a flat demand curve. `serde_json` has no representation
    /// for infinity and writes `null` in that case.
    pub elasticity: f64,
    /// The welfare loss induced by the tax
    pub deadweight_loss: f64,
}

impl Analysis {
    /// Classify the elasticity of demand at the equilibrium
    pub fn classification(&self) -> Elasticity {
        Elasticity::classify(self.elasticity)
    }
}

/// Whether demand responds more or less than proportionally to price
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Elasticity {
    /// |PED| > 1
    Elastic,
    /// |PED| ≤ 1
    Inelastic,
}

impl Elasticity {
    /// Classify an (absolute) elasticity against the unit threshold.
    ///
    /// Unit elasticity is reported as inelastic.
    pub fn classify(elasticity: f64) -> Self {
        if elasticity > 1.0 {
            Self::Elastic
        } else {
            Self::Inelastic
        }
    }
}

impl fmt::Display for Elasticity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Elastic => write!(f, "Elastic"),
            Self::Inelastic => write!(f, "Inelastic"),
        }
    }
}
