use crate::Analysis;
use std::fmt;

const RULE: &str = "===========================================";

/// A fixed-format, human-readable rendering of an [`Analysis`].
///
/// The block ends with a blank line so consecutive reports stay separated.
/// Deadweight loss is only shown when the tax is positive.
pub struct Report<'a>(pub &'a Analysis);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Analysis {
            tax,
            quantity,
            price,
            elasticity,
            deadweight_loss,
        } = self.0;

        writeln!(f, "{RULE}")?;
        // Debug formatting keeps the trailing ".0" on whole-number taxes, and
        // switches to exponent notation below 1e-4 and from 1e16 up
        writeln!(f, "   ECONOMIC ANALYSIS REPORT (Tax: {tax:?})")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Equilibrium Quantity (Q*): {quantity:.2}")?;
        writeln!(f, "Equilibrium Price    (P*): {price:.2}")?;
        writeln!(
            f,
            "Price Elasticity (PED):  {elasticity:.2} ({})",
            self.0.classification()
        )?;
        if *tax > 0.0 {
            writeln!(f, "Deadweight Loss (DWL):   {deadweight_loss:.2}")?;
        }
        writeln!(f, "{RULE}")?;
        writeln!(f)
    }
}
