use std::fmt::{Debug, Display, Formatter};

use crate::Quantity;

/// Tonnes of CO₂ per tonne of steel.
pub type Emissions = Quantity<0, 1>;

impl Display for Emissions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} tCO₂/t", self.0)
    }
}

impl Debug for Emissions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}tCO₂/t", self.0)
    }
}
