use std::fmt::{Debug, Display, Formatter};

use crate::Quantity;

/// US dollars per tonne of steel.
pub type Cost = Quantity<1, 0>;

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} $/t", self.0)
    }
}

impl Debug for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}$/t", self.0)
    }
}
