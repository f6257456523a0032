pub mod cost;
pub mod emissions;

use std::ops::{Div, Mul};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Per-tonne-of-steel quantity with its dimensions encoded in the type.
///
/// `COST` is the power of the currency unit and `CO2` is the power of tonnes of CO₂.
#[derive(
    Clone,
    Copy,
    Default,
    Deserialize,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Sum,
)]
#[from(f64, OrderedFloat<f64>)]
#[serde(transparent)]
#[must_use]
pub struct Quantity<const COST: isize, const CO2: isize>(pub OrderedFloat<f64>);

impl<const COST: isize, const CO2: isize> Quantity<COST, CO2> {
    pub const ZERO: Self = Self(OrderedFloat(0.0));

    pub const fn new(value: f64) -> Self {
        Self(OrderedFloat(value))
    }

    /// Raw value in the base units.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0.0
    }

    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.0.0.is_finite()
    }
}

impl<const COST: isize, const CO2: isize> Mul<f64> for Quantity<COST, CO2> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl<const COST: isize, const CO2: isize> Div<f64> for Quantity<COST, CO2> {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl<const COST: isize, const CO2: isize> Div<Self> for Quantity<COST, CO2> {
    type Output = f64;

    fn div(self, rhs: Self) -> Self::Output {
        self.0.0 / rhs.0.0
    }
}
