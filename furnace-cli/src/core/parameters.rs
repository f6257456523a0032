use std::ops::RangeInclusive;

use bon::Builder;
use serde::Serialize;

use crate::core::{
    Year,
    error::{Error, Result},
};

/// Run parameters, independent of the technology model.
#[derive(Copy, Clone, Debug, PartialEq, Builder, Serialize)]
pub struct ModelParameters {
    #[builder(default = 0.07)]
    pub discount_rate: f64,

    /// Investment horizon in years.
    #[builder(default = 20)]
    pub horizon: u16,

    #[builder(default = 2020)]
    pub start_year: Year,

    #[builder(default = 2050)]
    pub end_year: Year,

    /// Skip the reinvestment edges in the TCO and abatement tables.
    #[builder(default)]
    pub exclude_self_loops: bool,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ModelParameters {
    #[must_use]
    pub const fn years(&self) -> RangeInclusive<Year> {
        self.start_year..=self.end_year
    }

    pub fn validate(&self) -> Result {
        if self.horizon == 0 {
            return Err(Error::Computation("the investment horizon must be at least a year".into()));
        }
        if self.start_year > self.end_year {
            return Err(Error::Computation(format!(
                "start year {} is after the end year {}",
                self.start_year, self.end_year,
            )));
        }
        if !self.discount_rate.is_finite() || self.discount_rate <= -1.0 {
            return Err(Error::Computation(format!(
                "invalid discount rate: {}",
                self.discount_rate,
            )));
        }
        if self.end_year.checked_add(self.horizon).is_none() {
            return Err(Error::Computation(format!(
                "the horizon of {} years overflows the year range",
                self.horizon,
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let parameters = ModelParameters::default();
        assert_eq!(parameters.discount_rate, 0.07);
        assert_eq!(parameters.horizon, 20);
        assert_eq!(parameters.years(), 2020..=2050);
        assert!(!parameters.exclude_self_loops);
        assert!(parameters.validate().is_ok());
    }

    #[test]
    fn test_invalid() {
        for parameters in [
            ModelParameters::builder().horizon(0).build(),
            ModelParameters::builder().start_year(2031).end_year(2030).build(),
            ModelParameters::builder().discount_rate(-1.0).build(),
            ModelParameters::builder().discount_rate(f64::INFINITY).build(),
        ] {
            assert!(matches!(parameters.validate(), Err(Error::Computation(_))), "{parameters:?}");
        }
    }
}
