use std::fmt::{Display, Formatter};

use furnace_quantities::cost::Cost;

use crate::core::{
    Year,
    curve::LinearCurve,
    error::Result,
    inputs::{CapexValues, TechnologySeries},
    technology::Technology,
};

/// How a single capex switch value is derived from the capex table.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Formula<'a> {
    /// Brownfield capex of the technology.
    Brownfield(&'a Technology),

    /// Fixed share of the greenfield capex of the technology.
    GreenfieldShare { technology: &'a Technology, share: f64 },

    /// Brownfield capex of `base`, plus the greenfield capex delta between `to` and `from`.
    BrownfieldPlusDelta { base: &'a Technology, from: &'a Technology, to: &'a Technology },

    /// Externally supplied capex curve.
    LegacyCurve,

    Constant(Cost),

    /// Greenfield capex of `minuend` less the greenfield capex of `subtrahend`.
    GreenfieldDifference { minuend: &'a Technology, subtrahend: &'a Technology },

    /// Greenfield capex of the technology less a fixed amount.
    GreenfieldLess { technology: &'a Technology, offset: Cost },

    /// Building the technology from scratch.
    Greenfield(&'a Technology),
}

impl Formula<'_> {
    pub fn evaluate(
        self,
        year: Year,
        capex: &TechnologySeries<CapexValues>,
        legacy_curve: &LinearCurve,
    ) -> Result<Cost> {
        let greenfield = |technology: &Technology| -> Result<Cost> {
            Ok(capex.get(technology, year)?.greenfield)
        };
        let brownfield = |technology: &Technology| -> Result<Cost> {
            Ok(capex.get(technology, year)?.brownfield)
        };

        match self {
            Self::Brownfield(technology) => brownfield(technology),
            Self::GreenfieldShare { technology, share } => Ok(greenfield(technology)? * share),
            Self::BrownfieldPlusDelta { base, from, to } => {
                Ok(brownfield(base)? + greenfield(to)? - greenfield(from)?)
            }
            Self::LegacyCurve => Ok(legacy_curve.at(year)),
            Self::Constant(value) => Ok(value),
            Self::GreenfieldDifference { minuend, subtrahend } => {
                Ok(greenfield(minuend)? - greenfield(subtrahend)?)
            }
            Self::GreenfieldLess { technology, offset } => Ok(greenfield(technology)? - offset),
            Self::Greenfield(technology) => greenfield(technology),
        }
    }
}

impl Display for Formula<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Brownfield(technology) => write!(f, "brownfield({technology})"),
            Self::GreenfieldShare { technology, share } => {
                write!(f, "{share} × greenfield({technology})")
            }
            Self::BrownfieldPlusDelta { base, from, to } => {
                write!(f, "brownfield({base}) + greenfield({to}) − greenfield({from})")
            }
            Self::LegacyCurve => write!(f, "legacy curve"),
            Self::Constant(value) => write!(f, "{value}"),
            Self::GreenfieldDifference { minuend, subtrahend } => {
                write!(f, "greenfield({minuend}) − greenfield({subtrahend})")
            }
            Self::GreenfieldLess { technology, offset } => {
                write!(f, "greenfield({technology}) − {offset}")
            }
            Self::Greenfield(technology) => write!(f, "greenfield({technology})"),
        }
    }
}
