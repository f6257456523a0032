use furnace_quantities::cost::Cost;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::core::{
    Year,
    error::{Error, Result},
};

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CurvePoint {
    pub year: Year,
    pub value: Cost,
}

/// Straight line segments through a few yearly data points.
///
/// Years before the first point and after the last one hold the respective end value.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(try_from = "Vec<CurvePoint>", into = "Vec<CurvePoint>")]
pub struct LinearCurve(Vec<CurvePoint>);

impl TryFrom<Vec<CurvePoint>> for LinearCurve {
    type Error = Error;

    fn try_from(points: Vec<CurvePoint>) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::Configuration(format!(
                "a curve needs at least two points, got {}",
                points.len(),
            )));
        }
        if let Some((lhs, rhs)) = points.iter().tuple_windows().find(|(lhs, rhs)| lhs.year >= rhs.year)
        {
            return Err(Error::Configuration(format!(
                "curve points must be in ascending year order, got {} before {}",
                lhs.year, rhs.year,
            )));
        }
        Ok(Self(points))
    }
}

impl From<LinearCurve> for Vec<CurvePoint> {
    fn from(curve: LinearCurve) -> Self {
        curve.0
    }
}

impl LinearCurve {
    #[must_use]
    pub fn at(&self, year: Year) -> Cost {
        let (first, last) = (self.0[0], self.0[self.0.len() - 1]);
        if year <= first.year {
            return first.value;
        }
        if year >= last.year {
            return last.value;
        }
        self.0
            .iter()
            .tuple_windows()
            .find(|(_, rhs)| year <= rhs.year)
            .map_or(last.value, |(lhs, rhs)| {
                let progress =
                    f64::from(year - lhs.year) / f64::from(rhs.year - lhs.year);
                lhs.value + (rhs.value - lhs.value) * progress
            })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn curve() -> LinearCurve {
        LinearCurve::try_from(vec![
            CurvePoint { year: 2020, value: Cost::new(319.249_187_119_815) },
            CurvePoint { year: 2030, value: Cost::new(319.249_187_119_815) },
            CurvePoint { year: 2050, value: Cost::new(286.218_839_300_307) },
        ])
        .unwrap()
    }

    #[test]
    fn test_points() {
        let curve = curve();
        assert_abs_diff_eq!(curve.at(2020).get(), 319.249_187_119_815);
        assert_abs_diff_eq!(curve.at(2025).get(), 319.249_187_119_815);
        assert_abs_diff_eq!(curve.at(2030).get(), 319.249_187_119_815);
        assert_abs_diff_eq!(curve.at(2050).get(), 286.218_839_300_307);
    }

    #[test]
    fn test_interpolation() {
        let expected = 319.249_187_119_815 + (286.218_839_300_307 - 319.249_187_119_815) * 0.5;
        assert_abs_diff_eq!(curve().at(2040).get(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_outside_range() {
        let curve = curve();
        assert_eq!(curve.at(2010), curve.at(2020));
        assert_eq!(curve.at(2070), curve.at(2050));
    }

    #[test]
    fn test_unordered_points() {
        let result = LinearCurve::try_from(vec![
            CurvePoint { year: 2030, value: Cost::ZERO },
            CurvePoint { year: 2020, value: Cost::ZERO },
        ]);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
