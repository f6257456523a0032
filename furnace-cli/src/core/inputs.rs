//! Upstream tables consumed by the engine.
//!
//! All of them are keyed by `(technology, year)` and materialized in full before any computation.

use std::collections::{BTreeMap, HashMap, btree_map::Entry};

use furnace_quantities::{cost::Cost, emissions::Emissions};
use serde::{Deserialize, Serialize};

use crate::core::{
    Year,
    error::{Error, Result, Table},
    scope::{Scope, ScopeMap},
    technology::Technology,
};

/// Years the upstream tables are complete for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DataYears {
    pub first: Year,
    pub last: Year,
}

impl Default for DataYears {
    fn default() -> Self {
        Self { first: 2020, last: 2050 }
    }
}

impl DataYears {
    /// Flat extrapolation: any year past the last data year reads the last data year.
    #[must_use]
    pub fn clamp(self, year: Year) -> Year {
        year.min(self.last)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CapexValues {
    pub greenfield: Cost,
    pub brownfield: Cost,
}

/// Per-technology yearly values of a single upstream table.
#[derive(Clone, Debug)]
pub struct TechnologySeries<V> {
    table: Table,
    values: HashMap<Technology, BTreeMap<Year, V>>,
}

impl<V: Copy> TechnologySeries<V> {
    pub fn try_from_rows(
        table: Table,
        rows: impl IntoIterator<Item = (Technology, Year, V)>,
    ) -> Result<Self> {
        let mut values: HashMap<Technology, BTreeMap<Year, V>> = HashMap::new();
        for (technology, year, value) in rows {
            match values.entry(technology.clone()).or_default().entry(year) {
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
                Entry::Occupied(_) => {
                    return Err(Error::DuplicateRow { table, technology, year });
                }
            }
        }
        Ok(Self { table, values })
    }

    #[must_use]
    pub const fn table(&self) -> Table {
        self.table
    }

    /// Get the value stored for exactly this year.
    pub fn get(&self, technology: &Technology, year: Year) -> Result<V> {
        self.values.get(technology).and_then(|years| years.get(&year)).copied().ok_or_else(|| {
            Error::DataIntegrity { table: self.table, technology: technology.clone(), year }
        })
    }

    /// Get the value, freezing it at the last data year for any later year.
    pub fn get_flat(&self, technology: &Technology, year: Year, data_years: DataYears) -> Result<V> {
        self.get(technology, data_years.clamp(year))
    }

    /// Values for the consecutive years starting at `start_year`, with the flat extrapolation.
    pub fn horizon(
        &self,
        technology: &Technology,
        start_year: Year,
        horizon: u16,
        data_years: DataYears,
    ) -> Result<Vec<V>> {
        (start_year..start_year + horizon)
            .map(|year| self.get_flat(technology, year, data_years))
            .collect()
    }

    fn try_map(&self, mut f: impl FnMut(&Technology, Year, V) -> Result<V>) -> Result<Self> {
        let mut values = HashMap::with_capacity(self.values.len());
        for (technology, years) in &self.values {
            let mapped = years
                .iter()
                .map(|(year, value)| Ok((*year, f(technology, *year, *value)?)))
                .collect::<Result<BTreeMap<_, _>>>()?;
            values.insert(technology.clone(), mapped);
        }
        Ok(Self { table: self.table, values })
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ValueRow<V> {
    pub technology: Technology,
    pub year: Year,
    pub value: V,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CapexRow {
    pub technology: Technology,
    pub year: Year,

    #[serde(flatten)]
    pub values: CapexValues,
}

/// Scope 1 adjustment produced by the business case standardisation.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct S1Correction {
    pub process_emissions: Emissions,
    pub captured_co2: Emissions,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct S1CorrectionRow {
    pub technology: Technology,
    pub year: Year,

    #[serde(flatten)]
    pub correction: S1Correction,
}

/// Row-oriented input document as handed over by the data producers.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InputBundle {
    pub capex: Vec<CapexRow>,
    pub other_opex: Vec<ValueRow<Cost>>,
    pub variable_costs: Vec<ValueRow<Cost>>,
    pub emissions: ScopeMap<Vec<ValueRow<Emissions>>>,

    #[serde(default)]
    pub s1_corrections: Option<Vec<S1CorrectionRow>>,
}

/// Materialized read-only tables.
#[derive(Clone, Debug)]
pub struct InputTables {
    pub capex: TechnologySeries<CapexValues>,
    pub other_opex: TechnologySeries<Cost>,
    pub variable_costs: TechnologySeries<Cost>,

    /// Emissions per scope, scope 1 already corrected.
    pub emissions: ScopeMap<TechnologySeries<Emissions>>,
}

impl TryFrom<InputBundle> for InputTables {
    type Error = Error;

    fn try_from(bundle: InputBundle) -> Result<Self> {
        let capex = TechnologySeries::try_from_rows(
            Table::Capex,
            bundle.capex.into_iter().map(|row| (row.technology, row.year, row.values)),
        )?;
        let other_opex = value_series(Table::OtherOpex, bundle.other_opex)?;
        let variable_costs = value_series(Table::VariableCosts, bundle.variable_costs)?;
        let mut rows = bundle.emissions;
        let mut emissions = ScopeMap::try_from_fn(|scope| {
            value_series(Table::Emissions(scope), std::mem::take(&mut rows[scope]))
        })?;
        if let Some(corrections) = bundle.s1_corrections {
            let corrections = TechnologySeries::try_from_rows(
                Table::S1Corrections,
                corrections.into_iter().map(|row| (row.technology, row.year, row.correction)),
            )?;
            emissions.s1 = correct_s1(&emissions.s1, &corrections)?;
        }
        Ok(Self { capex, other_opex, variable_costs, emissions })
    }
}

fn value_series<V: Copy>(table: Table, rows: Vec<ValueRow<V>>) -> Result<TechnologySeries<V>> {
    TechnologySeries::try_from_rows(
        table,
        rows.into_iter().map(|row| (row.technology, row.year, row.value)),
    )
}

/// Add the process emissions and subtract the captured or used CO₂.
fn correct_s1(
    s1: &TechnologySeries<Emissions>,
    corrections: &TechnologySeries<S1Correction>,
) -> Result<TechnologySeries<Emissions>> {
    debug_assert_eq!(s1.table(), Table::Emissions(Scope::S1));
    s1.try_map(|technology, year, value| {
        let correction = corrections.get(technology, year)?;
        Ok(value + correction.process_emissions - correction.captured_co2)
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn series(technology: &str, values: &[(Year, f64)]) -> TechnologySeries<Cost> {
        TechnologySeries::try_from_rows(
            Table::OtherOpex,
            values.iter().map(|(year, value)| (Technology::from(technology), *year, Cost::new(*value))),
        )
        .unwrap()
    }

    #[test]
    fn test_flat_extrapolation() {
        let series = series("EAF", &[(2049, 1.0), (2050, 2.0)]);
        let eaf = Technology::from("EAF");
        let data_years = DataYears::default();
        assert_eq!(series.get_flat(&eaf, 2049, data_years).unwrap(), Cost::new(1.0));
        assert_eq!(series.get_flat(&eaf, 2051, data_years).unwrap(), Cost::new(2.0));
        assert_eq!(series.get_flat(&eaf, 2069, data_years).unwrap(), Cost::new(2.0));
    }

    #[test]
    fn test_horizon() {
        let series = series("EAF", &[(2049, 1.0), (2050, 2.0)]);
        let values =
            series.horizon(&Technology::from("EAF"), 2049, 4, DataYears::default()).unwrap();
        assert_eq!(values, vec![Cost::new(1.0), Cost::new(2.0), Cost::new(2.0), Cost::new(2.0)]);
    }

    #[test]
    fn test_missing_key_is_named() {
        let series = series("EAF", &[(2050, 2.0)]);
        let error = series.get(&Technology::from("EAF"), 2020).unwrap_err();
        assert!(matches!(
            error,
            Error::DataIntegrity { table: Table::OtherOpex, ref technology, year: 2020 }
                if technology.as_str() == "EAF"
        ));
    }

    #[test]
    fn test_duplicate_row() {
        let result = TechnologySeries::try_from_rows(
            Table::VariableCosts,
            [(Technology::from("EAF"), 2020, 1.0), (Technology::from("EAF"), 2020, 2.0)],
        );
        assert!(matches!(result, Err(Error::DuplicateRow { year: 2020, .. })));
    }

    #[test]
    fn test_s1_corrections() -> anyhow::Result<()> {
        let bundle: InputBundle = serde_json::from_str(
            r#"{
                "capex": [{"technology": "EAF", "year": 2020, "greenfield": 10.0, "brownfield": 5.0}],
                "other_opex": [],
                "variable_costs": [],
                "emissions": {
                    "s1": [{"technology": "EAF", "year": 2020, "value": 1.0}],
                    "s2": [{"technology": "EAF", "year": 2020, "value": 0.5}],
                    "s3": []
                },
                "s1_corrections": [
                    {"technology": "EAF", "year": 2020, "process_emissions": 0.25, "captured_co2": 0.75}
                ]
            }"#,
        )?;
        let tables = InputTables::try_from(bundle)?;
        let eaf = Technology::from("EAF");
        assert_abs_diff_eq!(tables.emissions.s1.get(&eaf, 2020)?.get(), 0.5);
        assert_abs_diff_eq!(tables.emissions.s2.get(&eaf, 2020)?.get(), 0.5);
        assert_eq!(tables.capex.get(&eaf, 2020)?.brownfield, Cost::new(5.0));
        Ok(())
    }
}
