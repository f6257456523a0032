//! Nominal emissions abated by a switch, per scope.

use bon::Builder;
use furnace_quantities::emissions::Emissions;
use serde::Serialize;

use crate::core::{
    Year,
    error::Result,
    inputs::{DataYears, InputTables},
    scope::{Scope, ScopeMap},
    technology::Technology,
};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AbatementRow {
    pub start_year: Year,
    pub year: Year,
    pub from: Technology,
    pub to: Technology,
    pub base: ScopeMap<Emissions>,
    pub candidate: ScopeMap<Emissions>,

    /// Base emissions less the candidate ones.
    pub abated: ScopeMap<Emissions>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AbatementRecord {
    pub start_year: Year,
    pub from: Technology,
    pub to: Technology,
    pub abated: ScopeMap<Emissions>,
}

impl AbatementRecord {
    fn new(start_year: Year, from: Technology, to: Technology) -> Self {
        Self { start_year, from, to, abated: ScopeMap::default() }
    }

    fn accumulate(&mut self, row: &AbatementRow) {
        for scope in Scope::all() {
            self.abated[scope] += row.abated[scope];
        }
    }

    fn key(&self) -> (Year, &Technology, &Technology) {
        (self.start_year, &self.from, &self.to)
    }
}

#[derive(Builder)]
pub struct AbatementCalculator<'a> {
    tables: &'a InputTables,
    data_years: DataYears,
    horizon: u16,
}

impl AbatementCalculator<'_> {
    /// Yearly `(base, candidate)` emissions of a single scope.
    pub fn scope_detail(
        &self,
        from: &Technology,
        to: &Technology,
        start_year: Year,
        scope: Scope,
    ) -> Result<Vec<(Emissions, Emissions)>> {
        let series = &self.tables.emissions[scope];
        let base = series.horizon(from, start_year, self.horizon, self.data_years)?;
        let candidate = series.horizon(to, start_year, self.horizon, self.data_years)?;
        Ok(base.into_iter().zip(candidate).collect())
    }

    pub fn detail(
        &self,
        from: &Technology,
        to: &Technology,
        start_year: Year,
    ) -> Result<Vec<AbatementRow>> {
        let scopes =
            ScopeMap::try_from_fn(|scope| self.scope_detail(from, to, start_year, scope))?;
        Ok((0..usize::from(self.horizon))
            .zip(start_year..)
            .map(|(index, year)| {
                let base = scopes.as_ref().map(|_, values| values[index].0);
                let candidate = scopes.as_ref().map(|_, values| values[index].1);
                AbatementRow {
                    start_year,
                    year,
                    from: from.clone(),
                    to: to.clone(),
                    base,
                    candidate,
                    abated: ScopeMap::from_fn(|scope| base[scope] - candidate[scope]),
                }
            })
            .collect())
    }

    pub fn abatement(
        &self,
        from: &Technology,
        to: &Technology,
        start_year: Year,
    ) -> Result<AbatementRecord> {
        let mut record = AbatementRecord::new(start_year, from.clone(), to.clone());
        for row in self.detail(from, to, start_year)? {
            record.accumulate(&row);
        }
        Ok(record)
    }
}

/// Detailed rows and their `(start_year, from, to)` summary.
#[derive(Clone, Debug, Default, Serialize)]
pub struct AbatementTable {
    pub rows: Vec<AbatementRow>,

    /// Sorted by `(start_year, from, to)`.
    pub summary: Vec<AbatementRecord>,
}

impl FromIterator<(Vec<AbatementRow>, AbatementRecord)> for AbatementTable {
    fn from_iter<T: IntoIterator<Item = (Vec<AbatementRow>, AbatementRecord)>>(iter: T) -> Self {
        let mut table = Self::default();
        for (rows, record) in iter {
            table.rows.extend(rows);
            table.summary.push(record);
        }
        table.summary.sort_by(|lhs, rhs| lhs.key().cmp(&rhs.key()));
        table
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::{
        config::ModelConfig,
        error::{Error, Table},
        inputs::TechnologySeries,
        testing::reference_tables,
    };

    fn flat(scope: Scope, values: &[(&str, f64)]) -> TechnologySeries<Emissions> {
        let rows = values.iter().flat_map(|(technology, value)| {
            (2020..=2050).map(|year| (Technology::from(*technology), year, Emissions::new(*value)))
        });
        TechnologySeries::try_from_rows(Table::Emissions(scope), rows).unwrap()
    }

    #[test]
    fn test_flat_scope_1() -> anyhow::Result<()> {
        let config = ModelConfig::reference()?;
        let mut tables = reference_tables(&config);
        tables.emissions.s1 = flat(Scope::S1, &[("X", 2.0), ("Y", 1.2)]);
        tables.emissions.s2 = flat(Scope::S2, &[("X", 0.5), ("Y", 0.5)]);
        tables.emissions.s3 = flat(Scope::S3, &[("X", 0.1), ("Y", 0.3)]);
        let calculator = AbatementCalculator::builder()
            .tables(&tables)
            .data_years(config.data_years)
            .horizon(20)
            .build();

        let record = calculator.abatement(&Technology::from("X"), &Technology::from("Y"), 2020)?;
        assert_abs_diff_eq!(record.abated.s1.get(), 16.0, epsilon = 1e-9);
        assert_abs_diff_eq!(record.abated.s2.get(), 0.0);
        assert_abs_diff_eq!(record.abated.s3.get(), -4.0, epsilon = 1e-9);

        // Past the last data year the values are carried forward.
        let rows = calculator.detail(&Technology::from("X"), &Technology::from("Y"), 2045)?;
        assert_eq!(rows.len(), 20);
        assert_eq!(rows[19].year, 2064);
        assert_eq!(rows[19].base.s1, Emissions::new(2.0));
        assert_abs_diff_eq!(rows[19].abated.s1.get(), 0.8, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_summary_is_sum_of_rows() -> anyhow::Result<()> {
        let config = ModelConfig::reference()?;
        let tables = reference_tables(&config);
        let calculator = AbatementCalculator::builder()
            .tables(&tables)
            .data_years(config.data_years)
            .horizon(10)
            .build();
        let from = Technology::from("Avg BF-BOF");
        let mut items = Vec::new();
        for to in ["EAF", "DRI-EAF"] {
            let to = Technology::from(to);
            items.push((
                calculator.detail(&from, &to, 2030)?,
                calculator.abatement(&from, &to, 2030)?,
            ));
        }
        let table: AbatementTable = items.into_iter().collect();
        assert_eq!(table.rows.len(), 20);
        assert_eq!(table.summary.len(), 2);
        assert_eq!(table.summary[0].to, Technology::from("DRI-EAF"));
        for record in &table.summary {
            let mut abated = ScopeMap::<Emissions>::default();
            for row in table.rows.iter().filter(|row| row.to == record.to) {
                for scope in Scope::all() {
                    abated[scope] += row.abated[scope];
                }
            }
            assert_eq!(record.abated, abated);
        }
        Ok(())
    }

    #[test]
    fn test_missing_emissions_are_named() -> anyhow::Result<()> {
        let config = ModelConfig::reference()?;
        let mut tables = reference_tables(&config);
        tables.emissions.s3 = flat(Scope::S3, &[("EAF", 0.1)]);
        let calculator = AbatementCalculator::builder()
            .tables(&tables)
            .data_years(config.data_years)
            .horizon(20)
            .build();
        let error = calculator
            .detail(&Technology::from("EAF"), &Technology::from("DRI-EAF"), 2020)
            .unwrap_err();
        assert!(matches!(
            error,
            Error::DataIntegrity { table: Table::Emissions(Scope::S3), year: 2020, .. },
        ));
        Ok(())
    }
}
