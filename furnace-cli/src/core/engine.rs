//! Switching economics over the whole switch graph.

use std::{ops::RangeInclusive, time::Instant};

use bon::Builder;
use rayon::prelude::*;
use tracing::{info, instrument};

use crate::core::{
    Year,
    abatement::{AbatementCalculator, AbatementTable},
    capex::{CapexMatrix, CapexSwitching},
    config::ModelConfig,
    error::Result,
    inputs::InputTables,
    parameters::ModelParameters,
    tco::{TcoCalculator, TcoTable},
    technology::{Target, Technology},
};

/// Independent unit of work: a technology change starting in the given year.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct WorkItem<'a> {
    pub start_year: Year,
    pub from: &'a Technology,
    pub to: &'a Technology,
}

#[derive(Builder)]
pub struct Engine<'a> {
    config: &'a ModelConfig,
    inputs: &'a InputTables,

    #[builder(default)]
    parameters: ModelParameters,
}

impl Engine<'_> {
    /// Enumerate the start years and the graph edges, the closures left out.
    pub fn work_items(&self) -> Result<Vec<WorkItem<'_>>> {
        self.parameters.validate()?;
        let mut work_items = Vec::new();
        for start_year in self.parameters.years() {
            for technology in self.config.graph.technologies() {
                for target in self.config.graph.edges_for(technology)? {
                    let Target::Technology(to) = target else {
                        continue;
                    };
                    if self.parameters.exclude_self_loops && to == technology {
                        continue;
                    }
                    work_items.push(WorkItem { start_year, from: technology, to });
                }
            }
        }
        Ok(work_items)
    }

    /// Years the capex switch matrix covers: the run years frozen at the last data year.
    fn capex_years(&self) -> RangeInclusive<Year> {
        let data_years = self.config.data_years;
        data_years.clamp(self.parameters.start_year)..=data_years.clamp(self.parameters.end_year)
    }

    #[instrument(skip_all)]
    pub fn capex_matrix(&self) -> Result<CapexMatrix> {
        self.parameters.validate()?;
        CapexSwitching::builder()
            .config(self.config)
            .capex(&self.inputs.capex)
            .build()
            .matrix(self.capex_years())
    }

    #[instrument(skip_all)]
    pub fn tco_table(&self) -> Result<TcoTable> {
        let capex_matrix = self.capex_matrix()?;
        let work_items = self.work_items()?;
        let calculator = TcoCalculator::builder()
            .tables(self.inputs)
            .data_years(self.config.data_years)
            .parameters(&self.parameters)
            .build();

        info!(
            n_work_items = work_items.len(),
            discount_rate = self.parameters.discount_rate,
            horizon = self.parameters.horizon,
            "calculating the TCO…",
        );
        let start_time = Instant::now();
        let table = work_items
            .into_par_iter()
            .map(|item| {
                let to = Target::from(item.to.clone());
                let capex_year = self.config.data_years.clamp(item.start_year);
                let capex_switch = capex_matrix.get(capex_year, item.from, &to)?;
                let rows = calculator.detail(item.from, item.to, item.start_year, capex_switch);
                let record = calculator.tco(item.from, item.to, item.start_year, capex_switch);
                rows.and_then(|rows| record.map(|record| (rows, record)))
                    .map_err(|error| error.in_switch(item.from, &to, item.start_year))
            })
            .collect::<Vec<Result<_>>>()
            .into_iter()
            .collect::<Result<TcoTable>>()?;
        info!(
            elapsed = ?start_time.elapsed(),
            n_rows = table.rows.len(),
            n_records = table.summary.len(),
            "calculated",
        );
        Ok(table)
    }

    #[instrument(skip_all)]
    pub fn abatement_table(&self) -> Result<AbatementTable> {
        let work_items = self.work_items()?;
        let calculator = AbatementCalculator::builder()
            .tables(self.inputs)
            .data_years(self.config.data_years)
            .horizon(self.parameters.horizon)
            .build();

        info!(n_work_items = work_items.len(), "calculating the emissions abatement…");
        let start_time = Instant::now();
        let table = work_items
            .into_par_iter()
            .map(|item| {
                let rows = calculator.detail(item.from, item.to, item.start_year);
                let record = calculator.abatement(item.from, item.to, item.start_year);
                rows.and_then(|rows| record.map(|record| (rows, record))).map_err(|error| {
                    error.in_switch(item.from, &Target::from(item.to.clone()), item.start_year)
                })
            })
            .collect::<Vec<Result<_>>>()
            .into_iter()
            .collect::<Result<AbatementTable>>()?;
        info!(
            elapsed = ?start_time.elapsed(),
            n_rows = table.rows.len(),
            n_records = table.summary.len(),
            "calculated",
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use furnace_quantities::{cost::Cost, emissions::Emissions};

    use super::*;
    use crate::core::{error::Error, testing::reference_tables};

    fn parameters(start_year: Year, end_year: Year) -> ModelParameters {
        ModelParameters::builder().start_year(start_year).end_year(end_year).build()
    }

    #[test]
    fn test_closures_are_excluded() -> anyhow::Result<()> {
        let config = ModelConfig::reference()?;
        let tables = reference_tables(&config);
        let engine = Engine::builder()
            .config(&config)
            .inputs(&tables)
            .parameters(parameters(2020, 2021))
            .build();
        let n_closures = config.graph.technologies().count();
        let work_items = engine.work_items()?;
        assert_eq!(work_items.len(), 2 * (config.graph.n_edges() - n_closures));

        let tco = engine.tco_table()?;
        assert_eq!(tco.summary.len(), work_items.len());
        assert_eq!(tco.rows.len(), 20 * work_items.len());
        let abatement = engine.abatement_table()?;
        assert_eq!(abatement.summary.len(), work_items.len());
        Ok(())
    }

    #[test]
    fn test_exclude_self_loops() -> anyhow::Result<()> {
        let config = ModelConfig::reference()?;
        let tables = reference_tables(&config);
        let parameters = ModelParameters::builder()
            .start_year(2020)
            .end_year(2020)
            .exclude_self_loops(true)
            .build();
        let engine =
            Engine::builder().config(&config).inputs(&tables).parameters(parameters).build();
        let work_items = engine.work_items()?;
        assert_eq!(
            work_items.len(),
            config.graph.n_edges() - 2 * config.graph.technologies().count(),
        );
        assert!(work_items.iter().all(|item| item.from != item.to));
        Ok(())
    }

    #[test]
    fn test_summary_is_sum_of_rows() -> anyhow::Result<()> {
        let config = ModelConfig::reference()?;
        let tables = reference_tables(&config);
        let engine = Engine::builder()
            .config(&config)
            .inputs(&tables)
            .parameters(parameters(2049, 2050))
            .build();
        let table = engine.tco_table()?;
        for record in &table.summary {
            let (mut other_opex, mut variable_opex, mut annual_capex, mut tco) =
                (Cost::ZERO, Cost::ZERO, Cost::ZERO, Cost::ZERO);
            let key = (record.start_year, &record.from, &record.to);
            for row in table.rows.iter().filter(|row| (row.start_year, &row.from, &row.to) == key) {
                other_opex += row.other_opex;
                variable_opex += row.variable_opex;
                annual_capex += row.annual_capex;
                tco += row.tco;
            }
            assert_eq!(record.other_opex_pv, other_opex);
            assert_eq!(record.variable_opex_pv, variable_opex);
            assert_eq!(record.annual_capex_pv, annual_capex);
            assert_eq!(record.tco, tco);
        }

        let abatement = engine.abatement_table()?;
        for record in &abatement.summary {
            let key = (record.start_year, &record.from, &record.to);
            let mut s1 = Emissions::ZERO;
            for row in
                abatement.rows.iter().filter(|row| (row.start_year, &row.from, &row.to) == key)
            {
                s1 += row.abated.s1;
            }
            assert_eq!(record.abated.s1, s1);
        }
        Ok(())
    }

    #[test]
    fn test_capex_frozen_past_data_years() -> anyhow::Result<()> {
        let config = ModelConfig::reference()?;
        let tables = reference_tables(&config);
        let engine = Engine::builder()
            .config(&config)
            .inputs(&tables)
            .parameters(parameters(2050, 2052))
            .build();
        assert_eq!(engine.capex_matrix()?.values().count(), config.graph.n_edges());

        let table = engine.tco_table()?;
        let capex_pv = |start_year| {
            table
                .summary
                .iter()
                .find(|record| {
                    record.start_year == start_year
                        && record.from.as_str() == "DRI-EAF"
                        && record.to.as_str() == "Electrolyzer-EAF"
                })
                .map(|record| record.annual_capex_pv.get())
        };
        let last = capex_pv(2050).unwrap();
        assert!(last < 0.0);
        assert_abs_diff_eq!(capex_pv(2051).unwrap(), last);
        assert_abs_diff_eq!(capex_pv(2052).unwrap(), last);
        Ok(())
    }

    #[test]
    fn test_missing_data_names_the_switch() -> anyhow::Result<()> {
        let config = ModelConfig::reference()?;
        let tables = reference_tables(&config);
        let engine = Engine::builder()
            .config(&config)
            .inputs(&tables)
            .parameters(parameters(2019, 2020))
            .build();
        assert!(matches!(engine.tco_table(), Err(Error::Switch { year: 2019, .. })));
        assert!(matches!(engine.abatement_table(), Err(Error::Switch { year: 2019, .. })));
        Ok(())
    }

    #[test]
    fn test_first_failing_work_item_is_reported() -> anyhow::Result<()> {
        let config = ModelConfig::reference()?;
        let tables = reference_tables(&config);
        let engine = Engine::builder()
            .config(&config)
            .inputs(&tables)
            .parameters(parameters(2018, 2019))
            .build();
        let first = engine.work_items()?[0];
        for _ in 0..5 {
            let Err(Error::Switch { from, to, year, .. }) = engine.abatement_table() else {
                panic!("the abatement table must fail before 2020");
            };
            assert_eq!((&from, to, year), (first.from, Target::from(first.to.clone()), 2018));
        }
        Ok(())
    }
}
