pub mod formula;
pub mod rules;

use std::{collections::BTreeMap, ops::RangeInclusive, time::Instant};

use bon::Builder;
use furnace_quantities::cost::Cost;
use itertools::Itertools;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, instrument};

use crate::core::{
    Year,
    config::ModelConfig,
    error::{Error, Result, Table},
    inputs::{CapexValues, TechnologySeries},
    technology::{Target, Technology},
};

/// Capex required to execute a switch in the given year.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CapexSwitchValue {
    pub year: Year,
    pub from: Technology,
    pub to: Target,
    pub value: Cost,
}

#[derive(Builder)]
pub struct CapexSwitching<'a> {
    config: &'a ModelConfig,
    capex: &'a TechnologySeries<CapexValues>,
}

impl CapexSwitching<'_> {
    pub fn value(&self, from: &Technology, to: &Target, year: Year) -> Result<Cost> {
        self.config
            .rules
            .resolve(&self.config.catalog, from, to)
            .and_then(|formula| formula.evaluate(year, self.capex, &self.config.rules.legacy_curve))
            .map_err(|error| error.in_switch(from, to, year))
    }

    /// Evaluate every switch graph edge for every year.
    #[instrument(skip_all)]
    pub fn matrix(&self, years: RangeInclusive<Year>) -> Result<CapexMatrix> {
        let start_time = Instant::now();
        let work_items = years
            .cartesian_product(self.config.graph.edges().collect_vec())
            .collect_vec();
        info!(n_work_items = work_items.len(), "building the capex switch matrix…");

        let values = work_items
            .into_par_iter()
            .map(|(year, edge)| {
                Ok(CapexSwitchValue {
                    year,
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    value: self.value(edge.from, edge.to, year)?,
                })
            })
            .collect::<Vec<Result<_>>>()
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        info!(elapsed = ?start_time.elapsed(), "built");
        Ok(values.into_iter().collect())
    }
}

/// Materialized capex switch values.
#[derive(Clone, Debug, Default)]
pub struct CapexMatrix(BTreeMap<(Year, Technology, Target), Cost>);

impl CapexMatrix {
    pub fn get(&self, year: Year, from: &Technology, to: &Target) -> Result<Cost> {
        self.0.get(&(year, from.clone(), to.clone())).copied().ok_or_else(|| {
            Error::DataIntegrity { table: Table::CapexSwitch, technology: from.clone(), year }
                .in_switch(from, to, year)
        })
    }

    pub fn values(&self) -> impl Iterator<Item = CapexSwitchValue> + '_ {
        self.0.iter().map(|((year, from, to), value)| CapexSwitchValue {
            year: *year,
            from: from.clone(),
            to: to.clone(),
            value: *value,
        })
    }
}

impl FromIterator<CapexSwitchValue> for CapexMatrix {
    fn from_iter<T: IntoIterator<Item = CapexSwitchValue>>(iter: T) -> Self {
        Self(iter.into_iter().map(|value| ((value.year, value.from, value.to), value.value)).collect())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::testing::reference_capex;

    #[test]
    fn test_self_loops_cost_brownfield() -> anyhow::Result<()> {
        let config = ModelConfig::reference()?;
        let capex = reference_capex(&config);
        let switching = CapexSwitching::builder().config(&config).capex(&capex).build();
        for technology in config.graph.technologies() {
            for year in [2020, 2035, 2050] {
                assert_eq!(
                    switching.value(technology, &Target::from(technology.clone()), year)?,
                    capex.get(technology, year)?.brownfield,
                );
            }
        }
        Ok(())
    }

    #[test]
    fn test_closure_costs_greenfield_share() -> anyhow::Result<()> {
        let config = ModelConfig::reference()?;
        let capex = reference_capex(&config);
        let switching = CapexSwitching::builder().config(&config).capex(&capex).build();
        for technology in config.graph.technologies() {
            let value = switching.value(technology, &Target::ClosePlant, 2030)?;
            assert_abs_diff_eq!(value.get(), 0.05 * capex.get(technology, 2030)?.greenfield.get());
        }
        Ok(())
    }

    #[test]
    fn test_brownfield_plus_delta() -> anyhow::Result<()> {
        let config = ModelConfig::reference()?;
        let capex = reference_capex(&config);
        let switching = CapexSwitching::builder().config(&config).capex(&capex).build();
        let average = Technology::from("Avg BF-BOF");
        let baseline = Technology::from("BAT BF-BOF");
        let ccus = Technology::from("BAT BF-BOF+CCUS");
        let expected = capex.get(&baseline, 2025)?.brownfield + capex.get(&ccus, 2025)?.greenfield
            - capex.get(&average, 2025)?.greenfield;
        assert_eq!(switching.value(&average, &Target::from(ccus), 2025)?, expected);
        Ok(())
    }

    #[test]
    fn test_missing_capex_names_the_switch() -> anyhow::Result<()> {
        let config = ModelConfig::reference()?;
        let capex = TechnologySeries::try_from_rows(Table::Capex, Vec::new())?;
        let switching = CapexSwitching::builder().config(&config).capex(&capex).build();
        let error = switching
            .value(&Technology::from("EAF"), &Target::from("EAF"), 2020)
            .unwrap_err();
        let Error::Switch { from, to, year, source } = error else {
            panic!("unexpected error: {error}");
        };
        assert_eq!((from.as_str(), to, year), ("EAF", Target::from("EAF"), 2020));
        assert!(matches!(*source, Error::DataIntegrity { table: Table::Capex, year: 2020, .. }));
        Ok(())
    }

    #[test]
    fn test_matrix_covers_every_edge_and_year() -> anyhow::Result<()> {
        let config = ModelConfig::reference()?;
        let capex = reference_capex(&config);
        let matrix =
            CapexSwitching::builder().config(&config).capex(&capex).build().matrix(2020..=2022)?;
        assert_eq!(matrix.values().count(), 3 * config.graph.n_edges());
        let from = Technology::from("DRI-EAF");
        assert!(matrix.get(2021, &from, &Target::ClosePlant).is_ok());
        assert!(matches!(
            matrix.get(2023, &from, &Target::ClosePlant),
            Err(Error::Switch { year: 2023, .. }),
        ));
        Ok(())
    }
}
