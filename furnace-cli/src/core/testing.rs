//! Synthetic tables for the unit tests.

use furnace_quantities::{cost::Cost, emissions::Emissions};

use crate::core::{
    Year,
    config::ModelConfig,
    error::Table,
    inputs::{CapexValues, InputTables, TechnologySeries},
    scope::{Scope, ScopeMap},
    technology::Technology,
};

fn rows<V>(
    config: &ModelConfig,
    mut value: impl FnMut(usize, &Technology, Year) -> V,
) -> Vec<(Technology, Year, V)> {
    config
        .catalog
        .iter()
        .enumerate()
        .flat_map(|(index, (technology, _))| {
            (config.data_years.first..=config.data_years.last).map(move |year| (index, technology.clone(), year))
        })
        .map(|(index, technology, year)| {
            let value = value(index, &technology, year);
            (technology, year, value)
        })
        .collect()
}

/// Capex falling by one unit per year, distinct per technology.
pub fn reference_capex(config: &ModelConfig) -> TechnologySeries<CapexValues> {
    let rows = rows(config, |index, _, year| {
        let greenfield = 600.0 + 25.0 * index as f64 - f64::from(year - 2020);
        CapexValues { greenfield: Cost::new(greenfield), brownfield: Cost::new(0.4 * greenfield) }
    });
    TechnologySeries::try_from_rows(Table::Capex, rows).unwrap()
}

/// Full tables for the reference catalog, scope 1 emissions falling with the catalog order.
pub fn reference_tables(config: &ModelConfig) -> InputTables {
    let cost = |table, base: f64| {
        let rows = rows(config, |index, _, _| Cost::new(base + index as f64));
        TechnologySeries::try_from_rows(table, rows).unwrap()
    };
    let emissions = ScopeMap::from_fn(|scope| {
        let rows = rows(config, |index, _, _| match scope {
            Scope::S1 => Emissions::new(2.0 - 0.05 * index as f64),
            Scope::S2 => Emissions::new(0.1),
            Scope::S3 => Emissions::new(0.01 * index as f64),
        });
        TechnologySeries::try_from_rows(Table::Emissions(scope), rows).unwrap()
    });
    InputTables {
        capex: reference_capex(config),
        other_opex: cost(Table::OtherOpex, 50.0),
        variable_costs: cost(Table::VariableCosts, 300.0),
        emissions,
    }
}
