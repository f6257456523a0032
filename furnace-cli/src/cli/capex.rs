use clap::Parser;
use itertools::Itertools;

use crate::{
    cli::model::{ModelArgs, OutputArgs},
    core::{Year, engine::Engine},
    prelude::*,
    tables::build_capex_table,
};

#[derive(Parser)]
pub struct CapexArgs {
    #[clap(flatten)]
    model: ModelArgs,

    /// Only show this year, all the run years otherwise.
    #[clap(long)]
    year: Option<Year>,

    /// Dump JSON to the standard output instead of the table.
    #[clap(long)]
    json: bool,
}

impl CapexArgs {
    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        let (config, inputs, parameters) = self.model.load()?;
        if let Some(year) = self.year {
            ensure!(
                parameters.years().contains(&year),
                "{year} is outside of the run years {}..={}",
                parameters.start_year,
                parameters.end_year,
            );
        }
        let matrix = Engine::builder()
            .config(&config)
            .inputs(&inputs)
            .parameters(parameters)
            .build()
            .capex_matrix()?;
        let year = self.year.map(|year| config.data_years.clamp(year));
        let values = matrix
            .values()
            .filter(|value| year.is_none_or(|year| value.year == year))
            .collect_vec();
        info!(n_values = values.len(), "built");

        if self.json {
            OutputArgs::dump_json(&values)?;
        } else {
            println!("{}", build_capex_table(&values));
        }
        Ok(())
    }
}
