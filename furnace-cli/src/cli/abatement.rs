use clap::Parser;

use crate::{
    cli::model::{ModelArgs, OutputArgs},
    core::engine::Engine,
    prelude::*,
    tables::{build_abatement_rows_table, build_abatement_summary_table},
};

#[derive(Parser)]
pub struct AbatementArgs {
    #[clap(flatten)]
    model: ModelArgs,

    #[clap(flatten)]
    output: OutputArgs,
}

impl AbatementArgs {
    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        let (config, inputs, parameters) = self.model.load()?;
        let table = Engine::builder()
            .config(&config)
            .inputs(&inputs)
            .parameters(parameters)
            .build()
            .abatement_table()?;

        if self.output.json {
            if self.output.detailed {
                OutputArgs::dump_json(&table)?;
            } else {
                OutputArgs::dump_json(&table.summary)?;
            }
        } else {
            if self.output.detailed {
                println!("{}", build_abatement_rows_table(&table.rows));
            }
            println!("{}", build_abatement_summary_table(&table.summary));
        }
        Ok(())
    }
}
