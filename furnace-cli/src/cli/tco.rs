use clap::Parser;

use crate::{
    cli::model::{ModelArgs, OutputArgs},
    core::engine::Engine,
    prelude::*,
    tables::{build_tco_rows_table, build_tco_summary_table},
};

#[derive(Parser)]
pub struct TcoArgs {
    #[clap(flatten)]
    model: ModelArgs,

    #[clap(flatten)]
    output: OutputArgs,
}

impl TcoArgs {
    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        let (config, inputs, parameters) = self.model.load()?;
        let table = Engine::builder()
            .config(&config)
            .inputs(&inputs)
            .parameters(parameters)
            .build()
            .tco_table()?;

        if self.output.json {
            if self.output.detailed {
                OutputArgs::dump_json(&table)?;
            } else {
                OutputArgs::dump_json(&table.summary)?;
            }
        } else {
            if self.output.detailed {
                println!("{}", build_tco_rows_table(&table.rows));
            }
            println!("{}", build_tco_summary_table(&table.summary));
        }
        Ok(())
    }
}
