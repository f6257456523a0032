use clap::Parser;

use crate::{cli::model::ConfigArgs, prelude::*, tables::build_graph_table};

#[derive(Parser)]
pub struct GraphArgs {
    #[clap(flatten)]
    config: ConfigArgs,
}

impl GraphArgs {
    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        let config = self.config.load()?;
        info!(
            n_technologies = config.catalog.len(),
            n_edges = config.graph.n_edges(),
            "loaded",
        );
        for (kind, count) in config.graph.count_by_kind() {
            info!(?kind, count, "edges");
        }
        println!("{}", build_graph_table(&config));
        Ok(())
    }
}
