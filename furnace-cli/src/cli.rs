mod abatement;
mod amortize;
mod capex;
mod graph;
mod model;
mod tco;

use clap::{Parser, Subcommand};

use crate::cli::{
    abatement::AbatementArgs,
    amortize::AmortizeArgs,
    capex::CapexArgs,
    graph::GraphArgs,
    tco::TcoArgs,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Discounted total cost of ownership of every switch.
    #[clap(name = "tco")]
    Tco(Box<TcoArgs>),

    /// Scope 1, 2, and 3 emissions abated by every switch.
    #[clap(name = "abatement")]
    Abatement(Box<AbatementArgs>),

    /// Capex required to execute every switch.
    #[clap(name = "capex")]
    Capex(Box<CapexArgs>),

    /// Amortization schedule of a single capex loan.
    #[clap(name = "amortize")]
    Amortize(Box<AmortizeArgs>),

    /// Switch graph with the capex formula of each edge.
    #[clap(name = "graph")]
    Graph(Box<GraphArgs>),
}

impl Command {
    pub fn run(self) -> crate::prelude::Result {
        match self {
            Self::Tco(args) => args.run(),
            Self::Abatement(args) => args.run(),
            Self::Capex(args) => args.run(),
            Self::Amortize(args) => args.run(),
            Self::Graph(args) => args.run(),
        }
    }
}
