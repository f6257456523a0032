//! Model loading arguments shared by the subcommands.

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use clap::Parser;
use serde::Serialize;

use crate::{
    core::{
        Year,
        config::ModelConfig,
        inputs::{InputBundle, InputTables},
        parameters::ModelParameters,
    },
    fmt::FormattedPercentage,
    prelude::*,
};

#[must_use]
#[derive(Parser)]
pub struct ConfigArgs {
    /// Technology model TOML, the built-in reference model if omitted.
    #[clap(long, env = "FURNACE_CONFIG")]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    #[instrument(skip_all)]
    pub fn load(&self) -> Result<ModelConfig> {
        let Some(path) = &self.config else {
            info!("using the reference model");
            return ModelConfig::reference().context("failed to load the reference model");
        };
        info!(?path, "reading the model…");
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        ModelConfig::from_toml(&text)
            .with_context(|| format!("failed to load the model from `{}`", path.display()))
    }
}

#[must_use]
#[derive(Parser)]
pub struct InputArgs {
    /// JSON bundle with the capex, opex, variable cost, and emissions tables.
    #[clap(long, env = "FURNACE_INPUTS")]
    pub inputs: PathBuf,
}

impl InputArgs {
    #[instrument(skip_all)]
    pub fn load(&self) -> Result<InputTables> {
        info!(path = ?self.inputs, "reading the inputs…");
        let file = fs::File::open(&self.inputs)
            .with_context(|| format!("failed to open `{}`", self.inputs.display()))?;
        let bundle: InputBundle = serde_json::from_reader(io::BufReader::new(file))
            .with_context(|| format!("failed to parse `{}`", self.inputs.display()))?;
        info!(
            n_capex_rows = bundle.capex.len(),
            n_other_opex_rows = bundle.other_opex.len(),
            n_variable_cost_rows = bundle.variable_costs.len(),
            has_s1_corrections = bundle.s1_corrections.is_some(),
            "parsed",
        );
        Ok(InputTables::try_from(bundle)?)
    }
}

#[must_use]
#[derive(Parser)]
pub struct ParameterArgs {
    /// Yearly discount rate, also the capex loan interest rate.
    #[clap(long, env = "DISCOUNT_RATE", default_value = "0.07")]
    pub discount_rate: f64,

    /// Investment horizon in years.
    #[clap(long = "horizon", env = "INVESTMENT_HORIZON", default_value = "20")]
    pub horizon: u16,

    /// First switch year.
    #[clap(long, env = "START_YEAR", default_value = "2020")]
    pub start_year: Year,

    /// Last switch year, inclusive.
    #[clap(long, env = "END_YEAR", default_value = "2050")]
    pub end_year: Year,

    /// Leave out the reinvestment (no technology change) switches.
    #[clap(long)]
    pub exclude_self_loops: bool,
}

impl ParameterArgs {
    pub fn parameters(&self) -> Result<ModelParameters> {
        let parameters = ModelParameters::builder()
            .discount_rate(self.discount_rate)
            .horizon(self.horizon)
            .start_year(self.start_year)
            .end_year(self.end_year)
            .exclude_self_loops(self.exclude_self_loops)
            .build();
        parameters.validate()?;
        info!(
            discount_rate = ?FormattedPercentage(parameters.discount_rate),
            parameters.horizon,
            parameters.start_year,
            parameters.end_year,
            "parameters",
        );
        Ok(parameters)
    }
}

/// Everything the engine needs.
#[must_use]
#[derive(Parser)]
pub struct ModelArgs {
    #[clap(flatten)]
    pub config: ConfigArgs,

    #[clap(flatten)]
    pub inputs: InputArgs,

    #[clap(flatten)]
    pub parameters: ParameterArgs,
}

impl ModelArgs {
    pub fn load(&self) -> Result<(ModelConfig, InputTables, ModelParameters)> {
        Ok((self.config.load()?, self.inputs.load()?, self.parameters.parameters()?))
    }
}

#[must_use]
#[derive(Parser)]
pub struct OutputArgs {
    /// Also output the per-year rows.
    #[clap(long)]
    pub detailed: bool,

    /// Dump JSON to the standard output instead of the tables.
    #[clap(long)]
    pub json: bool,
}

impl OutputArgs {
    pub fn dump_json<T: Serialize>(value: &T) -> Result {
        let mut stdout = io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, value).context("failed to write the JSON")?;
        writeln!(stdout)?;
        Ok(())
    }
}
