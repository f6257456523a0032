use clap::Parser;
use furnace_quantities::cost::Cost;

use crate::{
    cli::model::OutputArgs,
    core::finance::{Compounding, FinancialSchedule},
    fmt::FormattedPercentage,
    prelude::*,
    tables::{build_schedule_summary_table, build_schedule_table},
};

#[derive(Parser)]
pub struct AmortizeArgs {
    /// Capex to borrow.
    #[clap(long)]
    principal: f64,

    /// Yearly interest rate.
    #[clap(long, env = "DISCOUNT_RATE", default_value = "0.07")]
    rate: f64,

    /// Loan term in years.
    #[clap(long, default_value = "20")]
    years: u16,

    #[clap(long, default_value = "annual")]
    compounding: Compounding,

    /// Periodic payment for the future value, interest-only if omitted.
    #[clap(long)]
    downpayment: Option<f64>,

    /// Dump JSON to the standard output instead of the tables.
    #[clap(long)]
    json: bool,
}

impl AmortizeArgs {
    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        info!(
            principal = self.principal,
            rate = ?FormattedPercentage(self.rate),
            self.years,
            %self.compounding,
            "amortizing…",
        );
        let schedule = FinancialSchedule::amortize()
            .principal(Cost::new(self.principal))
            .rate(self.rate)
            .term_years(self.years)
            .compounding(self.compounding)
            .maybe_downpayment(self.downpayment.map(Cost::new))
            .call()?;

        if self.json {
            return OutputArgs::dump_json(&schedule);
        }
        println!("{}", build_schedule_table(&schedule));
        println!("{}", build_schedule_summary_table(&schedule));
        Ok(())
    }
}
