//! Loan amortization and discounting.

use bon::bon;
use furnace_quantities::cost::Cost;
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    clap::ValueEnum,
    Deserialize,
    Serialize,
    derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum Compounding {
    #[default]
    #[display("annual")]
    Annual,

    #[display("semi-annual")]
    SemiAnnual,

    #[display("monthly")]
    Monthly,
}

impl Compounding {
    #[must_use]
    pub const fn periods_per_year(self) -> u16 {
        match self {
            Self::Annual => 1,
            Self::SemiAnnual => 2,
            Self::Monthly => 12,
        }
    }
}

/// Fully amortizing loan of the capex principal.
///
/// The payment and the schedules are per compounding period,
/// so there are `term_years × periods_per_year` entries in each schedule.
#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct FinancialSchedule {
    /// Outstanding balance after the interest-only (or downpayment) stream.
    pub future_value: Cost,

    /// Annuity payment per period, positive.
    pub annual_payment: Cost,

    pub total_interest: Cost,
    pub principal_schedule: Vec<Cost>,
    pub interest_schedule: Vec<Cost>,
}

#[bon]
impl FinancialSchedule {
    #[builder]
    pub fn amortize(
        principal: Cost,
        rate: f64,
        term_years: u16,
        #[builder(default)] compounding: Compounding,
        downpayment: Option<Cost>,
    ) -> Result<Self> {
        ensure_rate(rate)?;
        if !principal.is_finite() {
            return Err(Error::Computation(format!("principal is not finite: {principal:?}")));
        }
        if term_years == 0 {
            return Err(Error::Computation("zero amortization term".to_string()));
        }

        let n_periods = u32::from(term_years) * u32::from(compounding.periods_per_year());
        let rate = rate / f64::from(compounding.periods_per_year());
        let growth = (1.0 + rate).powi(i32::try_from(n_periods).map_err(|_| {
            Error::Computation(format!("amortization term is too long: {n_periods} periods"))
        })?);

        let annual_payment = if rate == 0.0 {
            principal / f64::from(n_periods)
        } else {
            principal * (rate * growth / (growth - 1.0))
        };

        let mut balance = principal;
        let mut principal_schedule = Vec::with_capacity(n_periods as usize);
        let mut interest_schedule = Vec::with_capacity(n_periods as usize);
        for _ in 0..n_periods {
            let interest = balance * rate;
            let repayment = annual_payment - interest;
            balance -= repayment;
            interest_schedule.push(interest);
            principal_schedule.push(repayment);
        }

        // A zero downpayment means none.
        let payment = downpayment
            .filter(|downpayment| *downpayment != Cost::ZERO)
            .unwrap_or(principal * rate);
        let future_value = if rate == 0.0 {
            principal - payment * f64::from(n_periods)
        } else {
            principal * growth - payment * ((growth - 1.0) / rate)
        };

        Ok(Self {
            future_value,
            annual_payment,
            total_interest: interest_schedule.iter().copied().sum(),
            principal_schedule,
            interest_schedule,
        })
    }
}

/// Discount the yearly values to the first one: `PV(k) = value(k) / (1 + rate)^k`.
pub fn present_values(values: impl IntoIterator<Item = Cost>, rate: f64) -> Result<Vec<Cost>> {
    ensure_rate(rate)?;
    let mut factor = 1.0;
    Ok(values
        .into_iter()
        .map(|value| {
            let present_value = value / factor;
            factor *= 1.0 + rate;
            present_value
        })
        .collect())
}

fn ensure_rate(rate: f64) -> Result {
    if rate.is_finite() && rate > -1.0 {
        Ok(())
    } else {
        Err(Error::Computation(format!("undefined for the interest rate {rate}")))
    }
}
