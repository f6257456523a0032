//! Discounted total cost of ownership of a switch.

use bon::Builder;
use furnace_quantities::cost::Cost;
use itertools::izip;
use serde::Serialize;

use crate::core::{
    Year,
    error::Result,
    finance::{FinancialSchedule, present_values},
    inputs::{DataYears, InputTables},
    parameters::ModelParameters,
    technology::Technology,
};

/// Single horizon year of a switch, all values discounted to the start year.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TcoRow {
    pub start_year: Year,
    pub year: Year,
    pub from: Technology,
    pub to: Technology,
    pub other_opex: Cost,
    pub variable_opex: Cost,

    /// Discounted annuity payment, negative as an outflow.
    pub annual_capex: Cost,

    pub tco: Cost,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TcoRecord {
    pub start_year: Year,
    pub from: Technology,
    pub to: Technology,
    pub other_opex_pv: Cost,
    pub variable_opex_pv: Cost,
    pub annual_capex_pv: Cost,
    pub tco: Cost,
}

impl TcoRecord {
    fn new(start_year: Year, from: Technology, to: Technology) -> Self {
        Self {
            start_year,
            from,
            to,
            other_opex_pv: Cost::ZERO,
            variable_opex_pv: Cost::ZERO,
            annual_capex_pv: Cost::ZERO,
            tco: Cost::ZERO,
        }
    }

    fn accumulate(&mut self, row: &TcoRow) {
        self.other_opex_pv += row.other_opex;
        self.variable_opex_pv += row.variable_opex;
        self.annual_capex_pv += row.annual_capex;
        self.tco += row.tco;
    }

    fn key(&self) -> (Year, &Technology, &Technology) {
        (self.start_year, &self.from, &self.to)
    }
}

#[derive(Builder)]
pub struct TcoCalculator<'a> {
    tables: &'a InputTables,
    data_years: DataYears,
    parameters: &'a ModelParameters,
}

impl TcoCalculator<'_> {
    /// Discounted yearly cash flows of switching `from` → `to` in `start_year`.
    ///
    /// `capex_switch` is the capex switch value at the start year, it is not re-evaluated
    /// for the later years.
    pub fn detail(
        &self,
        from: &Technology,
        to: &Technology,
        start_year: Year,
        capex_switch: Cost,
    ) -> Result<Vec<TcoRow>> {
        let ModelParameters { discount_rate, horizon, .. } = *self.parameters;
        let other_opex = present_values(
            self.tables.other_opex.horizon(to, start_year, horizon, self.data_years)?,
            discount_rate,
        )?;
        let variable_opex = present_values(
            self.tables.variable_costs.horizon(to, start_year, horizon, self.data_years)?,
            discount_rate,
        )?;
        let payment = FinancialSchedule::amortize()
            .principal(capex_switch)
            .rate(discount_rate)
            .term_years(horizon)
            .call()?
            .annual_payment;
        let annual_capex =
            present_values(std::iter::repeat_n(-payment, usize::from(horizon)), discount_rate)?;

        Ok(izip!(start_year.., other_opex, variable_opex, annual_capex)
            .map(|(year, other_opex, variable_opex, annual_capex)| TcoRow {
                start_year,
                year,
                from: from.clone(),
                to: to.clone(),
                other_opex,
                variable_opex,
                annual_capex,
                tco: other_opex + variable_opex + annual_capex,
            })
            .collect())
    }

    /// Horizon sums of [`Self::detail`].
    pub fn tco(
        &self,
        from: &Technology,
        to: &Technology,
        start_year: Year,
        capex_switch: Cost,
    ) -> Result<TcoRecord> {
        let mut record = TcoRecord::new(start_year, from.clone(), to.clone());
        for row in self.detail(from, to, start_year, capex_switch)? {
            record.accumulate(&row);
        }
        Ok(record)
    }
}

/// Detailed rows and their `(start_year, from, to)` summary.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TcoTable {
    pub rows: Vec<TcoRow>,

    /// Sorted by `(start_year, from, to)`.
    pub summary: Vec<TcoRecord>,
}

impl FromIterator<(Vec<TcoRow>, TcoRecord)> for TcoTable {
    fn from_iter<T: IntoIterator<Item = (Vec<TcoRow>, TcoRecord)>>(iter: T) -> Self {
        let mut table = Self::default();
        for (rows, record) in iter {
            table.rows.extend(rows);
            table.summary.push(record);
        }
        table.summary.sort_by(|lhs, rhs| lhs.key().cmp(&rhs.key()));
        table
    }
}
