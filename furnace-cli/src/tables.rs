use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use furnace_quantities::{cost::Cost, emissions::Emissions};

use crate::core::{
    abatement::{AbatementRecord, AbatementRow},
    capex::CapexSwitchValue,
    config::ModelConfig,
    finance::FinancialSchedule,
    graph::EdgeKind,
    scope::Scope,
    tco::{TcoRecord, TcoRow},
    technology::{Target, Technology},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn cost_cell(cost: Cost) -> Cell {
    Cell::new(format!("{:.2}", cost.get())).set_alignment(CellAlignment::Right)
}

fn abated_cell(emissions: Emissions) -> Cell {
    Cell::new(format!("{:.2}", emissions.get())).set_alignment(CellAlignment::Right).fg(
        if emissions > Emissions::ZERO {
            Color::Green
        } else if emissions < Emissions::ZERO {
            Color::Red
        } else {
            Color::Reset
        },
    )
}

fn from_cell(from: &Technology, to: &Technology) -> Cell {
    let cell = Cell::new(from);
    if from == to { cell.add_attribute(Attribute::Dim) } else { cell }
}

pub fn build_tco_summary_table(records: &[TcoRecord]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Year", "From", "To", "Other opex", "Variable opex", "Capex", "TCO"]);
    for record in records {
        table.add_row(vec![
            Cell::new(record.start_year),
            from_cell(&record.from, &record.to),
            Cell::new(&record.to),
            cost_cell(record.other_opex_pv),
            cost_cell(record.variable_opex_pv),
            cost_cell(record.annual_capex_pv).add_attribute(Attribute::Dim),
            cost_cell(record.tco).add_attribute(Attribute::Bold),
        ]);
    }
    table
}

pub fn build_tco_rows_table(rows: &[TcoRow]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Start", "Year", "From", "To", "Other opex", "Variable opex", "Capex", "TCO",
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.start_year).add_attribute(Attribute::Dim),
            Cell::new(row.year),
            from_cell(&row.from, &row.to),
            Cell::new(&row.to),
            cost_cell(row.other_opex),
            cost_cell(row.variable_opex),
            cost_cell(row.annual_capex).add_attribute(Attribute::Dim),
            cost_cell(row.tco),
        ]);
    }
    table
}

pub fn build_abatement_summary_table(records: &[AbatementRecord]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Year", "From", "To", "Scope 1", "Scope 2", "Scope 3"]);
    for record in records {
        let mut row = vec![
            Cell::new(record.start_year),
            from_cell(&record.from, &record.to),
            Cell::new(&record.to),
        ];
        row.extend(Scope::all().iter().map(|scope| abated_cell(record.abated[scope])));
        table.add_row(row);
    }
    table
}

pub fn build_abatement_rows_table(rows: &[AbatementRow]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Start", "Year", "From", "To", "Base S1", "Candidate S1", "Scope 1", "Scope 2", "Scope 3",
    ]);
    for row in rows {
        let mut cells = vec![
            Cell::new(row.start_year).add_attribute(Attribute::Dim),
            Cell::new(row.year),
            from_cell(&row.from, &row.to),
            Cell::new(&row.to),
            Cell::new(format!("{:.3}", row.base.s1.get())).add_attribute(Attribute::Dim),
            Cell::new(format!("{:.3}", row.candidate.s1.get())).add_attribute(Attribute::Dim),
        ];
        cells.extend(Scope::all().iter().map(|scope| abated_cell(row.abated[scope])));
        table.add_row(cells);
    }
    table
}

pub fn build_capex_table(values: &[CapexSwitchValue]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Year", "From", "To", "Capex"]);
    for value in values {
        let is_self_loop = value.to == value.from;
        table.add_row(vec![
            Cell::new(value.year).add_attribute(Attribute::Dim),
            Cell::new(&value.from),
            Cell::new(&value.to).fg(if value.to.technology().is_none() {
                Color::DarkYellow
            } else if is_self_loop {
                Color::Cyan
            } else {
                Color::Reset
            }),
            cost_cell(value.value),
        ]);
    }
    table
}

pub fn build_schedule_table(schedule: &FinancialSchedule) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Period", "Principal", "Interest", "Payment"]);
    for (period, (principal, interest)) in
        schedule.principal_schedule.iter().zip(&schedule.interest_schedule).enumerate()
    {
        table.add_row(vec![
            Cell::new(period + 1).add_attribute(Attribute::Dim),
            cost_cell(*principal),
            cost_cell(*interest),
            cost_cell(*principal + *interest),
        ]);
    }
    table
}

pub fn build_schedule_summary_table(schedule: &FinancialSchedule) -> Table {
    let mut table = new_table();
    table.add_row(vec![Cell::new("Payment"), cost_cell(schedule.annual_payment)]);
    table.add_row(vec![
        Cell::new("Total interest"),
        cost_cell(schedule.total_interest).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![Cell::new("Future value"), cost_cell(schedule.future_value)]);
    table
}

pub fn build_graph_table(config: &ModelConfig) -> Table {
    let mut table = new_table();
    table.set_header(vec!["From", "Family", "To", "Kind", "Capex formula"]);
    for edge in config.graph.edges() {
        let family = config
            .catalog
            .family_of(edge.from)
            .map_or_else(|error| error.to_string(), |family| family.to_string());
        let (kind, color) = match edge.kind() {
            EdgeKind::SelfLoop => ("reinvest", Color::Cyan),
            EdgeKind::Closure => ("close", Color::DarkYellow),
            EdgeKind::Transition => ("switch", Color::Reset),
        };
        table.add_row(vec![
            Cell::new(edge.from),
            Cell::new(family).add_attribute(Attribute::Dim),
            Cell::new(edge.to),
            Cell::new(kind).fg(color),
            formula_cell(config, edge.from, edge.to),
        ]);
    }
    table
}

fn formula_cell(config: &ModelConfig, from: &Technology, to: &Target) -> Cell {
    match config.rules.resolve(&config.catalog, from, to) {
        Ok(formula) => Cell::new(formula),
        Err(error) => Cell::new(error).fg(Color::Red),
    }
}
