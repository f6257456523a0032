pub mod abatement;
pub mod capex;
pub mod config;
pub mod curve;
pub mod engine;
pub mod error;
pub mod finance;
pub mod graph;
pub mod inputs;
pub mod parameters;
pub mod scope;
pub mod tco;
pub mod technology;
#[cfg(test)]
mod testing;

/// Calendar year.
pub type Year = u16;
