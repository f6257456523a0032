use crate::core::{
    Year,
    scope::Scope,
    technology::{Target, Technology},
};

pub type Result<T = (), E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid model configuration: {0}")]
    Configuration(String),

    #[error("malformed model configuration")]
    ConfigurationSyntax(#[from] toml::de::Error),

    #[error("`{table}` table has no row for `{technology}` in {year}")]
    DataIntegrity { table: Table, technology: Technology, year: Year },

    #[error("`{table}` table has a duplicate row for `{technology}` in {year}")]
    DuplicateRow { table: Table, technology: Technology, year: Year },

    #[error("failed to resolve the `{from}` → `{to}` switch in {year}")]
    Switch {
        from: Technology,
        to: Target,
        year: Year,

        #[source]
        source: Box<Self>,
    },

    #[error("computation failed: {0}")]
    Computation(String),
}

impl Error {
    /// Attach the switch pair and year to a lower-level failure.
    pub fn in_switch(self, from: &Technology, to: &Target, year: Year) -> Self {
        Self::Switch { from: from.clone(), to: to.clone(), year, source: Box::new(self) }
    }
}

/// Upstream table names, used to point at the offending input.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum Table {
    #[display("capex")]
    Capex,

    #[display("other_opex")]
    OtherOpex,

    #[display("variable_costs")]
    VariableCosts,

    #[display("{_0}")]
    Emissions(Scope),

    #[display("s1_corrections")]
    S1Corrections,

    #[display("capex_switch")]
    CapexSwitch,
}
