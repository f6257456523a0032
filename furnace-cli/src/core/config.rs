//! Technology reference data: the catalog, the switch graph, and the capex rule table.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::core::{
    capex::rules::{CapexRules, CrossFamilyFormula},
    error::{Error, Result},
    graph::SwitchGraph,
    inputs::DataYears,
    technology::{Catalog, Technology},
};

const REFERENCE: &str = include_str!("reference.toml");

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    #[serde(default)]
    pub data_years: DataYears,

    #[serde(rename = "technologies")]
    pub catalog: Catalog,

    #[serde(rename = "switches")]
    pub graph: SwitchGraph,

    pub rules: CapexRules,
}

impl ModelConfig {
    /// Built-in steel technology model.
    pub fn reference() -> Result<Self> {
        Self::from_toml(REFERENCE)
    }

    #[instrument(skip_all)]
    pub fn from_toml(text: &str) -> Result<Self> {
        let this: Self = toml::from_str(text)?;
        this.validate()?;
        Ok(this)
    }

    /// Check that every technology has switches and every name the graph and the rules refer to
    /// is a known technology.
    pub fn validate(&self) -> Result {
        if self.data_years.first > self.data_years.last {
            return Err(Error::Configuration(format!(
                "data years are empty: {}..={}",
                self.data_years.first, self.data_years.last,
            )));
        }
        if self.catalog.is_empty() {
            return Err(Error::Configuration("the technology catalog is empty".to_string()));
        }
        if !(0.0..=1.0).contains(&self.rules.closure_share) {
            return Err(Error::Configuration(format!(
                "closure share must be within [0, 1], got {}",
                self.rules.closure_share,
            )));
        }

        for (technology, _) in self.catalog.iter() {
            self.graph.edges_for(technology)?;
        }
        for technology in self.graph.technologies() {
            self.ensure_known(technology, "switch graph source")?;
            for target in self.graph.edges_for(technology)? {
                if let Some(target) = target.technology() {
                    self.ensure_known(target, "switch graph target")?;
                }
            }
        }

        self.ensure_known(&self.rules.baseline, "baseline")?;
        self.ensure_known(&self.rules.average_blast_furnace, "average blast furnace")?;
        for technology in &self.rules.legacy_pci {
            self.ensure_known(technology, "legacy PCI technology")?;
        }
        for technology in &self.rules.fuel_switches {
            self.ensure_known(technology, "fuel switch")?;
        }
        for rule in &self.rules.cross_family {
            for technology in rule.from.iter().chain(&rule.to).flatten() {
                self.ensure_known(technology, "cross-family rule technology")?;
            }
            if let CrossFamilyFormula::GreenfieldDifference { minuend, subtrahend } = &rule.formula {
                self.ensure_known(minuend, "cross-family rule technology")?;
                self.ensure_known(subtrahend, "cross-family rule technology")?;
            }
        }
        Ok(())
    }

    fn ensure_known(&self, technology: &Technology, role: &str) -> Result {
        if self.catalog.contains(technology) {
            Ok(())
        } else {
            Err(Error::Configuration(format!("{role} `{technology}` is not in the catalog")))
        }
    }
}
