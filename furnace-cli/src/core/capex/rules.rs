use std::collections::BTreeSet;

use furnace_quantities::cost::Cost;
use serde::{Deserialize, Serialize};

use crate::core::{
    capex::formula::Formula,
    curve::LinearCurve,
    error::{Error, Result},
    technology::{Catalog, FurnaceFamily, Target, Technology},
};

/// Constants and exceptions of the capex switching rule table.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CapexRules {
    /// Share of the greenfield capex spent on closing a plant.
    pub closure_share: f64,

    /// Best-available-technology blast furnace, the reference for blast furnace retrofits.
    pub baseline: Technology,

    /// Average blast furnace fleet technology.
    pub average_blast_furnace: Technology,

    /// Fixed cost of retrofitting the average blast furnace with PCI.
    pub pci_retrofit_cost: Cost,

    /// PCI variants whose carbon capture retrofit follows [`CapexRules::legacy_curve`].
    pub legacy_pci: BTreeSet<Technology>,

    pub legacy_curve: LinearCurve,

    /// Same-family targets reached by switching the fuel only, priced at the brownfield capex.
    pub fuel_switches: BTreeSet<Technology>,

    /// Ordered cross-family exceptions, the first match wins.
    #[serde(default)]
    pub cross_family: Vec<CrossFamilyRule>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CrossFamilyRule {
    pub from_family: FurnaceFamily,
    pub to_family: FurnaceFamily,

    /// Matching current technologies, any if omitted.
    #[serde(default)]
    pub from: Option<BTreeSet<Technology>>,

    /// Matching candidate technologies, any if omitted.
    #[serde(default)]
    pub to: Option<BTreeSet<Technology>>,

    pub formula: CrossFamilyFormula,
}

impl CrossFamilyRule {
    fn matches(&self, from: &Technology, to: &Technology) -> bool {
        self.from.as_ref().is_none_or(|set| set.contains(from))
            && self.to.as_ref().is_none_or(|set| set.contains(to))
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case", deny_unknown_fields)]
pub enum CrossFamilyFormula {
    GreenfieldDifference { minuend: Technology, subtrahend: Technology },
    GreenfieldLess { offset: Cost },
}

/// Kind of a switch, in the order of precedence.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Transition {
    Reinvest,
    Close,
    SameFamily(FurnaceFamily),
    CrossFamily { from: FurnaceFamily, to: FurnaceFamily },
}

/// Role of a candidate technology within the blast furnace family.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum BlastFurnaceTarget {
    Baseline,
    CarbonCapture,
    Injection,
}

impl CapexRules {
    pub fn classify(&self, catalog: &Catalog, from: &Technology, to: &Target) -> Result<Transition> {
        let Target::Technology(to) = to else {
            return Ok(Transition::Close);
        };
        if from == to {
            return Ok(Transition::Reinvest);
        }
        let (from_family, to_family) = (catalog.family_of(from)?, catalog.family_of(to)?);
        if from_family == to_family {
            Ok(Transition::SameFamily(from_family))
        } else {
            Ok(Transition::CrossFamily { from: from_family, to: to_family })
        }
    }

    /// Pick the capex formula for the switch.
    pub fn resolve<'a>(
        &'a self,
        catalog: &Catalog,
        from: &'a Technology,
        target: &'a Target,
    ) -> Result<Formula<'a>> {
        match (self.classify(catalog, from, target)?, target) {
            (Transition::Reinvest, _) => Ok(Formula::Brownfield(from)),
            (Transition::Close, _) | (_, Target::ClosePlant) => {
                Ok(Formula::GreenfieldShare { technology: from, share: self.closure_share })
            }
            (Transition::SameFamily(FurnaceFamily::BlastFurnace), Target::Technology(to)) => {
                self.resolve_blast_furnace(catalog, from, to)
            }
            (
                Transition::SameFamily(FurnaceFamily::DriBof | FurnaceFamily::DriEaf),
                Target::Technology(to),
            ) => {
                if self.fuel_switches.contains(to) {
                    Ok(Formula::Brownfield(from))
                } else {
                    Ok(Formula::BrownfieldPlusDelta { base: from, from, to })
                }
            }
            (Transition::SameFamily(FurnaceFamily::SmeltingReduction), Target::Technology(to)) => {
                Ok(Formula::BrownfieldPlusDelta { base: from, from, to })
            }
            (Transition::CrossFamily { from: from_family, to: to_family }, Target::Technology(to)) => {
                self.resolve_cross_family(from_family, to_family, from, to)
            }
            (
                Transition::SameFamily(FurnaceFamily::EafBasic | FurnaceFamily::EafAdvanced),
                Target::Technology(to),
            ) => Ok(Formula::Greenfield(to)),
        }
    }

    fn resolve_blast_furnace<'a>(
        &'a self,
        catalog: &Catalog,
        from: &'a Technology,
        to: &'a Technology,
    ) -> Result<Formula<'a>> {
        let role = if *to == self.baseline {
            BlastFurnaceTarget::Baseline
        } else if catalog.profile(to)?.captures_carbon() {
            BlastFurnaceTarget::CarbonCapture
        } else {
            BlastFurnaceTarget::Injection
        };
        let formula = match role {
            BlastFurnaceTarget::Baseline => Formula::Brownfield(&self.baseline),
            BlastFurnaceTarget::CarbonCapture if self.legacy_pci.contains(from) => Formula::LegacyCurve,
            BlastFurnaceTarget::CarbonCapture => {
                Formula::BrownfieldPlusDelta { base: &self.baseline, from, to }
            }
            BlastFurnaceTarget::Injection if *from == self.average_blast_furnace => {
                Formula::Constant(self.pci_retrofit_cost)
            }
            BlastFurnaceTarget::Injection => Formula::Brownfield(from),
        };
        Ok(formula)
    }

    fn resolve_cross_family<'a>(
        &'a self,
        from_family: FurnaceFamily,
        to_family: FurnaceFamily,
        from: &'a Technology,
        to: &'a Technology,
    ) -> Result<Formula<'a>> {
        let mut candidates = self
            .cross_family
            .iter()
            .filter(|rule| rule.from_family == from_family && rule.to_family == to_family)
            .peekable();
        if candidates.peek().is_none() {
            return Ok(Formula::Greenfield(to));
        }
        let rule = candidates.find(|rule| rule.matches(from, to)).ok_or_else(|| {
            Error::Configuration(format!(
                "no {from_family} → {to_family} capex rule covers `{from}` → `{to}`"
            ))
        })?;
        Ok(match &rule.formula {
            CrossFamilyFormula::GreenfieldDifference { minuend, subtrahend } => {
                Formula::GreenfieldDifference { minuend, subtrahend }
            }
            CrossFamilyFormula::GreenfieldLess { offset } => {
                Formula::GreenfieldLess { technology: to, offset: *offset }
            }
        })
    }
}
