use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
};

use enumset::EnumSet;
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

/// Steelmaking technology identifier, for example `BAT BF-BOF+CCUS`.
#[derive(
    Clone,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct Technology(String);

impl From<&str> for Technology {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl Technology {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Switch graph edge target: either another technology or the plant closure sentinel.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Target {
    Technology(Technology),
    ClosePlant,
}

impl Target {
    pub const CLOSE_PLANT: &str = "Close plant";

    #[must_use]
    pub const fn technology(&self) -> Option<&Technology> {
        match self {
            Self::Technology(technology) => Some(technology),
            Self::ClosePlant => None,
        }
    }
}

impl From<String> for Target {
    fn from(value: String) -> Self {
        if value == Self::CLOSE_PLANT { Self::ClosePlant } else { Self::Technology(value.into()) }
    }
}

impl From<&str> for Target {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<Technology> for Target {
    fn from(technology: Technology) -> Self {
        Self::Technology(technology)
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        match target {
            Target::Technology(technology) => technology.0,
            Target::ClosePlant => Target::CLOSE_PLANT.to_owned(),
        }
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Technology(technology) => Display::fmt(technology, f),
            Self::ClosePlant => f.write_str(Self::CLOSE_PLANT),
        }
    }
}

impl PartialEq<Technology> for Target {
    fn eq(&self, other: &Technology) -> bool {
        self.technology() == Some(other)
    }
}

/// Group of technologies sharing the core process equipment.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Deserialize,
    Serialize,
    derive_more::Display,
)]
pub enum FurnaceFamily {
    #[serde(rename = "blast_furnace")]
    #[display("blast_furnace")]
    BlastFurnace,

    #[serde(rename = "dri-bof")]
    #[display("dri-bof")]
    DriBof,

    #[serde(rename = "dri-eaf")]
    #[display("dri-eaf")]
    DriEaf,

    #[serde(rename = "smelting_reduction")]
    #[display("smelting_reduction")]
    SmeltingReduction,

    #[serde(rename = "eaf-basic")]
    #[display("eaf-basic")]
    EafBasic,

    #[serde(rename = "eaf-advanced")]
    #[display("eaf-advanced")]
    EafAdvanced,
}

/// Carbon capture tag sets a technology may additionally belong to.
#[derive(Debug, Deserialize, Serialize, derive_more::Display, enumset::EnumSetType)]
#[enumset(serialize_repr = "list")]
#[serde(rename_all = "lowercase")]
pub enum CaptureTag {
    #[display("ccs")]
    Ccs,

    #[display("ccu")]
    Ccu,
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TechnologyProfile {
    pub family: FurnaceFamily,

    #[serde(default)]
    pub tags: EnumSet<CaptureTag>,
}

impl TechnologyProfile {
    #[must_use]
    pub fn captures_carbon(&self) -> bool {
        !self.tags.is_empty()
    }
}

/// Immutable technology reference data.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Catalog(BTreeMap<Technology, TechnologyProfile>);

impl Catalog {
    pub fn profile(&self, technology: &Technology) -> Result<&TechnologyProfile> {
        self.0.get(technology).ok_or_else(|| {
            Error::Configuration(format!("technology `{technology}` is not in the catalog"))
        })
    }

    pub fn family_of(&self, technology: &Technology) -> Result<FurnaceFamily> {
        Ok(self.profile(technology)?.family)
    }

    #[must_use]
    pub fn contains(&self, technology: &Technology) -> bool {
        self.0.contains_key(technology)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Technology, &TechnologyProfile)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
