use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{
    error::{Error, Result},
    technology::{Target, Technology},
};

/// Feasible transitions, keyed by the current technology.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SwitchGraph(BTreeMap<Technology, Vec<Target>>);

impl SwitchGraph {
    pub fn edges_for(&self, technology: &Technology) -> Result<&[Target]> {
        match self.0.get(technology) {
            Some(targets) if !targets.is_empty() => Ok(targets),
            Some(_) => Err(Error::Configuration(format!(
                "technology `{technology}` has no outgoing switches"
            ))),
            None => Err(Error::Configuration(format!(
                "technology `{technology}` is missing from the switch graph"
            ))),
        }
    }

    pub fn technologies(&self) -> impl Iterator<Item = &Technology> {
        self.0.keys()
    }

    /// All edges, in the source order and then in the configured target order.
    pub fn edges(&self) -> impl Iterator<Item = SwitchEdge<'_>> {
        self.0
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| SwitchEdge { from, to }))
    }

    #[must_use]
    pub fn n_edges(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Number of edges of each kind.
    pub fn count_by_kind(&self) -> impl Iterator<Item = (EdgeKind, usize)> {
        [EdgeKind::SelfLoop, EdgeKind::Closure, EdgeKind::Transition]
            .into_iter()
            .map(|kind| (kind, self.edges().filter(|edge| edge.kind() == kind).count()))
    }
}

impl FromIterator<(Technology, Vec<Target>)> for SwitchGraph {
    fn from_iter<T: IntoIterator<Item = (Technology, Vec<Target>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EdgeKind {
    /// Brownfield reinvestment without changing the technology.
    SelfLoop,

    /// Decommissioning.
    Closure,

    /// Actual technology change.
    Transition,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SwitchEdge<'a> {
    pub from: &'a Technology,
    pub to: &'a Target,
}

impl SwitchEdge<'_> {
    #[must_use]
    pub fn kind(self) -> EdgeKind {
        match self.to {
            Target::ClosePlant => EdgeKind::Closure,
            Target::Technology(to) if to == self.from => EdgeKind::SelfLoop,
            Target::Technology(_) => EdgeKind::Transition,
        }
    }
}
