use std::ops::{Index, IndexMut};

use enumset::EnumSet;
use serde::{Deserialize, Serialize};

/// Emissions scope.
#[derive(Debug, Deserialize, Serialize, derive_more::Display, enumset::EnumSetType)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Direct emissions.
    #[display("s1")]
    S1,

    /// Purchased-energy emissions.
    #[display("s2")]
    S2,

    /// Value-chain emissions.
    #[display("s3")]
    S3,
}

impl Scope {
    pub fn all() -> EnumSet<Self> {
        EnumSet::all()
    }
}

/// One value per emissions scope.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct ScopeMap<T> {
    pub s1: T,
    pub s2: T,
    pub s3: T,
}

impl<T> ScopeMap<T> {
    pub fn from_fn(mut f: impl FnMut(Scope) -> T) -> Self {
        Self { s1: f(Scope::S1), s2: f(Scope::S2), s3: f(Scope::S3) }
    }

    pub fn try_from_fn<E>(mut f: impl FnMut(Scope) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self { s1: f(Scope::S1)?, s2: f(Scope::S2)?, s3: f(Scope::S3)? })
    }

    pub fn map<R>(self, mut f: impl FnMut(Scope, T) -> R) -> ScopeMap<R> {
        ScopeMap { s1: f(Scope::S1, self.s1), s2: f(Scope::S2, self.s2), s3: f(Scope::S3, self.s3) }
    }

    pub const fn as_ref(&self) -> ScopeMap<&T> {
        ScopeMap { s1: &self.s1, s2: &self.s2, s3: &self.s3 }
    }
}

impl<T> Index<Scope> for ScopeMap<T> {
    type Output = T;

    fn index(&self, scope: Scope) -> &Self::Output {
        match scope {
            Scope::S1 => &self.s1,
            Scope::S2 => &self.s2,
            Scope::S3 => &self.s3,
        }
    }
}

impl<T> IndexMut<Scope> for ScopeMap<T> {
    fn index_mut(&mut self, scope: Scope) -> &mut Self::Output {
        match scope {
            Scope::S1 => &mut self.s1,
            Scope::S2 => &mut self.s2,
            Scope::S3 => &mut self.s3,
        }
    }
}
