//! A mutant cell line.
//!
//! Mutant cell lines are created by the load, one per input record that
//! survives resolution. Parental cell lines are configuration-level names,
//! not stored entities.

use crate::model::DerivationKey;

/// The key assigned to a cell line by the store.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CellLineKey(pub u64);

impl std::fmt::Display for CellLineKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A mutant cell line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CellLine {
    /// The cell-line name (the provider's accession-style identifier,
    /// e.g. `HEPD0509_6_A11`).
    name: String,

    /// The strain name.
    strain: String,

    /// The provider (production pipeline) that produced the line.
    provider: String,

    /// The derivation that produced the line.
    derivation: DerivationKey,
}

impl CellLine {
    /// Creates a new mutant cell line.
    pub fn mutant(
        name: impl Into<String>,
        strain: impl Into<String>,
        provider: impl Into<String>,
        derivation: DerivationKey,
    ) -> Self {
        Self {
            name: name.into(),
            strain: strain.into(),
            provider: provider.into(),
            derivation,
        }
    }

    /// Gets the cell-line name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the strain name.
    pub fn strain(&self) -> &str {
        &self.strain
    }

    /// Gets the provider.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Gets the derivation that produced the line.
    pub fn derivation(&self) -> DerivationKey {
        self.derivation
    }
}
