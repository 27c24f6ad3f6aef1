//! Access to the genomic registry.
//!
//! The [`Store`] trait is the single seam between the load and whatever
//! holds the registry data. Everything above it (caches, resolution,
//! reconciliation) is store-agnostic; [`MemoryStore`](memory::MemoryStore)
//! backs the crate's tests.

use crate::model::Accession;
use crate::model::Allele;
use crate::model::AlleleKey;
use crate::model::CellLine;
use crate::model::CellLineKey;
use crate::model::Derivation;
use crate::model::DerivationKey;
use crate::model::Marker;
use crate::model::Note;

pub mod memory;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to a [`Store`].
///
/// Store errors are the only per-record errors that abort a run: if the
/// registry cannot be read or written, nothing downstream is trustworthy.
#[derive(Debug)]
pub enum Error {
    /// A write referenced an entity that does not exist.
    MissingEntity {
        /// The kind of entity (e.g., `allele`).
        kind: &'static str,

        /// The identifier or key that failed to resolve.
        id: String,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingEntity { kind, id } => {
                write!(f, "no such {kind} in store: {id}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// The store
////////////////////////////////////////////////////////////////////////////////////////

/// A genomic registry.
pub trait Store {
    /// Looks up a marker by its identifier.
    fn marker_by_id(&self, id: &str) -> Result<Option<Marker>>;

    /// Returns whether a strain with the given name exists.
    fn strain_exists(&self, name: &str) -> Result<bool>;

    /// Looks up a cell line by its exact name.
    fn cell_line_by_name(&self, name: &str) -> Result<Option<(CellLineKey, CellLine)>>;

    /// Looks up a cell line by key.
    fn cell_line(&self, key: CellLineKey) -> Result<Option<CellLine>>;

    /// Looks up a derivation by key.
    fn derivation(&self, key: DerivationKey) -> Result<Option<Derivation>>;

    /// Looks up an allele by key.
    fn allele(&self, key: AlleleKey) -> Result<Option<Allele>>;

    /// Scans every allele in the registry.
    fn alleles(&self) -> Result<Vec<(AlleleKey, Allele)>>;

    /// Scans every derivation in the registry.
    fn derivations(&self) -> Result<Vec<(DerivationKey, Derivation)>>;

    /// Scans every allele to mutant cell-line association in the registry.
    fn allele_cell_lines(&self) -> Result<Vec<(AlleleKey, CellLineKey)>>;

    /// Creates an allele and returns its key.
    fn create_allele(&mut self, allele: Allele) -> Result<AlleleKey>;

    /// Creates a cell line and returns its key.
    fn create_cell_line(&mut self, cell_line: CellLine) -> Result<CellLineKey>;

    /// Creates a derivation and returns its key.
    fn create_derivation(&mut self, derivation: Derivation) -> Result<DerivationKey>;

    /// Attaches an accession identifier to a cell line.
    fn create_accession(&mut self, accession: Accession) -> Result<()>;

    /// Associates a mutant cell line with an allele.
    fn associate_cell_line(&mut self, allele: AlleleKey, cell_line: CellLineKey) -> Result<()>;

    /// Replaces the molecular note of an allele.
    fn update_allele_note(&mut self, allele: AlleleKey, note: Note) -> Result<()>;
}
