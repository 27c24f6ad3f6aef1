//! A builder for an allele.

use nonempty::NonEmpty;

use crate::model::Note;
use crate::model::allele::Allele;
use crate::model::allele::AlleleType;
use crate::model::allele::Status;
use crate::model::allele::Transmission;

/// An error that occurs when a required field was never provided to the
/// [`Builder`].
#[derive(Debug)]
pub enum MissingError {
    /// No marker was provided to the [`Builder`].
    Marker,

    /// No strain was provided to the [`Builder`].
    Strain,

    /// No symbol was provided to the [`Builder`].
    Symbol,

    /// No name was provided to the [`Builder`].
    Name,

    /// No allele type was provided to the [`Builder`].
    AlleleType,

    /// No note was provided to the [`Builder`].
    Note,

    /// No mutation types were provided to the [`Builder`].
    MutationTypes,

    /// No references were provided to the [`Builder`].
    References,

    /// No project identifier was provided to the [`Builder`].
    ProjectId,
}

impl std::fmt::Display for MissingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingError::Marker => write!(f, "marker"),
            MissingError::Strain => write!(f, "strain"),
            MissingError::Symbol => write!(f, "symbol"),
            MissingError::Name => write!(f, "name"),
            MissingError::AlleleType => write!(f, "allele type"),
            MissingError::Note => write!(f, "note"),
            MissingError::MutationTypes => write!(f, "mutation types"),
            MissingError::References => write!(f, "references"),
            MissingError::ProjectId => write!(f, "project id"),
        }
    }
}

impl std::error::Error for MissingError {}

/// An error related to a [`Builder`].
#[derive(Debug)]
pub enum Error {
    /// An error where a required field was never provided to the [`Builder`].
    Missing(MissingError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Missing(err) => write!(f, "missing required field: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for an [`Allele`].
///
/// New alleles always start approved with cell-line transmission, so the
/// builder does not expose those fields.
#[derive(Debug, Default)]
pub struct Builder {
    /// The marker identifier and symbol.
    marker: Option<(String, String)>,

    /// The strain of germline origin.
    strain: Option<String>,

    /// The full allele symbol.
    symbol: Option<String>,

    /// The allele name.
    name: Option<String>,

    /// The allele classification.
    allele_type: Option<AlleleType>,

    /// The molecular note.
    note: Option<Note>,

    /// The molecular mutation terms.
    mutation_types: Option<NonEmpty<String>>,

    /// The literature references.
    references: Option<NonEmpty<String>>,

    /// The pipeline project identifier.
    project_id: Option<String>,
}

impl Builder {
    /// Sets the marker identifier and symbol for the [`Builder`].
    pub fn marker(mut self, id: impl Into<String>, symbol: impl Into<String>) -> Self {
        self.marker = Some((id.into(), symbol.into()));
        self
    }

    /// Sets the strain of germline origin for the [`Builder`].
    pub fn strain(mut self, strain: impl Into<String>) -> Self {
        self.strain = Some(strain.into());
        self
    }

    /// Sets the full allele symbol for the [`Builder`].
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Sets the allele name for the [`Builder`].
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the allele classification for the [`Builder`].
    pub fn allele_type(mut self, allele_type: AlleleType) -> Self {
        self.allele_type = Some(allele_type);
        self
    }

    /// Sets the molecular note for the [`Builder`].
    pub fn note(mut self, note: Note) -> Self {
        self.note = Some(note);
        self
    }

    /// Pushes a molecular mutation term into the [`Builder`].
    pub fn push_mutation_type(mut self, term: impl Into<String>) -> Self {
        let mutation_types = match self.mutation_types {
            Some(mut terms) => {
                terms.push(term.into());
                terms
            }
            None => NonEmpty::new(term.into()),
        };

        self.mutation_types = Some(mutation_types);
        self
    }

    /// Pushes a literature reference into the [`Builder`].
    pub fn push_reference(mut self, reference: impl Into<String>) -> Self {
        let references = match self.references {
            Some(mut references) => {
                references.push(reference.into());
                references
            }
            None => NonEmpty::new(reference.into()),
        };

        self.references = Some(references);
        self
    }

    /// Sets the pipeline project identifier for the [`Builder`].
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Consumes `self` to attempt to build an [`Allele`].
    pub fn try_build(self) -> Result<Allele> {
        let (marker_id, marker_symbol) = self
            .marker
            .ok_or(Error::Missing(MissingError::Marker))?;

        let strain = self.strain.ok_or(Error::Missing(MissingError::Strain))?;
        let symbol = self.symbol.ok_or(Error::Missing(MissingError::Symbol))?;
        let name = self.name.ok_or(Error::Missing(MissingError::Name))?;

        let allele_type = self
            .allele_type
            .ok_or(Error::Missing(MissingError::AlleleType))?;

        let note = self.note.ok_or(Error::Missing(MissingError::Note))?;

        let mutation_types = self
            .mutation_types
            .ok_or(Error::Missing(MissingError::MutationTypes))?;

        let references = self
            .references
            .ok_or(Error::Missing(MissingError::References))?;

        let project_id = self
            .project_id
            .ok_or(Error::Missing(MissingError::ProjectId))?;

        Ok(Allele {
            marker_id,
            marker_symbol,
            strain,
            symbol,
            name,
            allele_type,
            transmission: Transmission::CellLine,
            status: Status::Approved,
            note,
            mutation_types,
            references,
            project_id,
        })
    }
}
