//! A mutant allele.

use nonempty::NonEmpty;

use crate::model::Note;

pub mod builder;

pub use builder::Builder;

/// The key assigned to an allele by the store.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AlleleKey(pub u64);

impl std::fmt::Display for AlleleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The classification of an allele.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AlleleType {
    /// A conditional-ready allele.
    Conditional,

    /// A targeted, non-conditional allele.
    NonConditional,

    /// A deletion allele.
    Deletion,
}

impl std::fmt::Display for AlleleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlleleType::Conditional => write!(f, "Conditional"),
            AlleleType::NonConditional => write!(f, "Targeted non-conditional"),
            AlleleType::Deletion => write!(f, "Deletion"),
        }
    }
}

/// The germline transmission state of an allele.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Transmission {
    /// The allele exists only in cell lines.
    CellLine,

    /// The allele has been transmitted through the germline.
    Germline,
}

/// The curatorial status of an allele.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Status {
    /// The allele is approved.
    Approved,

    /// The allele has been deleted by a curator.
    Deleted,
}

/// A mutant allele.
///
/// Alleles created by the load are born approved with cell-line
/// transmission; curators may change either afterwards, and the load never
/// touches them again.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Allele {
    /// The identifier of the marker (gene) the allele belongs to.
    marker_id: String,

    /// The marker symbol at the time the allele was constructed.
    marker_symbol: String,

    /// The strain of germline origin.
    strain: String,

    /// The full allele symbol (e.g., `Pax6<tm1a(EUCOMM)Wtsi>`).
    symbol: String,

    /// The allele name.
    name: String,

    /// The allele classification.
    allele_type: AlleleType,

    /// The germline transmission state.
    transmission: Transmission,

    /// The curatorial status.
    status: Status,

    /// The molecular note.
    note: Note,

    /// The molecular mutation terms.
    mutation_types: NonEmpty<String>,

    /// The literature references.
    references: NonEmpty<String>,

    /// The pipeline project identifier.
    project_id: String,
}

impl Allele {
    /// Creates a new [`Builder`].
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Gets the marker identifier.
    pub fn marker_id(&self) -> &str {
        &self.marker_id
    }

    /// Gets the marker symbol recorded at construction time.
    pub fn marker_symbol(&self) -> &str {
        &self.marker_symbol
    }

    /// Gets the strain of germline origin.
    pub fn strain(&self) -> &str {
        &self.strain
    }

    /// Gets the full allele symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Gets the allele name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the allele classification.
    pub fn allele_type(&self) -> AlleleType {
        self.allele_type
    }

    /// Gets the germline transmission state.
    pub fn transmission(&self) -> Transmission {
        self.transmission
    }

    /// Gets the curatorial status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Gets the molecular note.
    pub fn note(&self) -> &Note {
        &self.note
    }

    /// Gets the molecular mutation terms.
    pub fn mutation_types(&self) -> &NonEmpty<String> {
        &self.mutation_types
    }

    /// Gets the literature references.
    pub fn references(&self) -> &NonEmpty<String> {
        &self.references
    }

    /// Gets the pipeline project identifier.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Replaces the molecular note.
    pub fn set_note(&mut self, note: Note) {
        self.note = note;
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Builds a minimal approved allele for use across the crate's tests.
    pub fn sample_allele(symbol: &str, project_id: &str) -> Allele {
        Builder::default()
            .marker("MGI:97490", "Pax6")
            .strain("C57BL/6N")
            .symbol(symbol)
            .name("targeted mutation 1a, Wellcome Trust Sanger Institute")
            .allele_type(AlleleType::Conditional)
            .note(Note::new("note text", "load", "load"))
            .push_mutation_type("Insertion")
            .push_reference("J:157064")
            .project_id(project_id)
            .try_build()
            .unwrap()
    }

    #[test]
    fn test_build_and_getters() -> Result<(), Box<dyn std::error::Error>> {
        let allele = sample_allele("Pax6<tm1a(EUCOMM)Wtsi>", "35505");

        assert_eq!(allele.symbol(), "Pax6<tm1a(EUCOMM)Wtsi>");
        assert_eq!(allele.status(), Status::Approved);
        assert_eq!(allele.transmission(), Transmission::CellLine);
        assert_eq!(allele.project_id(), "35505");

        Ok(())
    }
}
