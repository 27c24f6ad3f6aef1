//! A canonical input record.
//!
//! Providers ship files in different column layouts; each provider module
//! canonicalizes its rows into this one shape before resolution. Anything
//! that reaches a [`Record`] has already passed the provider's screening.

use crate::model::MutationType;

/// The sentinel meaning "no coordinate supplied".
pub const UNSET_COORDINATE: i64 = 0;

/// A canonical input record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// The marker (gene) identifier.
    gene_id: String,

    /// The genome build the coordinates refer to.
    build: String,

    /// The cassette (targeting vector) name.
    cassette: String,

    /// The pipeline project identifier.
    project_id: String,

    /// The mutant cell-line name.
    mutant_cell_line: String,

    /// The normalized parental cell-line name.
    parent_cell_line: String,

    /// The mutation type.
    mutation_type: MutationType,

    /// The mutation subtype, when the provider supplies one.
    mutation_subtype: Option<String>,

    /// The first genomic coordinate.
    locus1: i64,

    /// The second genomic coordinate, or [`UNSET_COORDINATE`].
    locus2: i64,
}

/// The fields of a [`Record`], as assembled by a provider.
///
/// Separate from [`Record`] only to keep provider code readable; the
/// canonical record itself is immutable once built.
#[derive(Clone, Debug)]
pub struct Fields {
    /// The marker (gene) identifier.
    pub gene_id: String,

    /// The genome build.
    pub build: String,

    /// The cassette name.
    pub cassette: String,

    /// The pipeline project identifier.
    pub project_id: String,

    /// The mutant cell-line name.
    pub mutant_cell_line: String,

    /// The normalized parental cell-line name.
    pub parent_cell_line: String,

    /// The mutation type.
    pub mutation_type: MutationType,

    /// The mutation subtype, if any.
    pub mutation_subtype: Option<String>,

    /// The first genomic coordinate.
    pub locus1: i64,

    /// The second genomic coordinate, or [`UNSET_COORDINATE`].
    pub locus2: i64,
}

impl From<Fields> for Record {
    fn from(fields: Fields) -> Self {
        Self {
            gene_id: fields.gene_id,
            build: fields.build,
            cassette: fields.cassette,
            project_id: fields.project_id,
            mutant_cell_line: fields.mutant_cell_line,
            parent_cell_line: fields.parent_cell_line,
            mutation_type: fields.mutation_type,
            mutation_subtype: fields.mutation_subtype,
            locus1: fields.locus1,
            locus2: fields.locus2,
        }
    }
}

impl Record {
    /// Gets the marker identifier.
    pub fn gene_id(&self) -> &str {
        &self.gene_id
    }

    /// Gets the genome build.
    pub fn build(&self) -> &str {
        &self.build
    }

    /// Gets the cassette name.
    pub fn cassette(&self) -> &str {
        &self.cassette
    }

    /// Gets the pipeline project identifier.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Gets the mutant cell-line name.
    pub fn mutant_cell_line(&self) -> &str {
        &self.mutant_cell_line
    }

    /// Gets the normalized parental cell-line name.
    pub fn parent_cell_line(&self) -> &str {
        &self.parent_cell_line
    }

    /// Gets the mutation type.
    pub fn mutation_type(&self) -> MutationType {
        self.mutation_type
    }

    /// Gets the mutation subtype, if any.
    pub fn mutation_subtype(&self) -> Option<&str> {
        self.mutation_subtype.as_deref()
    }

    /// Gets the first genomic coordinate.
    pub fn locus1(&self) -> i64 {
        self.locus1
    }

    /// Gets the second genomic coordinate, or [`UNSET_COORDINATE`].
    pub fn locus2(&self) -> i64 {
        self.locus2
    }
}
