//! An accession identifier attached to a stored entity.

use crate::model::CellLineKey;

/// An accession identifier.
///
/// The load attaches two kinds of accessions to each mutant cell line it
/// creates: the provider's cell-line identifier and the pipeline project
/// identifier, each under its own logical database.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Accession {
    /// The accession identifier text.
    id: String,

    /// The logical database the identifier belongs to.
    logical_db: String,

    /// The cell line the identifier is attached to.
    cell_line: CellLineKey,

    /// Whether this is the preferred identifier for the entity within its
    /// logical database.
    preferred: bool,

    /// Whether the identifier is hidden from public reports.
    private: bool,
}

impl Accession {
    /// Creates a new accession.
    pub fn new(
        id: impl Into<String>,
        logical_db: impl Into<String>,
        cell_line: CellLineKey,
        preferred: bool,
        private: bool,
    ) -> Self {
        Self {
            id: id.into(),
            logical_db: logical_db.into(),
            cell_line,
            preferred,
            private,
        }
    }

    /// Gets the accession identifier text.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Gets the logical database.
    pub fn logical_db(&self) -> &str {
        &self.logical_db
    }

    /// Gets the cell line the identifier is attached to.
    pub fn cell_line(&self) -> CellLineKey {
        self.cell_line
    }

    /// Returns whether this is the preferred identifier.
    pub fn is_preferred(&self) -> bool {
        self.preferred
    }

    /// Returns whether the identifier is private.
    pub fn is_private(&self) -> bool {
        self.private
    }
}
