//! Value objects stored in (and loaded from) the genomic registry.

pub mod accession;
pub mod allele;
pub mod cell_line;
pub mod derivation;
pub mod marker;
pub mod mutation;
pub mod note;

pub use accession::Accession;
pub use allele::Allele;
pub use allele::AlleleKey;
pub use cell_line::CellLine;
pub use cell_line::CellLineKey;
pub use derivation::Derivation;
pub use derivation::DerivationKey;
pub use derivation::DerivationSignature;
pub use marker::Marker;
pub use mutation::MutationType;
pub use note::Note;
