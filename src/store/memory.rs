//! An in-memory genomic registry.

use std::collections::BTreeMap;
use std::collections::HashSet;

use crate::model::Accession;
use crate::model::Allele;
use crate::model::AlleleKey;
use crate::model::CellLine;
use crate::model::CellLineKey;
use crate::model::Derivation;
use crate::model::DerivationKey;
use crate::model::Marker;
use crate::model::Note;
use crate::store::Error;
use crate::store::Result;
use crate::store::Store;

/// An in-memory [`Store`].
///
/// Keys are allocated from a single monotonically increasing counter, so a
/// key is never reused across entity kinds within one store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// The next key to allocate.
    next_key: u64,

    /// Markers by identifier.
    markers: BTreeMap<String, Marker>,

    /// The names of known strains.
    strains: HashSet<String>,

    /// Cell lines by key.
    cell_lines: BTreeMap<u64, CellLine>,

    /// Derivations by key.
    derivations: BTreeMap<u64, Derivation>,

    /// Alleles by key.
    alleles: BTreeMap<u64, Allele>,

    /// Accession identifiers.
    accessions: Vec<Accession>,

    /// Allele to mutant cell-line associations.
    associations: Vec<(AlleleKey, CellLineKey)>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a marker.
    pub fn insert_marker(&mut self, marker: Marker) {
        self.markers.insert(marker.id().to_string(), marker);
    }

    /// Seeds a strain.
    pub fn insert_strain(&mut self, name: impl Into<String>) {
        self.strains.insert(name.into());
    }

    /// Gets the accession identifiers attached so far.
    pub fn accessions(&self) -> &[Accession] {
        &self.accessions
    }

    /// Allocates the next key.
    fn allocate(&mut self) -> u64 {
        self.next_key += 1;
        self.next_key
    }
}

impl Store for MemoryStore {
    fn marker_by_id(&self, id: &str) -> Result<Option<Marker>> {
        Ok(self.markers.get(id).cloned())
    }

    fn strain_exists(&self, name: &str) -> Result<bool> {
        Ok(self.strains.contains(name))
    }

    fn cell_line_by_name(&self, name: &str) -> Result<Option<(CellLineKey, CellLine)>> {
        Ok(self
            .cell_lines
            .iter()
            .find(|(_, line)| line.name() == name)
            .map(|(key, line)| (CellLineKey(*key), line.clone())))
    }

    fn cell_line(&self, key: CellLineKey) -> Result<Option<CellLine>> {
        Ok(self.cell_lines.get(&key.0).cloned())
    }

    fn derivation(&self, key: DerivationKey) -> Result<Option<Derivation>> {
        Ok(self.derivations.get(&key.0).cloned())
    }

    fn allele(&self, key: AlleleKey) -> Result<Option<Allele>> {
        Ok(self.alleles.get(&key.0).cloned())
    }

    fn alleles(&self) -> Result<Vec<(AlleleKey, Allele)>> {
        Ok(self
            .alleles
            .iter()
            .map(|(key, allele)| (AlleleKey(*key), allele.clone()))
            .collect())
    }

    fn derivations(&self) -> Result<Vec<(DerivationKey, Derivation)>> {
        Ok(self
            .derivations
            .iter()
            .map(|(key, derivation)| (DerivationKey(*key), derivation.clone()))
            .collect())
    }

    fn allele_cell_lines(&self) -> Result<Vec<(AlleleKey, CellLineKey)>> {
        Ok(self.associations.clone())
    }

    fn create_allele(&mut self, allele: Allele) -> Result<AlleleKey> {
        let key = self.allocate();
        self.alleles.insert(key, allele);
        Ok(AlleleKey(key))
    }

    fn create_cell_line(&mut self, cell_line: CellLine) -> Result<CellLineKey> {
        let key = self.allocate();
        self.cell_lines.insert(key, cell_line);
        Ok(CellLineKey(key))
    }

    fn create_derivation(&mut self, derivation: Derivation) -> Result<DerivationKey> {
        let key = self.allocate();
        self.derivations.insert(key, derivation);
        Ok(DerivationKey(key))
    }

    fn create_accession(&mut self, accession: Accession) -> Result<()> {
        if !self.cell_lines.contains_key(&accession.cell_line().0) {
            return Err(Error::MissingEntity {
                kind: "cell line",
                id: accession.cell_line().to_string(),
            });
        }

        self.accessions.push(accession);
        Ok(())
    }

    fn associate_cell_line(&mut self, allele: AlleleKey, cell_line: CellLineKey) -> Result<()> {
        if !self.alleles.contains_key(&allele.0) {
            return Err(Error::MissingEntity {
                kind: "allele",
                id: allele.to_string(),
            });
        }

        if !self.cell_lines.contains_key(&cell_line.0) {
            return Err(Error::MissingEntity {
                kind: "cell line",
                id: cell_line.to_string(),
            });
        }

        self.associations.push((allele, cell_line));
        Ok(())
    }

    fn update_allele_note(&mut self, allele: AlleleKey, note: Note) -> Result<()> {
        match self.alleles.get_mut(&allele.0) {
            Some(existing) => {
                existing.set_note(note);
                Ok(())
            }
            None => Err(Error::MissingEntity {
                kind: "allele",
                id: allele.to_string(),
            }),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::model::allele::tests::sample_allele;

    #[test]
    fn test_create_and_look_up() -> Result<()> {
        let mut store = MemoryStore::new();

        let derivation = store.create_derivation(Derivation::new(
            crate::model::DerivationSignature::new("L1L2_Bact_P", "Wtsi", "JM8A3N1", "Conditional"),
            "C57BL/6N-A/a",
        ))?;

        let line = store.create_cell_line(CellLine::mutant(
            "EPD0059_1_A05",
            "C57BL/6N-A/a",
            "EUCOMM",
            derivation,
        ))?;

        let allele = store.create_allele(sample_allele("Pax6<tm1a(EUCOMM)Wtsi>", "35505"))?;
        store.associate_cell_line(allele, line)?;

        assert!(store.cell_line_by_name("EPD0059_1_A05")?.is_some());
        assert_eq!(store.allele_cell_lines()?, vec![(allele, line)]);

        Ok(())
    }

    #[test]
    fn test_writes_against_missing_entities_fail() {
        let mut store = MemoryStore::new();

        let err = store
            .associate_cell_line(AlleleKey(99), CellLineKey(100))
            .unwrap_err();
        assert_eq!(err.to_string(), "no such allele in store: 99");

        let err = store
            .update_allele_note(AlleleKey(99), Note::new("x", "load", "load"))
            .unwrap_err();
        assert_eq!(err.to_string(), "no such allele in store: 99");
    }
}
