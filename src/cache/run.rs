//! The set of caches a load run works against.

use std::collections::HashMap;

use crate::cache::LookupCache;
use crate::config::normalize_parental;
use crate::model::AlleleKey;
use crate::model::CellLineKey;
use crate::model::DerivationKey;
use crate::model::DerivationSignature;
use crate::store;
use crate::store::Store;

/// An allele as seen by the by-marker cache.
#[derive(Clone, Debug)]
pub struct MarkerAllele {
    /// The allele key.
    pub key: AlleleKey,

    /// The allele symbol.
    pub symbol: String,
}

/// An allele as seen by the by-project cache.
#[derive(Clone, Debug)]
pub struct ProjectAllele {
    /// The allele key.
    pub key: AlleleKey,

    /// The allele symbol.
    pub symbol: String,

    /// The normalized name of the parental cell line the allele's mutant
    /// cell lines derive from, when resolvable.
    pub parent: Option<String>,

    /// The names of the mutant cell lines associated with the allele.
    pub mutant_cell_lines: Vec<String>,
}

/// The caches for one load run.
///
/// The allele, project, and derivation caches are full: they are populated
/// by one scan each before the first record is processed, and every write
/// the run performs is pushed back into them so later records observe it.
/// The cell-line cache is lazy; most mutant cell lines in the registry are
/// other providers' and will never be asked for.
#[derive(Debug)]
pub struct RunCaches {
    /// Alleles grouped by marker identifier.
    alleles_by_marker: LookupCache<Vec<MarkerAllele>>,

    /// Alleles grouped by pipeline project identifier.
    alleles_by_project: LookupCache<Vec<ProjectAllele>>,

    /// Derivation keys by signature.
    derivations: LookupCache<DerivationKey>,

    /// Cell-line keys by name.
    cell_lines: LookupCache<CellLineKey>,
}

impl RunCaches {
    /// Populates the full caches from the store.
    pub fn populate(store: &dyn Store) -> store::Result<Self> {
        let mut derivations = LookupCache::full();
        let mut derivations_by_key = HashMap::new();

        for (key, derivation) in store.derivations()? {
            derivations.put(&derivation.signature().to_string(), key);
            derivations_by_key.insert(key, derivation);
        }

        // Mutant cell lines per allele, resolved once so each allele's
        // parental line can be read off its lines' derivations.
        let mut lines_by_allele: HashMap<AlleleKey, Vec<(CellLineKey, String, Option<String>)>> =
            HashMap::new();

        for (allele_key, line_key) in store.allele_cell_lines()? {
            if let Some(line) = store.cell_line(line_key)? {
                let parent = derivations_by_key
                    .get(&line.derivation())
                    .map(|derivation| normalize_parental(derivation.signature().parent()));

                lines_by_allele.entry(allele_key).or_default().push((
                    line_key,
                    line.name().to_string(),
                    parent,
                ));
            }
        }

        let mut alleles_by_marker = LookupCache::<Vec<MarkerAllele>>::full();
        let mut alleles_by_project = LookupCache::<Vec<ProjectAllele>>::full();

        for (key, allele) in store.alleles()? {
            let entry = MarkerAllele {
                key,
                symbol: allele.symbol().to_string(),
            };

            match alleles_by_marker.get_mut(allele.marker_id()) {
                Some(existing) => existing.push(entry),
                None => alleles_by_marker.put(allele.marker_id(), vec![entry]),
            }

            if allele.project_id().is_empty() {
                continue;
            }

            let lines = lines_by_allele.remove(&key).unwrap_or_default();
            let parent = lines.iter().find_map(|(_, _, parent)| parent.clone());

            let entry = ProjectAllele {
                key,
                symbol: allele.symbol().to_string(),
                parent,
                mutant_cell_lines: lines.into_iter().map(|(_, name, _)| name).collect(),
            };

            match alleles_by_project.get_mut(allele.project_id()) {
                Some(existing) => existing.push(entry),
                None => alleles_by_project.put(allele.project_id(), vec![entry]),
            }
        }

        Ok(Self {
            alleles_by_marker,
            alleles_by_project,
            derivations,
            cell_lines: LookupCache::lazy(),
        })
    }

    /// Gets the alleles known for a marker.
    pub fn marker_alleles(&self, marker_id: &str) -> &[MarkerAllele] {
        self.alleles_by_marker
            .get(marker_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Gets the alleles known for a pipeline project.
    pub fn project_alleles(&self, project_id: &str) -> &[ProjectAllele] {
        self.alleles_by_project
            .get(project_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates over the pipeline project identifiers known to the cache,
    /// paired with their alleles.
    pub fn projects(&self) -> impl Iterator<Item = (&str, &[ProjectAllele])> {
        self.alleles_by_project
            .keys()
            .map(|key| (key, self.project_alleles(key)))
    }

    /// Gets the derivation key for a signature, if one exists.
    pub fn derivation(&self, signature: &DerivationSignature) -> Option<DerivationKey> {
        self.derivations.get(&signature.to_string()).copied()
    }

    /// Records a derivation created during the run.
    pub fn record_derivation(&mut self, signature: &DerivationSignature, key: DerivationKey) {
        self.derivations.put(&signature.to_string(), key);
    }

    /// Gets the key for a cell line by name, consulting the store at most
    /// once per distinct name.
    pub fn cell_line(
        &mut self,
        name: &str,
        store: &dyn Store,
    ) -> store::Result<Option<CellLineKey>> {
        let key = self.cell_lines.get_or_query(name, || {
            store
                .cell_line_by_name(name)
                .map(|found| found.map(|(key, _)| key))
        })?;

        Ok(key.copied())
    }

    /// Records a cell line created during the run.
    pub fn record_cell_line(&mut self, name: &str, key: CellLineKey) {
        self.cell_lines.put(name, key);
    }

    /// Records an allele created during the run, making it visible to every
    /// later record in the same input.
    pub fn record_allele(
        &mut self,
        marker_id: &str,
        project_id: &str,
        key: AlleleKey,
        symbol: &str,
        parent: Option<String>,
        mutant_cell_line: &str,
    ) {
        let entry = MarkerAllele {
            key,
            symbol: symbol.to_string(),
        };

        match self.alleles_by_marker.get_mut(marker_id) {
            Some(existing) => existing.push(entry),
            None => self.alleles_by_marker.put(marker_id, vec![entry]),
        }

        let entry = ProjectAllele {
            key,
            symbol: symbol.to_string(),
            parent,
            mutant_cell_lines: vec![mutant_cell_line.to_string()],
        };

        match self.alleles_by_project.get_mut(project_id) {
            Some(existing) => existing.push(entry),
            None => self.alleles_by_project.put(project_id, vec![entry]),
        }
    }

    /// Records a mutant cell line attached during the run to an allele the
    /// registry already held.
    pub fn record_association(&mut self, project_id: &str, key: AlleleKey, cell_line: &str) {
        if let Some(alleles) = self.alleles_by_project.get_mut(project_id) {
            if let Some(allele) = alleles.iter_mut().find(|allele| allele.key == key) {
                allele.mutant_cell_lines.push(cell_line.to_string());
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::model::Allele;
    use crate::model::CellLine;
    use crate::model::Derivation;
    use crate::model::Note;
    use crate::model::allele::AlleleType;
    use crate::store::memory::MemoryStore;

    /// Seeds a store with one project allele and its mutant cell line.
    fn seeded_store() -> MemoryStore {
        let mut store = MemoryStore::new();

        let derivation = store
            .create_derivation(Derivation::new(
                DerivationSignature::new("L1L2_Bact_P", "Wtsi", "JM8A3.N1", "Conditional"),
                "C57BL/6N-A/a",
            ))
            .unwrap();

        let line = store
            .create_cell_line(CellLine::mutant(
                "EPD0059_1_A05",
                "C57BL/6N-A/a",
                "EUCOMM",
                derivation,
            ))
            .unwrap();

        let allele = store
            .create_allele(
                Allele::builder()
                    .marker("MGI:97490", "Pax6")
                    .strain("C57BL/6N-A/a")
                    .symbol("Pax6<tm1a(EUCOMM)Wtsi>")
                    .name("targeted mutation 1a, Wellcome Trust Sanger Institute")
                    .allele_type(AlleleType::Conditional)
                    .note(Note::new("note", "tal_load", "tal_load"))
                    .push_mutation_type("Insertion")
                    .push_reference("J:157064")
                    .project_id("35505")
                    .try_build()
                    .unwrap(),
            )
            .unwrap();

        store.associate_cell_line(allele, line).unwrap();
        store
    }

    #[test]
    fn test_populate_resolves_parents_transitively() -> store::Result<()> {
        let store = seeded_store();
        let caches = RunCaches::populate(&store)?;

        let alleles = caches.project_alleles("35505");
        assert_eq!(alleles.len(), 1);
        assert_eq!(alleles[0].symbol, "Pax6<tm1a(EUCOMM)Wtsi>");
        assert_eq!(alleles[0].parent.as_deref(), Some("JM8A3N1"));
        assert_eq!(alleles[0].mutant_cell_lines, vec!["EPD0059_1_A05"]);

        assert_eq!(caches.marker_alleles("MGI:97490").len(), 1);
        assert!(caches.project_alleles("99999").is_empty());

        Ok(())
    }

    #[test]
    fn test_recorded_writes_are_visible() -> store::Result<()> {
        let store = seeded_store();
        let mut caches = RunCaches::populate(&store)?;

        caches.record_allele(
            "MGI:97490",
            "35505",
            AlleleKey(40),
            "Pax6<tm1e(EUCOMM)Wtsi>",
            Some("JM8N4".to_string()),
            "EPD0059_2_B01",
        );

        assert_eq!(caches.marker_alleles("MGI:97490").len(), 2);
        assert_eq!(caches.project_alleles("35505").len(), 2);

        caches.record_cell_line("EPD0059_2_B01", CellLineKey(41));
        assert_eq!(
            caches.cell_line("epd0059_2_b01", &store)?,
            Some(CellLineKey(41))
        );

        Ok(())
    }
}
