//! Allele symbol sequence assignment.
//!
//! Every symbol this load constructs carries a `tm<number><letter>` token
//! (e.g. `tm1a` in `Pax6<tm1a(EUCOMM)Wtsi>`). The number identifies the
//! targeting attempt against the marker and the letter identifies the
//! mutation type. Numbers must be stable across runs: a project that
//! already owns an allele keeps its number, and a new project takes the
//! next free one.

use std::sync::LazyLock;

use regex::Regex;

use crate::cache::RunCaches;
use crate::config;
use crate::config::Config;
use crate::config::normalize_parental;
use crate::model::MutationType;
use crate::provider::Family;
use crate::record::Record;

/// The sequence token inside an allele symbol.
static SEQUENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"tm(\d{1,2})[a-z]?").unwrap());

/// Extracts the sequence number from an allele symbol, if the symbol
/// carries one.
///
/// # Examples
///
/// ```
/// use alleleload::sequence::extract;
///
/// assert_eq!(extract("Pax6<tm2a(EUCOMM)Wtsi>"), Some(2));
/// assert_eq!(extract("Pax6<Gt(ROSA)26Sor>"), None);
/// ```
pub fn extract(symbol: &str) -> Option<u32> {
    SEQUENCE
        .captures(symbol)
        .and_then(|captures| captures[1].parse().ok())
}

/// A fully assigned sequence token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    /// The sequence number.
    number: u32,

    /// The letter suffix. Empty for mutation types that take none.
    suffix: String,
}

impl Token {
    /// Gets the sequence number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Gets the letter suffix.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.number, self.suffix)
    }
}

/// A sequence assigner for one provider run.
#[derive(Clone, Debug)]
pub struct Assigner {
    /// The provider file family, which selects the numbering scheme.
    family: Family,

    /// The provider tag that closes this run's symbols.
    provider_tag: String,
}

impl Assigner {
    /// Creates a new assigner from the run configuration.
    pub fn new(family: Family, config: &Config) -> config::Result<Self> {
        Ok(Self {
            family,
            provider_tag: config.provider_tag()?,
        })
    }

    /// Assigns the sequence number for a record.
    ///
    /// In both schemes an allele already owned by the record's project
    /// keeps its number; the schemes differ in how a fresh number is
    /// chosen. The targeted scheme takes the highest number in use on the
    /// marker plus one, counting every allele regardless of provider. The
    /// deletion scheme numbers within the lab: one plus the count of the
    /// marker's alleles that carry this run's provider tag.
    pub fn number(&self, record: &Record, caches: &RunCaches) -> u32 {
        match self.family {
            Family::Targeted => self.targeted_number(record, caches),
            Family::Deletion => self.deletion_number(record, caches),
        }
    }

    /// The targeted numbering scheme.
    fn targeted_number(&self, record: &Record, caches: &RunCaches) -> u32 {
        let parent = normalize_parental(record.parent_cell_line());

        let reused = caches
            .project_alleles(record.project_id())
            .iter()
            .filter(|allele| allele.parent.as_deref() == Some(parent.as_str()))
            .find_map(|allele| extract(&allele.symbol));

        if let Some(number) = reused {
            return number;
        }

        caches
            .marker_alleles(record.gene_id())
            .iter()
            .filter_map(|allele| extract(&allele.symbol))
            .max()
            .map(|highest| highest + 1)
            .unwrap_or(1)
    }

    /// The deletion numbering scheme.
    fn deletion_number(&self, record: &Record, caches: &RunCaches) -> u32 {
        let reused = caches
            .project_alleles(record.project_id())
            .iter()
            .find_map(|allele| extract(&allele.symbol));

        if let Some(number) = reused {
            return number;
        }

        let ours = caches
            .marker_alleles(record.gene_id())
            .iter()
            .filter(|allele| allele.symbol.contains(&self.provider_tag))
            .count();

        ours as u32 + 1
    }

    /// Assigns the full token for a record, appending the configured letter
    /// suffix for its mutation type.
    pub fn token(
        &self,
        record: &Record,
        caches: &RunCaches,
        config: &Config,
    ) -> config::Result<Token> {
        let suffix = self.suffix(record.mutation_type(), config)?;

        Ok(Token {
            number: self.number(record, caches),
            suffix,
        })
    }

    /// Gets the letter suffix for a mutation type.
    fn suffix(&self, mutation_type: MutationType, config: &Config) -> config::Result<String> {
        config
            .sequence_suffix(mutation_type)
            .map(|suffix| suffix.to_string())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::cache::run::MarkerAllele;
    use crate::config::tests::sample_config;
    use crate::model::AlleleKey;
    use crate::model::CellLine;
    use crate::model::Derivation;
    use crate::model::DerivationSignature;
    use crate::model::MutationType;
    use crate::model::Note;
    use crate::model::allele::AlleleType;
    use crate::record::Fields;
    use crate::store::Store;
    use crate::store::memory::MemoryStore;

    fn record(project_id: &str, parent: &str) -> Record {
        Record::from(Fields {
            gene_id: "MGI:97490".to_string(),
            build: "GRCm38".to_string(),
            cassette: "L1L2_Bact_P".to_string(),
            project_id: project_id.to_string(),
            mutant_cell_line: "EPD0059_1_A05".to_string(),
            parent_cell_line: parent.to_string(),
            mutation_type: MutationType::Conditional,
            mutation_subtype: None,
            locus1: 100,
            locus2: 200,
        })
    }

    /// Seeds a registry holding `Pax6<tm1a(EUCOMM)Wtsi>` for project 35505
    /// out of parental JM8A3.N1.
    fn seeded_caches() -> RunCaches {
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
                crate::model::Allele::builder()
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
        RunCaches::populate(&store).unwrap()
    }

    fn assigner(family: Family) -> Assigner {
        Assigner::new(family, &sample_config()).unwrap()
    }

    #[test]
    fn test_extract() {
        assert_eq!(extract("Pax6<tm1a(EUCOMM)Wtsi>"), Some(1));
        assert_eq!(extract("Pax6<tm12e(KOMP)Vlcg>"), Some(12));
        assert_eq!(extract("Pax6<tm2(EUCOMM)Hmgu>"), Some(2));
        assert_eq!(extract("Pax6<em1Lutzy>"), None);
    }

    #[test]
    fn test_targeted_reuses_number_on_project_and_parent_match() {
        let caches = seeded_caches();

        let number = assigner(Family::Targeted).number(&record("35505", "JM8A3N1"), &caches);
        assert_eq!(number, 1);

        // Providers write the same parental line with or without the dot.
        let number = assigner(Family::Targeted).number(&record("35505", "JM8A3.N1"), &caches);
        assert_eq!(number, 1);
    }

    #[test]
    fn test_targeted_advances_past_highest_in_use() {
        let caches = seeded_caches();

        // Same project, different parental line: a new attempt.
        let number = assigner(Family::Targeted).number(&record("35505", "JM8N4"), &caches);
        assert_eq!(number, 2);

        // A different project entirely.
        let number = assigner(Family::Targeted).number(&record("48240", "JM8N4"), &caches);
        assert_eq!(number, 2);
    }

    #[test]
    fn test_targeted_starts_at_one_for_untouched_markers() {
        let caches = RunCaches::populate(&MemoryStore::new()).unwrap();

        let number = assigner(Family::Targeted).number(&record("35505", "JM8A3N1"), &caches);
        assert_eq!(number, 1);
    }

    #[test]
    fn test_deletion_counts_within_the_lab() {
        let mut caches = seeded_caches();

        // The seeded allele is (EUCOMM)Wtsi, so it counts toward this lab.
        let number = assigner(Family::Deletion).number(&record("VG10017", "VGB6"), &caches);
        assert_eq!(number, 2);

        // Another lab's allele does not.
        caches.record_allele(
            "MGI:97490",
            "84941",
            AlleleKey(50),
            "Pax6<tm1(KOMP)Vlcg>",
            None,
            "VG10017_A_B9",
        );

        let number = assigner(Family::Deletion).number(&record("VG10018", "VGB6"), &caches);
        assert_eq!(number, 2);
    }

    #[test]
    fn test_deletion_reuses_number_on_project_match() {
        let caches = seeded_caches();

        let number = assigner(Family::Deletion).number(&record("35505", "ANY"), &caches);
        assert_eq!(number, 1);
    }

    #[test]
    fn test_token_display() -> Result<(), Box<dyn std::error::Error>> {
        let caches = seeded_caches();
        let config = sample_config();

        let token =
            assigner(Family::Targeted).token(&record("48240", "JM8N4"), &caches, &config)?;
        assert_eq!(token.to_string(), "2a");

        Ok(())
    }

    #[test]
    fn test_token_reuses_number_across_mutation_types() -> Result<(), Box<dyn std::error::Error>> {
        let caches = seeded_caches();
        let config = sample_config();

        // A non-conditional attempt out of the same project and parental
        // line keeps the number of the conditional allele already created.
        let fields = Fields {
            gene_id: "MGI:97490".to_string(),
            build: "GRCm38".to_string(),
            cassette: "L1L2_Bact_P".to_string(),
            project_id: "35505".to_string(),
            mutant_cell_line: "EPD0059_2_B01".to_string(),
            parent_cell_line: "JM8A3N1".to_string(),
            mutation_type: MutationType::TargetedNonConditional,
            mutation_subtype: None,
            locus1: 100,
            locus2: 200,
        };

        let token =
            assigner(Family::Targeted).token(&Record::from(fields), &caches, &config)?;
        assert_eq!(token.to_string(), "1e");

        Ok(())
    }
}
