//! A load run.
//!
//! One run processes one provider file against one configuration: the
//! caches are populated, every row is resolved in input order, and the
//! quality-control report is assembled, ending with the registry entries
//! the input no longer mentions.

use std::io;

use crate::config::Config;
use crate::provider::Family;
use crate::report::Level;
use crate::report::Report;
use crate::report::labels;
use crate::resolver;
use crate::resolver::Resolver;
use crate::store;
use crate::store::Store;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to a load run.
///
/// A run only fails outright when its input cannot be read or the store
/// stops answering; every per-record problem is absorbed into the report.
#[derive(Debug)]
pub enum Error {
    /// The input could not be read.
    Io(io::Error),

    /// The resolver could not be constructed.
    Resolver(resolver::Error),

    /// The store failed mid-run.
    Store(store::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Resolver(err) => write!(f, "{err}"),
            Error::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// The run
////////////////////////////////////////////////////////////////////////////////////////

/// Runs one load against the store and returns the quality-control report.
pub fn run(
    family: Family,
    config: &Config,
    store: &mut dyn Store,
    rows: impl Iterator<Item = io::Result<Vec<String>>>,
) -> Result<Report> {
    let mut report = Report::new();

    // Zero the headline counters so they appear in the report even for an
    // empty input.
    report.record_quantity(Level::Summary, labels::ALLELES_CREATED, 0);
    report.record_quantity(Level::Summary, labels::CELL_LINES_CREATED, 0);

    let mut resolver = Resolver::new(family, config, &*store).map_err(Error::Resolver)?;

    for row in rows {
        let row = row.map_err(Error::Io)?;
        resolver
            .process(store, &mut report, &row)
            .map_err(Error::Store)?;
    }

    resolver.anomalies(&mut report);

    Ok(report)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::config::tests::sample_config;
    use crate::model::Allele;
    use crate::model::CellLine;
    use crate::model::Derivation;
    use crate::model::DerivationSignature;
    use crate::model::Marker;
    use crate::model::Note;
    use crate::model::allele::AlleleType;
    use crate::model::marker::MarkerStatus;
    use crate::store::memory::MemoryStore;

    /// A store seeded with the reference data every test needs.
    fn seeded_store() -> MemoryStore {
        let mut store = MemoryStore::new();

        store.insert_marker(Marker::new("MGI:97490", "Pax6", "2", MarkerStatus::Official));
        store.insert_marker(Marker::new("MGI:104735", "Elp4", "2", MarkerStatus::Official));
        store.insert_marker(Marker::new(
            "MGI:2137706",
            "Tm9sf2-old",
            "14",
            MarkerStatus::Withdrawn,
        ));
        store.insert_strain("C57BL/6N-A/a");
        store.insert_strain("C57BL/6N");

        store
    }

    /// Builds a targeted-layout row.
    fn row(
        project: &str,
        cell_line: &str,
        parental: &str,
        mutation_type: &str,
        cassette: &str,
    ) -> Vec<String> {
        let coords: &[&str] = if mutation_type == "Deletion" {
            &["105668900", "105671648"]
        } else {
            &["105668900", "105669013", "105671539", "105671648"]
        };

        let mut fields = vec![
            "MGI:97490".to_string(),
            "GRCm38".to_string(),
            cassette.to_string(),
            "\"EUCOMM\"".to_string(),
            project.to_string(),
            cell_line.to_string(),
            parental.to_string(),
            format!("Pax6_{cell_line}"),
            mutation_type.to_string(),
            String::new(),
        ];
        fields.extend(coords.iter().map(|c| c.to_string()));

        fields
    }

    /// Seeds an allele with one associated mutant cell line, returning the
    /// allele key.
    fn seed_allele(
        store: &mut MemoryStore,
        symbol: &str,
        project: &str,
        cell_line: &str,
        note: Note,
    ) -> crate::model::AlleleKey {
        let derivation = store
            .create_derivation(Derivation::new(
                DerivationSignature::new("L1L2_Bact_P", "Wtsi", "JM8A3N1", "Conditional"),
                "C57BL/6N-A/a",
            ))
            .unwrap();

        let line = store
            .create_cell_line(CellLine::mutant(
                cell_line,
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
                    .symbol(symbol)
                    .name("targeted mutation, Wellcome Trust Sanger Institute")
                    .allele_type(AlleleType::Conditional)
                    .note(note)
                    .push_mutation_type("Insertion")
                    .push_reference("J:157064")
                    .project_id(project)
                    .try_build()
                    .unwrap(),
            )
            .unwrap();

        store.associate_cell_line(allele, line).unwrap();
        allele
    }

    #[test]
    fn test_create_then_reconcile_then_create() -> Result<()> {
        let config = sample_config();
        let mut store = seeded_store();

        let rows = vec![
            // A new project: creates the marker's first allele, tm1a.
            row("35505", "EPD0059_1_A05", "JM8A3.N1", "Conditional Ready", "L1L2_Bact_P"),
            // The same project again: reconciled, no second allele.
            row(
                "35505",
                "EPD0059_2_B01",
                "JM8A3.N1",
                "Targeted Non Conditional",
                "L1L2_Bact_P",
            ),
            // A different project: numbering advances past the maximum.
            row("48240", "EPD0059_3_C01", "JM8.N4", "Deletion", "L1L2_gt0"),
        ];

        let report = run(
            Family::Targeted,
            &config,
            &mut store,
            rows.into_iter().map(Ok),
        )?;

        assert_eq!(report.count(Level::Summary, labels::VALID_RECORDS), 3);
        assert_eq!(report.count(Level::Summary, labels::ALLELES_CREATED), 2);
        assert_eq!(report.count(Level::Summary, labels::CELL_LINES_CREATED), 3);

        let alleles = store.alleles().map_err(Error::Store)?;
        let mut symbols: Vec<&str> = alleles.iter().map(|(_, a)| a.symbol()).collect();
        symbols.sort();
        assert_eq!(
            symbols,
            vec!["Pax6<tm1a(EUCOMM)Wtsi>", "Pax6<tm2(EUCOMM)Wtsi>"]
        );

        // Both cell lines of project 35505 hang off the one allele.
        assert_eq!(store.allele_cell_lines().map_err(Error::Store)?.len(), 3);

        // The composed note left no placeholder behind.
        let (_, tm1a) = alleles
            .iter()
            .find(|(_, a)| a.symbol().contains("tm1a"))
            .unwrap();
        assert!(!tm1a.note().text().contains("~~"));
        assert!(tm1a.note().text().contains("L1L2_Bact_P"));
        assert!(tm1a.note().text().contains("Chromosome 2"));
        assert!(tm1a.note().owned_by("tal_load"));

        Ok(())
    }

    #[test]
    fn test_rerunning_an_unchanged_input_is_idempotent() -> Result<()> {
        let config = sample_config();
        let mut store = seeded_store();

        let rows = vec![
            row("35505", "EPD0059_1_A05", "JM8A3.N1", "Conditional Ready", "L1L2_Bact_P"),
            row("48240", "EPD0059_3_C01", "JM8.N4", "Deletion", "L1L2_gt0"),
        ];

        run(
            Family::Targeted,
            &config,
            &mut store,
            rows.clone().into_iter().map(Ok),
        )?;

        let report = run(
            Family::Targeted,
            &config,
            &mut store,
            rows.into_iter().map(Ok),
        )?;

        assert_eq!(report.count(Level::Summary, labels::ALLELES_CREATED), 0);
        assert_eq!(report.count(Level::Summary, labels::CELL_LINES_CREATED), 0);
        assert_eq!(report.count(Level::Summary, labels::NOTES_UPDATED), 0);
        assert_eq!(store.alleles().map_err(Error::Store)?.len(), 2);

        Ok(())
    }

    #[test]
    fn test_ambiguous_project_is_reported_and_skipped() -> Result<()> {
        let config = sample_config();
        let mut store = seeded_store();

        let note = Note::new("seeded", "tal_load", "tal_load");
        seed_allele(
            &mut store,
            "Pax6<tm1a(EUCOMM)Wtsi>",
            "35505",
            "EPD0059_1_A05",
            note.clone(),
        );
        seed_allele(
            &mut store,
            "Pax6<tm2a(EUCOMM)Wtsi>",
            "35505",
            "EPD0059_2_B01",
            note,
        );

        let rows = vec![row(
            "35505",
            "EPD0059_3_C01",
            "JM8A3.N1",
            "Conditional Ready",
            "L1L2_Bact_P",
        )];

        let report = run(
            Family::Targeted,
            &config,
            &mut store,
            rows.into_iter().map(Ok),
        )?;

        assert_eq!(report.count(Level::Warning, labels::AMBIGUOUS_PROJECT), 1);
        assert_eq!(report.count(Level::Summary, labels::ALLELES_CREATED), 0);
        assert_eq!(store.alleles().map_err(Error::Store)?.len(), 2);

        Ok(())
    }

    #[test]
    fn test_ambiguity_is_decided_before_note_composition() -> Result<()> {
        let config = sample_config();
        let mut store = seeded_store();

        let note = Note::new("seeded", "tal_load", "tal_load");
        seed_allele(
            &mut store,
            "Pax6<tm1a(EUCOMM)Wtsi>",
            "35505",
            "EPD0059_1_A05",
            note.clone(),
        );
        seed_allele(
            &mut store,
            "Pax6<tm2a(EUCOMM)Wtsi>",
            "35505",
            "EPD0059_2_B01",
            note,
        );

        // The cassette is in no configured category, but the record never
        // gets that far: its project already owns two alleles.
        let rows = vec![row(
            "35505",
            "EPD0059_3_C01",
            "JM8A3.N1",
            "Conditional Ready",
            "L1L2_mystery",
        )];

        let report = run(
            Family::Targeted,
            &config,
            &mut store,
            rows.into_iter().map(Ok),
        )?;

        assert_eq!(report.count(Level::Warning, labels::AMBIGUOUS_PROJECT), 1);
        assert_eq!(report.count(Level::Error, labels::NO_NOTE), 0);

        Ok(())
    }

    #[test]
    fn test_colliding_symbol_sequences_are_skipped() -> Result<()> {
        // A symbol template with no sequence fragment defeats number
        // extraction, so every new project for the marker computes the
        // same token and the second creation must be refused.
        let config = crate::config::Config::from_reader(
            r#"
LOAD_IDENTITY = tal_load
PIPELINE = EUCOMM
PROVIDER_LABCODE = Wtsi
CREATOR = Wtsi
SYMBOL_TEMPLATE = ~~SYMBOL~~<em(EUCOMM)Wtsi>
NAME_TEMPLATE = targeted mutation ~~SEQUENCE~~, Wellcome Trust Sanger Institute
REFERENCES = J:157064
MUTATION_TYPES_CONDITIONAL = Insertion
SEQUENCE_SUFFIX_CONDITIONAL = a
CASSETTES_PROMOTER_DRIVEN = L1L2_Bact_P
PROMOTER_L1L2_BACT_P = human beta-actin
NOTE_CONDITIONAL_PROMOTER_DRIVEN = The ~~CASSETTE~~ cassette was inserted at position ~~LOCUS1~~ of Chromosome ~~CHROMOSOME~~ (Build ~~BUILD~~).
PARENTAL_JM8A3N1 = C57BL/6N-A/a
KNOWN_CELLLINE_PREFIXES = EPD
ALLOWED_CELLLINE_PREFIXES = EPD
"#
            .as_bytes(),
        )
        .unwrap();

        let mut store = seeded_store();

        let rows = vec![
            row("35505", "EPD0059_1_A05", "JM8A3.N1", "Conditional Ready", "L1L2_Bact_P"),
            row("48240", "EPD0059_2_B01", "JM8A3.N1", "Conditional Ready", "L1L2_Bact_P"),
        ];

        let report = run(
            Family::Targeted,
            &config,
            &mut store,
            rows.into_iter().map(Ok),
        )?;

        assert_eq!(report.count(Level::Summary, labels::ALLELES_CREATED), 1);
        assert_eq!(report.count(Level::Error, labels::DUPLICATE_SYMBOL), 1);

        Ok(())
    }

    #[test]
    fn test_curator_owned_note_is_kept() -> Result<()> {
        let config = sample_config();
        let mut store = seeded_store();

        let key = seed_allele(
            &mut store,
            "Pax6<tm1a(EUCOMM)Wtsi>",
            "35505",
            "EPD0059_1_A05",
            Note::new("a curator wrote this", "tal_load", "curator_smith"),
        );

        let rows = vec![row(
            "35505",
            "EPD0059_1_A05",
            "JM8A3.N1",
            "Conditional Ready",
            "L1L2_Bact_P",
        )];

        let report = run(
            Family::Targeted,
            &config,
            &mut store,
            rows.into_iter().map(Ok),
        )?;

        assert_eq!(report.count(Level::Warning, labels::NOTES_KEPT), 1);
        assert_eq!(report.count(Level::Summary, labels::NOTES_UPDATED), 0);

        let allele = store.allele(key).map_err(Error::Store)?.unwrap();
        assert_eq!(allele.note().text(), "a curator wrote this");
        assert!(report
            .to_string()
            .contains("NOT UPDATING molecular note for Pax6<tm1a(EUCOMM)Wtsi>"));

        Ok(())
    }

    #[test]
    fn test_load_owned_note_is_overwritten() -> Result<()> {
        let config = sample_config();
        let mut store = seeded_store();

        let key = seed_allele(
            &mut store,
            "Pax6<tm1a(EUCOMM)Wtsi>",
            "35505",
            "EPD0059_1_A05",
            Note::new("stale note from a previous run", "tal_load", "tal_load"),
        );

        let rows = vec![row(
            "35505",
            "EPD0059_1_A05",
            "JM8A3.N1",
            "Conditional Ready",
            "L1L2_Bact_P",
        )];

        let report = run(
            Family::Targeted,
            &config,
            &mut store,
            rows.into_iter().map(Ok),
        )?;

        assert_eq!(report.count(Level::Summary, labels::NOTES_UPDATED), 1);

        let allele = store.allele(key).map_err(Error::Store)?.unwrap();
        assert!(allele.note().text().contains("L1L2_Bact_P"));
        assert!(allele.note().owned_by("tal_load"));

        Ok(())
    }

    #[test]
    fn test_marker_drift_is_reported_but_never_corrected() -> Result<()> {
        let config = sample_config();
        let mut store = seeded_store();

        let key = seed_allele(
            &mut store,
            "Pax6<tm1a(EUCOMM)Wtsi>",
            "35505",
            "EPD0059_1_A05",
            Note::new("seeded", "tal_load", "tal_load"),
        );

        // The input now says this project targets Elp4.
        let mut drifted = row(
            "35505",
            "EPD0059_2_B01",
            "JM8A3.N1",
            "Conditional Ready",
            "L1L2_Bact_P",
        );
        drifted[0] = "MGI:104735".to_string();

        let report = run(
            Family::Targeted,
            &config,
            &mut store,
            vec![drifted].into_iter().map(Ok),
        )?;

        assert_eq!(report.count(Level::Warning, labels::MARKER_DRIFT), 1);

        let allele = store.allele(key).map_err(Error::Store)?.unwrap();
        assert_eq!(allele.marker_id(), "MGI:97490");
        // Drift suppresses the note comparison.
        assert_eq!(allele.note().text(), "seeded");

        Ok(())
    }

    #[test]
    fn test_bad_references_are_counted_and_skipped() -> Result<()> {
        let config = sample_config();
        let mut store = seeded_store();

        let rows = vec![
            // Unknown marker.
            {
                let mut r = row(
                    "35505",
                    "EPD0059_1_A05",
                    "JM8A3.N1",
                    "Conditional Ready",
                    "L1L2_Bact_P",
                );
                r[0] = "MGI:999999".to_string();
                r
            },
            // Withdrawn marker.
            {
                let mut r = row(
                    "35506",
                    "EPD0059_2_B01",
                    "JM8A3.N1",
                    "Conditional Ready",
                    "L1L2_Bact_P",
                );
                r[0] = "MGI:2137706".to_string();
                r
            },
            // Parental cell line with no configured strain.
            row(
                "35507",
                "EPD0059_3_C01",
                "XY99",
                "Conditional Ready",
                "L1L2_Bact_P",
            ),
            // Cassette in no configured category.
            row(
                "35508",
                "EPD0059_4_D01",
                "JM8A3.N1",
                "Conditional Ready",
                "L1L2_mystery",
            ),
        ];

        let report = run(
            Family::Targeted,
            &config,
            &mut store,
            rows.into_iter().map(Ok),
        )?;

        assert_eq!(report.count(Level::Error, labels::UNKNOWN_MARKER), 1);
        assert_eq!(report.count(Level::Error, labels::WITHDRAWN_MARKER), 1);
        assert_eq!(report.count(Level::Error, labels::UNKNOWN_PARENT), 1);
        assert_eq!(report.count(Level::Error, labels::NO_NOTE), 1);
        assert_eq!(report.count(Level::Summary, labels::ALLELES_CREATED), 0);

        Ok(())
    }

    #[test]
    fn test_duplicate_cell_lines_within_one_input_are_skipped() -> Result<()> {
        let config = sample_config();
        let mut store = seeded_store();

        let rows = vec![
            row("35505", "EPD0059_1_A05", "JM8A3.N1", "Conditional Ready", "L1L2_Bact_P"),
            row("35505", "epd0059_1_a05", "JM8A3.N1", "Conditional Ready", "L1L2_Bact_P"),
        ];

        let report = run(
            Family::Targeted,
            &config,
            &mut store,
            rows.into_iter().map(Ok),
        )?;

        assert_eq!(report.count(Level::Warning, labels::DUPLICATE_RECORDS), 1);
        assert_eq!(report.count(Level::Summary, labels::CELL_LINES_CREATED), 1);

        Ok(())
    }

    #[test]
    fn test_registry_entries_absent_from_input_become_anomalies() -> Result<()> {
        let config = sample_config();
        let mut store = seeded_store();

        seed_allele(
            &mut store,
            "Pax6<tm1a(EUCOMM)Wtsi>",
            "35505",
            "EPD0059_1_A05",
            Note::new("seeded", "tal_load", "tal_load"),
        );

        // The input no longer mentions project 35505 at all.
        let rows: Vec<Vec<String>> = vec![];
        let report = run(
            Family::Targeted,
            &config,
            &mut store,
            rows.into_iter().map(Ok),
        )?;

        let rendered = report.to_string();
        assert!(rendered.contains("ANOMALIES"));
        assert!(rendered.contains("Pax6<tm1a(EUCOMM)Wtsi>\t35505"));

        Ok(())
    }

    #[test]
    fn test_screened_rows_do_not_reach_the_store() -> Result<()> {
        let config = sample_config();
        let mut store = seeded_store();

        let rows = vec![
            vec!["MGI ACCESSION ID".to_string(); 14],
            {
                let mut r = row(
                    "35505",
                    "EPD0059_1_A05",
                    "JM8A3.N1",
                    "Conditional Ready",
                    "L1L2_Bact_P",
                );
                r[3] = "\"KOMP\"".to_string();
                r
            },
        ];

        let report = run(
            Family::Targeted,
            &config,
            &mut store,
            rows.into_iter().map(Ok),
        )?;

        assert_eq!(report.count(Level::Summary, labels::VALID_RECORDS), 0);
        assert_eq!(report.count(Level::Warning, labels::SKIPPED_RECORDS), 1);
        assert!(store.alleles().map_err(Error::Store)?.is_empty());

        Ok(())
    }
}
