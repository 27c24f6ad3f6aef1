//! The quality-control report.
//!
//! Every run produces one report: counters grouped into error, warning,
//! and summary sections, narrative findings that need a curator's eye, and
//! end-of-run anomalies (registry entries the input no longer mentions).
//! The report is accumulated throughout the run and rendered once at the
//! end.

use std::collections::BTreeMap;

/// Counter labels shared across the crate.
pub mod labels {
    /// Input rows seen.
    pub const INPUT_RECORDS: &str = "Number of input records";

    /// Input rows that passed screening.
    pub const VALID_RECORDS: &str = "Number of valid input records";

    /// Rows screened out as malformed or foreign.
    pub const SKIPPED_RECORDS: &str = "Number of incorrectly formatted input records";

    /// Rows whose mutant cell line already appeared in this input.
    pub const DUPLICATE_RECORDS: &str = "Number of duplicate cell line records";

    /// Alleles created.
    pub const ALLELES_CREATED: &str = "Number of alleles created";

    /// Cell lines created.
    pub const CELL_LINES_CREATED: &str = "Number of cell lines created";

    /// Derivations created.
    pub const DERIVATIONS_CREATED: &str = "Number of derivations created";

    /// Molecular notes overwritten during reconciliation.
    pub const NOTES_UPDATED: &str = "Number of molecular notes updated";

    /// Rows whose marker identifier resolved to nothing.
    pub const UNKNOWN_MARKER: &str = "Number of records with unknown marker";

    /// Rows pointing at a withdrawn marker.
    pub const WITHDRAWN_MARKER: &str = "Number of records with withdrawn marker";

    /// Rows whose parental cell line has no configured strain.
    pub const UNKNOWN_PARENT: &str = "Number of records with unknown parental cell line";

    /// Rows whose strain is not in the registry.
    pub const UNKNOWN_STRAIN: &str = "Number of records with unknown strain";

    /// Rows for which no molecular note could be composed.
    pub const NO_NOTE: &str = "Number of records that can't generate a molecular note";

    /// Projects that resolved to more than one allele.
    pub const AMBIGUOUS_PROJECT: &str = "Number of projects with multiple alleles";

    /// Rows that would have duplicated another row's symbol.
    pub const DUPLICATE_SYMBOL: &str = "Number of records with duplicate symbol sequence";

    /// Rows whose note disagreed with a curator-owned note.
    pub const NOTES_KEPT: &str = "Number of molecular notes not updated";

    /// Rows that needed a configuration entry that is absent.
    pub const MISSING_CONFIGURATION: &str = "Number of records with missing configuration";

    /// Rows whose marker disagreed with the registry's marker for the
    /// project's allele.
    pub const MARKER_DRIFT: &str = "Number of records with marker mismatches";

    /// Rows that failed against the store mid-resolution.
    pub const BAD_PROCESSING: &str = "Number of records with bad allele processing";
}

/// The severity level of a counter.
///
/// Levels order the report sections: errors first, then warnings, then
/// summary counts.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Level {
    /// A condition that prevented records from loading.
    Error,

    /// A condition worth a curator's attention.
    Warning,

    /// A plain count of work performed.
    Summary,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Error => write!(f, "ERRORS"),
            Level::Warning => write!(f, "WARNINGS"),
            Level::Summary => write!(f, "SUMMARY"),
        }
    }
}

/// A narrative finding that needs a curator's eye.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Finding {
    /// A computed note disagreed with a curator-owned note, which the load
    /// must not overwrite.
    NoteKept {
        /// The allele symbol.
        symbol: String,

        /// The note the load would have written.
        computed: String,
    },

    /// A computed note replaced a load-owned note.
    NoteUpdated {
        /// The allele symbol.
        symbol: String,
    },

    /// The input and the registry disagree about which marker an allele
    /// belongs to.
    MarkerDrift {
        /// The allele symbol.
        symbol: String,

        /// The marker identifier the input supplied.
        input_marker: String,

        /// The marker identifier the registry holds.
        registry_marker: String,
    },

    /// A project resolved to more than one allele.
    AmbiguousProject {
        /// The project identifier.
        project_id: String,

        /// The symbols of the competing alleles.
        symbols: Vec<String>,
    },
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Finding::NoteKept { symbol, computed } => {
                write!(
                    f,
                    "NOT UPDATING molecular note for {symbol}; curated note differs from:\n{computed}"
                )
            }
            Finding::NoteUpdated { symbol } => {
                write!(f, "Molecular note for {symbol} updated")
            }
            Finding::MarkerDrift {
                symbol,
                input_marker,
                registry_marker,
            } => {
                write!(
                    f,
                    "Marker mismatch for {symbol}: input says {input_marker}, registry says {registry_marker}"
                )
            }
            Finding::AmbiguousProject {
                project_id,
                symbols,
            } => {
                write!(
                    f,
                    "Project {project_id} matches multiple alleles: {}",
                    symbols.join(", ")
                )
            }
        }
    }
}

/// The quality-control report for one run.
#[derive(Debug, Default)]
pub struct Report {
    /// The counters, grouped by level.
    stats: BTreeMap<Level, BTreeMap<String, u64>>,

    /// The narrative findings, in the order recorded.
    findings: Vec<Finding>,

    /// Registry projects the input never mentioned: `(symbol, project)`.
    orphan_projects: Vec<(String, String)>,

    /// Registry cell lines the input never mentioned:
    /// `(symbol, project, cell line)`.
    orphan_cell_lines: Vec<(String, String, String)>,
}

impl Report {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments a counter.
    pub fn record(&mut self, level: Level, label: &str) {
        *self
            .stats
            .entry(level)
            .or_default()
            .entry(label.to_string())
            .or_insert(0) += 1;
    }

    /// Sets a counter to a fixed quantity.
    pub fn record_quantity(&mut self, level: Level, label: &str, quantity: u64) {
        self.stats
            .entry(level)
            .or_default()
            .insert(label.to_string(), quantity);
    }

    /// Gets the value of a counter.
    pub fn count(&self, level: Level, label: &str) -> u64 {
        self.stats
            .get(&level)
            .and_then(|counters| counters.get(label))
            .copied()
            .unwrap_or(0)
    }

    /// Records a narrative finding.
    pub fn finding(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Gets the narrative findings recorded so far.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Records a registry project the input never mentioned.
    pub fn orphan_project(&mut self, symbol: impl Into<String>, project: impl Into<String>) {
        self.orphan_projects.push((symbol.into(), project.into()));
    }

    /// Records a registry cell line the input never mentioned.
    pub fn orphan_cell_line(
        &mut self,
        symbol: impl Into<String>,
        project: impl Into<String>,
        cell_line: impl Into<String>,
    ) {
        self.orphan_cell_lines
            .push((symbol.into(), project.into(), cell_line.into()));
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (level, counters) in &self.stats {
            writeln!(f, "\n{level}")?;

            for (label, count) in counters {
                writeln!(f, "{label}: {count}")?;
            }
        }

        if !self.findings.is_empty() {
            writeln!(f, "\nFINDINGS")?;

            for finding in &self.findings {
                writeln!(f, "{finding}")?;
            }
        }

        if !self.orphan_projects.is_empty() || !self.orphan_cell_lines.is_empty() {
            writeln!(f, "\nANOMALIES")?;
        }

        if !self.orphan_cell_lines.is_empty() {
            writeln!(
                f,
                "\nCell lines that exist in the registry, but not in the input file: {}",
                self.orphan_cell_lines.len()
            )?;
            writeln!(f, "\nAllele\tExisting Project\tCell Line")?;

            let mut sorted = self.orphan_cell_lines.clone();
            sorted.sort();

            for (symbol, project, cell_line) in sorted {
                writeln!(f, "{symbol}\t{project}\t{}", cell_line.to_uppercase())?;
            }
        }

        if !self.orphan_projects.is_empty() {
            writeln!(
                f,
                "\nProject IDs that exist in the registry, but not in the input file: {}",
                self.orphan_projects.len()
            )?;
            writeln!(f, "\nAllele\tExisting Project")?;

            let mut sorted = self.orphan_projects.clone();
            sorted.sort();

            for (symbol, project) in sorted {
                writeln!(f, "{symbol}\t{project}")?;
            }
        }

        Ok(())
    }
}
