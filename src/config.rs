//! Load configuration.
//!
//! Configuration is a flat `KEY = VALUE` properties file. One file fully
//! describes a provider run: the load identity, the nomenclature templates,
//! the cassette and note tables, and the parental cell-line to strain
//! mapping. A missing key that a record needs is a per-record failure, not
//! a run failure; only an unreadable file aborts the run.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::model::MutationType;

/// The substring that marks a parental cell line as an internal-use
/// placeholder rather than real data.
const PLACEHOLDER_PARENTAL: &str = "[ENTERYOURDATAVALUE]";

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to a [`Config`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error occurred while reading the configuration file.
    Io(std::io::Error),

    /// A line was not of the form `KEY = VALUE`.
    MalformedLine(usize),

    /// A required key was absent.
    MissingKey(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::MalformedLine(number) => {
                write!(f, "malformed configuration line: line {number}")
            }
            Error::MissingKey(key) => write!(f, "missing configuration key: {key}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Configuration
////////////////////////////////////////////////////////////////////////////////////////

/// A parsed load configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// The key-value entries.
    entries: HashMap<String, String>,
}

impl Config {
    /// Reads a configuration from a properties file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(Error::Io)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Reads a configuration from a buffered reader.
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut entries = HashMap::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(Error::Io)?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or(Error::MalformedLine(i + 1))?;

            entries.insert(key.trim().to_string(), value.trim().to_string());
        }

        Ok(Self { entries })
    }

    /// Gets the value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    /// Gets the value for a key, failing if absent.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| Error::MissingKey(key.into()))
    }

    /// Gets a comma-separated list for a key. An absent key yields an empty
    /// list.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|value| {
                value
                    .split(',')
                    .map(|part| part.trim().to_string())
                    .filter(|part| !part.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    //======================================================================//
    // Identity
    //======================================================================//

    /// Gets the identity under which the load writes.
    pub fn load_identity(&self) -> Result<&str> {
        self.require("LOAD_IDENTITY")
    }

    /// Gets the pipeline name as it appears inside allele symbols (e.g.,
    /// `EUCOMM`).
    pub fn pipeline(&self) -> Result<&str> {
        self.require("PIPELINE")
    }

    /// Gets the provider lab code as it appears inside allele symbols
    /// (e.g., `Wtsi`).
    pub fn labcode(&self) -> Result<&str> {
        self.require("PROVIDER_LABCODE")
    }

    /// Gets the provider tag that closes every symbol this load constructs,
    /// `(PIPELINE)Labcode`.
    pub fn provider_tag(&self) -> Result<String> {
        Ok(format!("({}){}", self.pipeline()?, self.labcode()?))
    }

    /// Gets the creating lab recorded on derivations.
    pub fn creator(&self) -> Result<&str> {
        self.require("CREATOR")
    }

    /// Gets the logical database for project accessions.
    pub fn project_logical_db(&self) -> Result<&str> {
        self.require("PROJECT_LOGICAL_DB")
    }

    /// Gets the logical database for mutant cell-line accessions.
    pub fn cell_line_logical_db(&self) -> Result<&str> {
        self.require("CELLLINE_LOGICAL_DB")
    }

    //======================================================================//
    // Nomenclature
    //======================================================================//

    /// Gets the allele symbol template.
    pub fn symbol_template(&self) -> Result<&str> {
        self.require("SYMBOL_TEMPLATE")
    }

    /// Gets the allele name template.
    pub fn name_template(&self) -> Result<&str> {
        self.require("NAME_TEMPLATE")
    }

    /// Gets the literature references attached to new alleles.
    pub fn references(&self) -> Vec<String> {
        self.list("REFERENCES")
    }

    /// Gets the molecular mutation terms for a mutation type.
    pub fn mutation_terms(&self, mutation_type: MutationType) -> Vec<String> {
        self.list(&format!("MUTATION_TYPES_{}", mutation_type.config_key()))
    }

    /// Gets the letter suffix appended to sequence numbers for a mutation
    /// type. An empty value means no suffix.
    pub fn sequence_suffix(&self, mutation_type: MutationType) -> Result<&str> {
        self.require(&format!(
            "SEQUENCE_SUFFIX_{}",
            mutation_type.config_key()
        ))
    }

    //======================================================================//
    // Cassettes and notes
    //======================================================================//

    /// Gets the cassettes whose reporter is driven by its own promoter.
    pub fn promoter_driven_cassettes(&self) -> Vec<String> {
        self.list("CASSETTES_PROMOTER_DRIVEN")
    }

    /// Gets the cassettes whose reporter relies on the gene's own promoter.
    pub fn promoter_less_cassettes(&self) -> Vec<String> {
        self.list("CASSETTES_PROMOTER_LESS")
    }

    /// Gets the cassettes that carry no reporter at all.
    pub fn no_reporter_cassettes(&self) -> Vec<String> {
        self.list("CASSETTES_NO_REPORTER")
    }

    /// Gets the promoter name for a promoter-driven cassette.
    pub fn promoter(&self, cassette: &str) -> Result<&str> {
        self.require(&format!("PROMOTER_{}", cassette.to_uppercase()))
    }

    /// Gets a molecular note template.
    ///
    /// `category` is one of `PROMOTER_DRIVEN`, `PROMOTER_LESS`, or
    /// `NO_REPORTER`; `artificial_intron` selects the artificial-intron
    /// variant of the template.
    pub fn note_template(
        &self,
        mutation_type: MutationType,
        category: &str,
        artificial_intron: bool,
    ) -> Result<&str> {
        let key = if artificial_intron {
            format!("NOTE_{}_{}_AI", mutation_type.config_key(), category)
        } else {
            format!("NOTE_{}_{}", mutation_type.config_key(), category)
        };

        self.require(&key)
    }

    //======================================================================//
    // Parental cell lines
    //======================================================================//

    /// Gets the strain for a parental cell line.
    ///
    /// The lookup key is the normalized parental name: uppercased, with
    /// whitespace and `( ) / ? .` stripped.
    pub fn parental_strain(&self, parental: &str) -> Option<&str> {
        self.get(&format!("PARENTAL_{}", normalize_parental(parental)))
    }

    /// Gets the cell-line name prefixes this load knows how to interpret.
    pub fn known_prefixes(&self) -> Vec<String> {
        self.list("KNOWN_CELLLINE_PREFIXES")
    }

    /// Gets the cell-line name prefixes this load is allowed to process.
    pub fn allowed_prefixes(&self) -> Vec<String> {
        self.list("ALLOWED_CELLLINE_PREFIXES")
    }
}

/// Normalizes a parental cell-line name for lookup: uppercase, with
/// whitespace and `( ) / ? .` stripped.
///
/// # Examples
///
/// ```
/// use alleleload::config::normalize_parental;
///
/// assert_eq!(normalize_parental("JM8 parental"), "JM8PARENTAL");
/// assert_eq!(normalize_parental("JM8.N4"), "JM8N4");
/// ```
pub fn normalize_parental(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '(' | ')' | '/' | '?' | '.'))
        .collect::<String>()
        .to_uppercase()
}

/// Returns whether a raw parental cell-line field holds real data, as
/// opposed to one of the placeholder values providers emit for unfilled
/// fields.
pub fn parental_is_specified(raw: &str) -> bool {
    let trimmed = raw.trim();
    !trimmed.is_empty() && trimmed != "-" && !trimmed.contains(PLACEHOLDER_PARENTAL)
}
