//! Molecular note composition.
//!
//! Every allele the load creates carries a molecular note describing the
//! targeting event. The note is chosen from configured templates by the
//! record's mutation type and its cassette's category, then placeholders of
//! the form `~~NAME~~` are filled in from the record and its marker. A
//! placeholder that survives substitution means the configuration and the
//! record disagree, and the record cannot be loaded.

use std::sync::LazyLock;

use regex::Regex;

use crate::config;
use crate::config::Config;
use crate::model::Marker;
use crate::model::MutationType;
use crate::record::Record;
use crate::record::UNSET_COORDINATE;

/// A placeholder inside a note template.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~~[A-Z0-9]+~~").unwrap());

/// The mutation subtype that selects the artificial-intron template
/// variants.
const ARTIFICIAL_INTRON: &str = "Artificial Intron";

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to note composition.
#[derive(Debug)]
pub enum Error {
    /// The record's cassette appears in none of the configured cassette
    /// categories.
    UnknownCassette(String),

    /// A template or promoter the record needs is not configured.
    Config(config::Error),

    /// A coordinate the template needs was never supplied.
    MissingCoordinates,

    /// A placeholder survived substitution.
    UnresolvedPlaceholder(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnknownCassette(cassette) => {
                write!(f, "cassette is not in any configured category: {cassette}")
            }
            Error::Config(err) => write!(f, "{err}"),
            Error::MissingCoordinates => write!(f, "record carries no usable coordinates"),
            Error::UnresolvedPlaceholder(placeholder) => {
                write!(f, "placeholder left unresolved in note: {placeholder}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<config::Error> for Error {
    fn from(err: config::Error) -> Self {
        Error::Config(err)
    }
}

/// A [`Result`](std::result::Result) with an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Cassette categories
////////////////////////////////////////////////////////////////////////////////////////

/// The reporter category of a cassette.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Category {
    /// The cassette reporter is driven by its own promoter.
    PromoterDriven,

    /// The cassette reporter relies on the targeted gene's promoter.
    PromoterLess,

    /// The cassette carries no reporter.
    NoReporter,
}

impl Category {
    /// The configuration key fragment for this category.
    fn config_key(&self) -> &'static str {
        match self {
            Category::PromoterDriven => "PROMOTER_DRIVEN",
            Category::PromoterLess => "PROMOTER_LESS",
            Category::NoReporter => "NO_REPORTER",
        }
    }
}

/// Categorizes a cassette by the configured cassette lists.
pub fn category(cassette: &str, config: &Config) -> Result<Category> {
    let matches = |list: Vec<String>| list.iter().any(|entry| entry == cassette);

    if matches(config.no_reporter_cassettes()) {
        Ok(Category::NoReporter)
    } else if matches(config.promoter_driven_cassettes()) {
        Ok(Category::PromoterDriven)
    } else if matches(config.promoter_less_cassettes()) {
        Ok(Category::PromoterLess)
    } else {
        Err(Error::UnknownCassette(cassette.to_string()))
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Composition
////////////////////////////////////////////////////////////////////////////////////////

/// Composes the molecular note for a record.
pub fn note(record: &Record, marker: &Marker, config: &Config) -> Result<String> {
    let category = category(record.cassette(), config)?;

    // The artificial-intron variants only exist for promoter-driven
    // insertions.
    let artificial_intron = category == Category::PromoterDriven
        && record.mutation_type() != MutationType::Deletion
        && record.mutation_subtype() == Some(ARTIFICIAL_INTRON);

    let template = config.note_template(
        record.mutation_type(),
        category.config_key(),
        artificial_intron,
    )?;

    if record.locus1() == UNSET_COORDINATE || record.locus2() == UNSET_COORDINATE {
        return Err(Error::MissingCoordinates);
    }

    let deletion_size = (record.locus2() - record.locus1()).abs();

    let mut note = template
        .replace("~~CASSETTE~~", record.cassette())
        .replace("~~LOCUS1~~", &record.locus1().to_string())
        .replace("~~LOCUS2~~", &record.locus2().to_string())
        .replace("~~CHROMOSOME~~", marker.chromosome())
        .replace("~~DELSIZE~~", &deletion_size.to_string())
        .replace("~~BUILD~~", record.build());

    if category == Category::PromoterDriven {
        note = note.replace("~~PROMOTER~~", config.promoter(record.cassette())?);
    }

    if let Some(placeholder) = PLACEHOLDER.find(&note) {
        return Err(Error::UnresolvedPlaceholder(placeholder.as_str().to_string()));
    }

    Ok(note)
}
