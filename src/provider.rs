//! Provider input interpretation.
//!
//! Each provider ships one of two file layouts: the *targeted* layout used
//! by the high-throughput knockout pipelines and the *deletion* layout used
//! by the deletion pipelines. An [`Interpreter`] screens each raw row and,
//! when the row belongs to this run and is well formed, canonicalizes it
//! into a [`Record`](crate::record::Record).
//!
//! Rejections are expected in normal operation (the targeted files carry
//! every pipeline's rows, for instance), so they are counted and traced but
//! never abort the run.

use std::str::FromStr;

use crate::config;
use crate::config::Config;
use crate::record::Record;

pub mod deletion;
pub mod targeted;

////////////////////////////////////////////////////////////////////////////////////////
// Families
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to the parsing of a [`Family`].
#[derive(Debug)]
pub struct ParseFamilyError(String);

impl std::fmt::Display for ParseFamilyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is not a known provider family", self.0)
    }
}

impl std::error::Error for ParseFamilyError {}

/// A provider file family.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Family {
    /// The targeted-knockout layout.
    Targeted,

    /// The deletion layout.
    Deletion,
}

impl FromStr for Family {
    type Err = ParseFamilyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "targeted" => Ok(Self::Targeted),
            "deletion" => Ok(Self::Deletion),
            v => Err(ParseFamilyError(v.into())),
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Family::Targeted => write!(f, "targeted"),
            Family::Deletion => write!(f, "deletion"),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Rejections
////////////////////////////////////////////////////////////////////////////////////////

/// The reason a raw row was screened out.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Reject {
    /// The row is a header, a comment, or otherwise not data.
    NonData,

    /// The row had too few columns.
    ShortRow(usize),

    /// The row belongs to a different pipeline.
    ForeignPipeline(String),

    /// The cell-line name prefix is not one this load knows.
    UnknownPrefix(String),

    /// The cell-line name prefix is known but not enabled for this run.
    DisallowedPrefix(String),

    /// The parental cell-line field held no real data.
    MissingParental,

    /// The project identifier was not numeric.
    BadProjectId(String),

    /// The mutation type was not one this load handles.
    UnknownMutationType(String),

    /// The gene symbol named more than one gene.
    MultiGene(String),

    /// No usable genomic coordinates were supplied.
    MissingCoordinates,

    /// A numeric field failed to parse.
    BadNumber(String),
}

impl std::fmt::Display for Reject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reject::NonData => write!(f, "row is not data"),
            Reject::ShortRow(n) => write!(f, "row has only {n} columns"),
            Reject::ForeignPipeline(p) => write!(f, "row belongs to pipeline {p}"),
            Reject::UnknownPrefix(name) => {
                write!(f, "unknown cell-line prefix: {name}")
            }
            Reject::DisallowedPrefix(name) => {
                write!(f, "cell-line prefix not enabled for this run: {name}")
            }
            Reject::MissingParental => write!(f, "no parental cell line supplied"),
            Reject::BadProjectId(id) => write!(f, "project id is not numeric: {id}"),
            Reject::UnknownMutationType(t) => write!(f, "unknown mutation type: {t}"),
            Reject::MultiGene(symbol) => {
                write!(f, "row names more than one gene: {symbol}")
            }
            Reject::MissingCoordinates => write!(f, "no genomic coordinates supplied"),
            Reject::BadNumber(value) => write!(f, "not a number: {value}"),
        }
    }
}

impl std::error::Error for Reject {}

////////////////////////////////////////////////////////////////////////////////////////
// The interpreter
////////////////////////////////////////////////////////////////////////////////////////

/// A provider row interpreter.
#[derive(Clone, Debug)]
pub struct Interpreter {
    /// The file family.
    family: Family,

    /// The pipeline name, matched against the pipeline column of targeted
    /// rows.
    pipeline: String,

    /// The cell-line prefixes the load knows how to interpret.
    known_prefixes: Vec<String>,

    /// The cell-line prefixes enabled for this run.
    allowed_prefixes: Vec<String>,
}

impl Interpreter {
    /// Creates a new interpreter from the run configuration.
    pub fn new(family: Family, config: &Config) -> config::Result<Self> {
        Ok(Self {
            family,
            pipeline: config.pipeline()?.to_string(),
            known_prefixes: config.known_prefixes(),
            allowed_prefixes: config.allowed_prefixes(),
        })
    }

    /// Gets the file family.
    pub fn family(&self) -> Family {
        self.family
    }

    /// Screens and canonicalizes a raw row.
    pub fn interpret(&self, row: &[String]) -> Result<Record, Reject> {
        match self.family {
            Family::Targeted => targeted::interpret(self, row),
            Family::Deletion => deletion::interpret(self, row),
        }
    }

    /// Screens a mutant cell-line name against the prefix lists.
    ///
    /// Provider ids arrive in either case, so the comparison ignores it.
    fn screen_prefix(&self, name: &str) -> Result<(), Reject> {
        let prefix: String = name.chars().take_while(|c| c.is_ascii_alphabetic()).collect();

        if !self
            .known_prefixes
            .iter()
            .any(|known| known.eq_ignore_ascii_case(&prefix))
        {
            return Err(Reject::UnknownPrefix(name.to_string()));
        }

        if !self
            .allowed_prefixes
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&prefix))
        {
            return Err(Reject::DisallowedPrefix(name.to_string()));
        }

        Ok(())
    }
}
