//! The mutation type carried by an input record.

use std::str::FromStr;

/// An error related to the parsing of a [`MutationType`].
#[derive(Debug)]
pub struct ParseMutationTypeError(String);

impl std::fmt::Display for ParseMutationTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is not a known mutation type", self.0)
    }
}

impl std::error::Error for ParseMutationTypeError {}

/// The mutation type of a targeting event.
///
/// The mutation type drives both the letter suffix of the sequence token
/// (via the configured suffix table) and the note template family.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MutationType {
    /// A conditional-ready ("knockout first") mutation.
    Conditional,

    /// A targeted, non-conditional mutation.
    TargetedNonConditional,

    /// A deletion mutation.
    Deletion,
}

impl MutationType {
    /// The configuration key fragment for this mutation type.
    ///
    /// Used to assemble configuration keys such as
    /// `SEQUENCE_SUFFIX_CONDITIONAL` and `NOTE_DELETION_PROMOTER_DRIVEN`.
    pub fn config_key(&self) -> &'static str {
        match self {
            MutationType::Conditional => "CONDITIONAL",
            MutationType::TargetedNonConditional => "NONCONDITIONAL",
            MutationType::Deletion => "DELETION",
        }
    }
}

impl FromStr for MutationType {
    type Err = ParseMutationTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Conditional" => Ok(Self::Conditional),
            "Targeted non-conditional" => Ok(Self::TargetedNonConditional),
            "Deletion" => Ok(Self::Deletion),
            v => Err(ParseMutationTypeError(v.into())),
        }
    }
}

impl std::fmt::Display for MutationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MutationType::Conditional => write!(f, "Conditional"),
            MutationType::TargetedNonConditional => write!(f, "Targeted non-conditional"),
            MutationType::Deletion => write!(f, "Deletion"),
        }
    }
}
