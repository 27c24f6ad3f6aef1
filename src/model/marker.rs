//! A gene marker.
//!
//! Markers are read-only reference data: the load looks them up by their
//! stable external identifier and never creates them.

use std::str::FromStr;

/// An error related to the parsing of a [`MarkerStatus`].
#[derive(Debug)]
pub struct ParseMarkerStatusError(String);

impl std::fmt::Display for ParseMarkerStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is not a valid marker status", self.0)
    }
}

impl std::error::Error for ParseMarkerStatusError {}

/// The curation status of a marker.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MarkerStatus {
    /// The marker carries official, current nomenclature.
    Official,

    /// The marker has been withdrawn. Records pointing at a withdrawn
    /// marker cannot be loaded.
    Withdrawn,
}

impl FromStr for MarkerStatus {
    type Err = ParseMarkerStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "official" => Ok(Self::Official),
            "withdrawn" => Ok(Self::Withdrawn),
            v => Err(ParseMarkerStatusError(v.into())),
        }
    }
}

impl std::fmt::Display for MarkerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerStatus::Official => write!(f, "official"),
            MarkerStatus::Withdrawn => write!(f, "withdrawn"),
        }
    }
}

/// A gene marker.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Marker {
    /// The stable external identifier (e.g., `MGI:97490`).
    id: String,

    /// The official marker symbol (e.g., `Pax6`).
    symbol: String,

    /// The chromosome the marker sits on.
    chromosome: String,

    /// The curation status.
    status: MarkerStatus,
}

impl Marker {
    /// Creates a new marker.
    ///
    /// # Examples
    ///
    /// ```
    /// use alleleload::model::marker::Marker;
    /// use alleleload::model::marker::MarkerStatus;
    ///
    /// let marker = Marker::new("MGI:97490", "Pax6", "2", MarkerStatus::Official);
    /// assert_eq!(marker.symbol(), "Pax6");
    /// ```
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        chromosome: impl Into<String>,
        status: MarkerStatus,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            chromosome: chromosome.into(),
            status,
        }
    }

    /// Gets the stable external identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Gets the official symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Gets the chromosome.
    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    /// Gets the curation status.
    pub fn status(&self) -> MarkerStatus {
        self.status
    }

    /// Returns whether the marker has been withdrawn.
    pub fn is_withdrawn(&self) -> bool {
        self.status == MarkerStatus::Withdrawn
    }
}
