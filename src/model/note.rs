//! A molecular note and its provenance.

/// A molecular note attached to an allele.
///
/// The note is one logical text field; if a backing store chunks long
/// notes, reassembly is that store's concern. Provenance records who wrote
/// the note and who touched it last: the reconciler only overwrites a note
/// whose provenance shows no curator involvement.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Note {
    /// The note text.
    text: String,

    /// The identity that created the note.
    created_by: String,

    /// The identity that last modified the note.
    modified_by: String,
}

impl Note {
    /// Creates a new note.
    pub fn new(
        text: impl Into<String>,
        created_by: impl Into<String>,
        modified_by: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            created_by: created_by.into(),
            modified_by: modified_by.into(),
        }
    }

    /// Gets the note text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Gets the identity that created the note.
    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    /// Gets the identity that last modified the note.
    pub fn modified_by(&self) -> &str {
        &self.modified_by
    }

    /// Returns whether both the creator and the last modifier of this note
    /// are the given load identity.
    pub fn owned_by(&self, identity: &str) -> bool {
        self.created_by == identity && self.modified_by == identity
    }

    /// Returns whether this note's text matches another text, ignoring
    /// whitespace.
    ///
    /// Stored notes accumulate incidental spacing differences (wrapping,
    /// trailing spaces) that must not register as drift.
    ///
    /// # Examples
    ///
    /// ```
    /// use alleleload::model::Note;
    ///
    /// let note = Note::new("insertion of  a cassette\n", "load", "load");
    /// assert!(note.matches("insertion of a cassette"));
    /// assert!(!note.matches("insertion of a vector"));
    /// ```
    pub fn matches(&self, other: &str) -> bool {
        compress(&self.text) == compress(other)
    }
}

/// Strips all whitespace from a note text for comparison.
fn compress(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
