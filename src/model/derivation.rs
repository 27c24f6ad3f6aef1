//! A cell-line derivation.
//!
//! A derivation identifies how a mutant cell line was produced: the
//! targeting vector (cassette), the creating lab, the parental cell line,
//! and the derivation type. Derivations are looked up by signature and
//! created at most once per distinct signature within a run.

/// The key assigned to a derivation by the store.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DerivationKey(pub u64);

impl std::fmt::Display for DerivationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identifying tuple of a derivation.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DerivationSignature {
    /// The targeting vector (cassette) name.
    vector: String,

    /// The creating lab.
    creator: String,

    /// The (normalized) parental cell-line name.
    parent: String,

    /// The derivation type.
    derivation_type: String,
}

impl DerivationSignature {
    /// Creates a new derivation signature.
    pub fn new(
        vector: impl Into<String>,
        creator: impl Into<String>,
        parent: impl Into<String>,
        derivation_type: impl Into<String>,
    ) -> Self {
        Self {
            vector: vector.into(),
            creator: creator.into(),
            parent: parent.into(),
            derivation_type: derivation_type.into(),
        }
    }

    /// Gets the targeting vector name.
    pub fn vector(&self) -> &str {
        &self.vector
    }

    /// Gets the creating lab.
    pub fn creator(&self) -> &str {
        &self.creator
    }

    /// Gets the parental cell-line name.
    pub fn parent(&self) -> &str {
        &self.parent
    }

    /// Gets the derivation type.
    pub fn derivation_type(&self) -> &str {
        &self.derivation_type
    }
}

impl std::fmt::Display for DerivationSignature {
    /// Formats the signature as the compound cache key
    /// `vector|creator|parent|type`.
    ///
    /// # Examples
    ///
    /// ```
    /// use alleleload::model::DerivationSignature;
    ///
    /// let sig = DerivationSignature::new("L1L2_Bact_P", "Wtsi", "JM8A3N1", "Conditional");
    /// assert_eq!(sig.to_string(), "L1L2_Bact_P|Wtsi|JM8A3N1|Conditional");
    /// ```
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.vector, self.creator, self.parent, self.derivation_type
        )
    }
}

/// A cell-line derivation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Derivation {
    /// The human-readable derivation name.
    name: String,

    /// The identifying signature.
    signature: DerivationSignature,

    /// The strain of the parental cell line.
    strain: String,
}

impl Derivation {
    /// Creates a new derivation.
    ///
    /// The display name is composed from the creator, the derivation type,
    /// the parental cell line, the strain, and the vector, in that order.
    pub fn new(signature: DerivationSignature, strain: impl Into<String>) -> Self {
        let strain = strain.into();
        let name = format!(
            "{} {} {} {} {}",
            signature.creator(),
            signature.derivation_type(),
            signature.parent(),
            strain,
            signature.vector()
        );

        Self {
            name,
            signature,
            strain,
        }
    }

    /// Gets the derivation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the identifying signature.
    pub fn signature(&self) -> &DerivationSignature {
        &self.signature
    }

    /// Gets the strain of the parental cell line.
    pub fn strain(&self) -> &str {
        &self.strain
    }
}
