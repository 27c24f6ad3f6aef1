//! Per-record identity resolution.
//!
//! The resolver drives one input record through a small state machine:
//! screen it, resolve its external references, then decide between three
//! outcomes keyed on how many alleles the record's project already owns.
//! Zero means the record describes a new targeting event and an allele is
//! created; exactly one means the registry already knows the event and the
//! record is reconciled against it; more than one is a pre-existing data
//! inconsistency that only a curator can untangle, so the record is
//! reported and skipped.
//!
//! Records are processed strictly in input order, and every write lands in
//! the run caches before the next record is considered. Sequence numbering
//! depends on this: a record creating `tm1a` must be visible to the next
//! record of the same project so it reuses `1` instead of claiming `2`.

use std::collections::HashSet;

use crate::cache::RunCaches;
use crate::compose;
use crate::config;
use crate::config::Config;
use crate::model::Accession;
use crate::model::Allele;
use crate::model::AlleleKey;
use crate::model::CellLine;
use crate::model::CellLineKey;
use crate::model::Derivation;
use crate::model::DerivationKey;
use crate::model::DerivationSignature;
use crate::model::Marker;
use crate::model::MutationType;
use crate::model::Note;
use crate::model::allele::AlleleType;
use crate::provider::Family;
use crate::provider::Interpreter;
use crate::provider::Reject;
use crate::record::Record;
use crate::report::Finding;
use crate::report::Level;
use crate::report::Report;
use crate::report::labels;
use crate::sequence::Assigner;
use crate::sequence::Token;
use crate::store;
use crate::store::Store;

mod reconcile;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error that occurs while constructing a [`Resolver`].
#[derive(Debug)]
pub enum Error {
    /// The configuration is missing something the run needs up front.
    Config(config::Error),

    /// The store could not be scanned.
    Store(store::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Config(err) => write!(f, "{err}"),
            Error::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<config::Error> for Error {
    fn from(err: config::Error) -> Self {
        Error::Config(err)
    }
}

impl From<store::Error> for Error {
    fn from(err: store::Error) -> Self {
        Error::Store(err)
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Outcomes
////////////////////////////////////////////////////////////////////////////////////////

/// Why a record was skipped.
#[derive(Debug)]
pub enum Skip {
    /// The row failed the provider's screening.
    Screened(Reject),

    /// The row's mutant cell line already appeared earlier in this input.
    Duplicate(String),

    /// The marker identifier resolved to nothing.
    UnknownMarker(String),

    /// The marker has been withdrawn.
    WithdrawnMarker(String),

    /// The parental cell line has no configured strain.
    UnknownParent(String),

    /// The configured strain is not in the registry.
    UnknownStrain(String),

    /// No molecular note could be composed.
    Note(compose::Error),

    /// The configuration is missing something this record needs.
    Config(config::Error),

    /// Another record in this run already claimed the same sequence token
    /// for the same marker.
    DuplicateToken(String),

    /// The project's cached allele is gone from the store.
    MissingAllele(AlleleKey),

    /// The project already owns more than one allele.
    Ambiguous(String),
}

impl std::fmt::Display for Skip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Skip::Screened(reject) => write!(f, "{reject}"),
            Skip::Duplicate(name) => write!(f, "duplicate mutant cell line: {name}"),
            Skip::UnknownMarker(id) => write!(f, "unknown marker: {id}"),
            Skip::WithdrawnMarker(id) => write!(f, "withdrawn marker: {id}"),
            Skip::UnknownParent(name) => {
                write!(f, "no strain configured for parental cell line: {name}")
            }
            Skip::UnknownStrain(name) => write!(f, "unknown strain: {name}"),
            Skip::Note(err) => write!(f, "{err}"),
            Skip::Config(err) => write!(f, "{err}"),
            Skip::DuplicateToken(token) => {
                write!(f, "sequence token already assigned this run: {token}")
            }
            Skip::MissingAllele(key) => write!(f, "allele vanished from store: {key}"),
            Skip::Ambiguous(project) => {
                write!(f, "project owns multiple alleles: {project}")
            }
        }
    }
}

/// The outcome of resolving one input row.
#[derive(Debug)]
pub enum Outcome {
    /// A new allele and mutant cell line were created.
    Created {
        /// The new allele.
        allele: AlleleKey,

        /// The new mutant cell line.
        cell_line: CellLineKey,
    },

    /// The record was reconciled against the project's existing allele.
    Reconciled {
        /// The existing allele.
        allele: AlleleKey,
    },

    /// The record was skipped.
    Skipped(Skip),
}

////////////////////////////////////////////////////////////////////////////////////////
// The resolver
////////////////////////////////////////////////////////////////////////////////////////

/// The per-record resolver for one load run.
#[derive(Debug)]
pub struct Resolver<'a> {
    /// The run configuration.
    config: &'a Config,

    /// The provider row interpreter.
    interpreter: Interpreter,

    /// The sequence assigner.
    assigner: Assigner,

    /// The run caches.
    caches: RunCaches,

    /// The identity under which this run writes.
    load_identity: String,

    /// The provider tag that closes this run's symbols.
    provider_tag: String,

    /// Mutant cell-line names seen in this input, canonicalized to
    /// uppercase.
    seen_cell_lines: HashSet<String>,

    /// Project identifiers seen in this input, canonicalized to uppercase.
    seen_projects: HashSet<String>,

    /// Projects already reconciled in this run.
    reconciled: HashSet<String>,

    /// `(marker, token)` pairs claimed by alleles created this run.
    assigned_tokens: HashSet<(String, String)>,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver for one run, scanning the store to populate the
    /// full caches.
    pub fn new(family: Family, config: &'a Config, store: &dyn Store) -> Result<Self, Error> {
        Ok(Self {
            interpreter: Interpreter::new(family, config)?,
            assigner: Assigner::new(family, config)?,
            caches: RunCaches::populate(store)?,
            load_identity: config.load_identity()?.to_string(),
            provider_tag: config.provider_tag()?,
            config,
            seen_cell_lines: HashSet::new(),
            seen_projects: HashSet::new(),
            reconciled: HashSet::new(),
            assigned_tokens: HashSet::new(),
        })
    }

    /// Resolves one raw input row.
    ///
    /// Everything short of a store failure is absorbed into an
    /// [`Outcome`]; a store failure aborts the run.
    pub fn process(
        &mut self,
        store: &mut dyn Store,
        report: &mut Report,
        row: &[String],
    ) -> store::Result<Outcome> {
        report.record(Level::Summary, labels::INPUT_RECORDS);

        let record = match self.interpreter.interpret(row) {
            Ok(record) => record,
            // Headers and rows for prefixes deliberately switched off are
            // routine; they are filtered without touching the counters.
            Err(reject @ (Reject::NonData | Reject::DisallowedPrefix(_))) => {
                return Ok(Outcome::Skipped(Skip::Screened(reject)));
            }
            Err(reject) => {
                tracing::debug!("row screened out: {reject}");
                report.record(Level::Warning, labels::SKIPPED_RECORDS);
                return Ok(Outcome::Skipped(Skip::Screened(reject)));
            }
        };

        report.record(Level::Summary, labels::VALID_RECORDS);
        report.record(Level::Summary, mutation_type_label(record.mutation_type()));

        self.seen_projects
            .insert(record.project_id().to_uppercase());

        if !self
            .seen_cell_lines
            .insert(record.mutant_cell_line().to_uppercase())
        {
            tracing::warn!(
                "duplicate mutant cell line in input: {}",
                record.mutant_cell_line()
            );
            report.record(Level::Warning, labels::DUPLICATE_RECORDS);
            return Ok(Outcome::Skipped(Skip::Duplicate(
                record.mutant_cell_line().to_string(),
            )));
        }

        self.resolve(store, report, &record)
    }

    /// Resolves a screened record.
    fn resolve(
        &mut self,
        store: &mut dyn Store,
        report: &mut Report,
        record: &Record,
    ) -> store::Result<Outcome> {
        // External references first: a record that cannot name its marker,
        // parental line, or strain cannot be loaded at all.
        let marker = match store.marker_by_id(record.gene_id())? {
            Some(marker) => marker,
            None => {
                report.record(Level::Error, labels::UNKNOWN_MARKER);
                return Ok(Outcome::Skipped(Skip::UnknownMarker(
                    record.gene_id().to_string(),
                )));
            }
        };

        if marker.is_withdrawn() {
            report.record(Level::Error, labels::WITHDRAWN_MARKER);
            return Ok(Outcome::Skipped(Skip::WithdrawnMarker(
                record.gene_id().to_string(),
            )));
        }

        let strain = match self.config.parental_strain(record.parent_cell_line()) {
            Some(strain) => strain.to_string(),
            None => {
                tracing::warn!(
                    "no strain configured for parental cell line {}",
                    record.parent_cell_line()
                );
                report.record(Level::Error, labels::UNKNOWN_PARENT);
                return Ok(Outcome::Skipped(Skip::UnknownParent(
                    record.parent_cell_line().to_string(),
                )));
            }
        };

        if !store.strain_exists(&strain)? {
            report.record(Level::Error, labels::UNKNOWN_STRAIN);
            return Ok(Outcome::Skipped(Skip::UnknownStrain(strain)));
        }

        // Decide by how many alleles the project already owns before
        // computing anything else for the record. The caches include
        // alleles created earlier in this same run.
        let candidates = self.caches.project_alleles(record.project_id());

        if candidates.len() > 1 {
            let symbols: Vec<String> = candidates
                .iter()
                .map(|allele| allele.symbol.clone())
                .collect();

            tracing::warn!(
                "project {} owns {} alleles; skipping record",
                record.project_id(),
                symbols.len()
            );
            report.record(Level::Warning, labels::AMBIGUOUS_PROJECT);
            report.finding(Finding::AmbiguousProject {
                project_id: record.project_id().to_string(),
                symbols,
            });

            return Ok(Outcome::Skipped(Skip::Ambiguous(
                record.project_id().to_string(),
            )));
        }

        let existing = candidates.first().map(|allele| allele.key);

        let token = match self.assigner.token(record, &self.caches, self.config) {
            Ok(token) => token,
            Err(err) => {
                report.record(Level::Error, labels::MISSING_CONFIGURATION);
                return Ok(Outcome::Skipped(Skip::Config(err)));
            }
        };

        let note = match compose::note(record, &marker, self.config) {
            Ok(note) => note,
            Err(err) => {
                tracing::warn!("cannot compose note for {}: {err}", record.mutant_cell_line());
                report.record(Level::Error, labels::NO_NOTE);
                return Ok(Outcome::Skipped(Skip::Note(err)));
            }
        };

        match existing {
            None => self.create(store, report, record, &marker, &strain, &token, note),
            Some(key) => {
                reconcile::reconcile(self, store, report, record, &marker, &strain, note, key)
            }
        }
    }

    /// Creates the allele, cell line, and supporting entities for a record
    /// whose project owns no allele yet.
    #[allow(clippy::too_many_arguments)]
    fn create(
        &mut self,
        store: &mut dyn Store,
        report: &mut Report,
        record: &Record,
        marker: &Marker,
        strain: &str,
        token: &Token,
        note: String,
    ) -> store::Result<Outcome> {
        // Tokens are claimed marker-wide within a run; two creations may
        // not collide even when their projects differ.
        let claim = (record.gene_id().to_string(), token.to_string());
        if self.assigned_tokens.contains(&claim) {
            report.record(Level::Error, labels::DUPLICATE_SYMBOL);
            return Ok(Outcome::Skipped(Skip::DuplicateToken(token.to_string())));
        }

        let allele_type = match self.allele_type(record) {
            Ok(allele_type) => allele_type,
            Err(err) => {
                report.record(Level::Error, labels::NO_NOTE);
                return Ok(Outcome::Skipped(Skip::Note(err)));
            }
        };

        let symbol = match self.config.symbol_template() {
            Ok(template) => expand(template, marker, token),
            Err(err) => {
                report.record(Level::Error, labels::MISSING_CONFIGURATION);
                return Ok(Outcome::Skipped(Skip::Config(err)));
            }
        };

        let name = match self.config.name_template() {
            Ok(template) => expand(template, marker, token),
            Err(err) => {
                report.record(Level::Error, labels::MISSING_CONFIGURATION);
                return Ok(Outcome::Skipped(Skip::Config(err)));
            }
        };

        let mut builder = Allele::builder()
            .marker(marker.id(), marker.symbol())
            .strain(strain)
            .symbol(&symbol)
            .name(&name)
            .allele_type(allele_type)
            .note(Note::new(
                note,
                &self.load_identity,
                &self.load_identity,
            ))
            .project_id(record.project_id());

        let terms = self.config.mutation_terms(record.mutation_type());
        if terms.is_empty() {
            report.record(Level::Error, labels::MISSING_CONFIGURATION);
            return Ok(Outcome::Skipped(Skip::Config(config::Error::MissingKey(
                format!("MUTATION_TYPES_{}", record.mutation_type().config_key()),
            ))));
        }
        for term in terms {
            builder = builder.push_mutation_type(term);
        }

        let references = self.config.references();
        if references.is_empty() {
            report.record(Level::Error, labels::MISSING_CONFIGURATION);
            return Ok(Outcome::Skipped(Skip::Config(config::Error::MissingKey(
                "REFERENCES".to_string(),
            ))));
        }
        for reference in references {
            builder = builder.push_reference(reference);
        }

        let allele = match builder.try_build() {
            Ok(allele) => allele,
            Err(err) => {
                // Every field was supplied above; treat a miss as a
                // configuration hole all the same.
                report.record(Level::Error, labels::MISSING_CONFIGURATION);
                return Ok(Outcome::Skipped(Skip::Config(config::Error::MissingKey(
                    err.to_string(),
                ))));
            }
        };

        let derivation = self.derivation(store, report, record, strain)?;
        let cell_line = self.create_cell_line(store, report, record, strain, derivation)?;

        let allele_key = store.create_allele(allele)?;
        store.associate_cell_line(allele_key, cell_line)?;
        report.record(Level::Summary, labels::ALLELES_CREATED);

        tracing::info!("created allele {symbol} for project {}", record.project_id());

        self.caches.record_allele(
            record.gene_id(),
            record.project_id(),
            allele_key,
            &symbol,
            Some(config::normalize_parental(record.parent_cell_line())),
            record.mutant_cell_line(),
        );
        self.assigned_tokens.insert(claim);

        // A freshly created allele needs no reconciliation this run; later
        // records for the same project only attach their cell lines.
        self.reconciled.insert(record.project_id().to_uppercase());

        Ok(Outcome::Created {
            allele: allele_key,
            cell_line,
        })
    }

    /// Determines the allele classification for a record.
    ///
    /// Targeted non-conditional records built from a reporter-less cassette
    /// keep the `e` in their symbol but still carry a LoxP-flanked region,
    /// so they are classified as conditional.
    fn allele_type(&self, record: &Record) -> compose::Result<AlleleType> {
        let category = compose::category(record.cassette(), self.config)?;

        Ok(match record.mutation_type() {
            MutationType::Conditional => AlleleType::Conditional,
            MutationType::Deletion => AlleleType::Deletion,
            MutationType::TargetedNonConditional => {
                if category == compose::Category::NoReporter {
                    AlleleType::Conditional
                } else {
                    AlleleType::NonConditional
                }
            }
        })
    }

    /// Gets or creates the derivation for a record.
    fn derivation(
        &mut self,
        store: &mut dyn Store,
        report: &mut Report,
        record: &Record,
        strain: &str,
    ) -> store::Result<DerivationKey> {
        let creator = self
            .config
            .creator()
            .unwrap_or(self.load_identity.as_str())
            .to_string();

        let signature = DerivationSignature::new(
            record.cassette(),
            creator,
            record.parent_cell_line(),
            record.mutation_type().to_string(),
        );

        if let Some(key) = self.caches.derivation(&signature) {
            return Ok(key);
        }

        let key = store.create_derivation(Derivation::new(signature.clone(), strain))?;
        report.record(Level::Summary, labels::DERIVATIONS_CREATED);
        self.caches.record_derivation(&signature, key);

        Ok(key)
    }

    /// Creates the mutant cell line for a record, along with its accession
    /// identifiers.
    fn create_cell_line(
        &mut self,
        store: &mut dyn Store,
        report: &mut Report,
        record: &Record,
        strain: &str,
        derivation: DerivationKey,
    ) -> store::Result<CellLineKey> {
        let pipeline = self.config.pipeline().unwrap_or_default().to_string();

        let key = store.create_cell_line(CellLine::mutant(
            record.mutant_cell_line(),
            strain,
            pipeline,
            derivation,
        ))?;
        report.record(Level::Summary, labels::CELL_LINES_CREATED);

        if let Ok(logical_db) = self.config.cell_line_logical_db() {
            store.create_accession(Accession::new(
                record.mutant_cell_line(),
                logical_db,
                key,
                true,
                false,
            ))?;
        }

        if let Ok(logical_db) = self.config.project_logical_db() {
            store.create_accession(Accession::new(
                record.project_id(),
                logical_db,
                key,
                false,
                true,
            ))?;
        }

        self.caches.record_cell_line(record.mutant_cell_line(), key);

        Ok(key)
    }

    /// Reports registry entries this run's input never mentioned.
    ///
    /// Only alleles carrying this run's provider tag are considered;
    /// everything else in the registry belongs to other loads.
    pub fn anomalies(&self, report: &mut Report) {
        for (project, alleles) in self.caches.projects() {
            let ours: Vec<_> = alleles
                .iter()
                .filter(|allele| allele.symbol.contains(&self.provider_tag))
                .collect();

            if ours.is_empty() {
                continue;
            }

            if !self.seen_projects.contains(project) {
                for allele in &ours {
                    report.orphan_project(allele.symbol.clone(), project);
                }
                continue;
            }

            for allele in &ours {
                for cell_line in &allele.mutant_cell_lines {
                    if !self.seen_cell_lines.contains(&cell_line.to_uppercase()) {
                        report.orphan_cell_line(allele.symbol.clone(), project, cell_line.clone());
                    }
                }
            }
        }
    }
}

/// Expands a nomenclature template for a marker and token.
fn expand(template: &str, marker: &Marker, token: &Token) -> String {
    template
        .replace("~~SYMBOL~~", marker.symbol())
        .replace("~~SEQUENCE~~", &token.to_string())
}

/// The per-mutation-type summary counter label.
fn mutation_type_label(mutation_type: MutationType) -> &'static str {
    match mutation_type {
        MutationType::Conditional => "Number of conditional input record(s)",
        MutationType::TargetedNonConditional => {
            "Number of targeted non-conditional input record(s)"
        }
        MutationType::Deletion => "Number of deletion input record(s)",
    }
}
