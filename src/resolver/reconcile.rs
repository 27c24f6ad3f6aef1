//! Reconciliation of a record against its project's existing allele.
//!
//! A project that already owns exactly one allele is reconciled at most
//! once per run: the note the load would write today is diffed against the
//! stored note, and marker drift is checked. The record's mutant cell line
//! is then attached to the existing allele if the registry does not know
//! it yet; this happens for every record, reconciled or not, because one
//! project produces many clones.

use crate::model::AlleleKey;
use crate::model::Marker;
use crate::model::Note;
use crate::record::Record;
use crate::report::Finding;
use crate::report::Level;
use crate::report::Report;
use crate::report::labels;
use crate::resolver::Outcome;
use crate::resolver::Resolver;
use crate::resolver::Skip;
use crate::store;
use crate::store::Store;

/// Reconciles one record against the single allele its project owns.
#[allow(clippy::too_many_arguments)]
pub(super) fn reconcile(
    resolver: &mut Resolver<'_>,
    store: &mut dyn Store,
    report: &mut Report,
    record: &Record,
    marker: &Marker,
    strain: &str,
    note: String,
    key: AlleleKey,
) -> store::Result<Outcome> {
    let allele = match store.allele(key)? {
        Some(allele) => allele,
        None => {
            // The cache said this key exists; a vanished allele means the
            // registry changed under the run.
            tracing::warn!("allele {key} is in the cache but not the store");
            report.record(Level::Error, labels::BAD_PROCESSING);
            return Ok(Outcome::Skipped(Skip::MissingAllele(key)));
        }
    };

    if resolver.reconciled.insert(record.project_id().to_uppercase()) {
        if allele.marker_id() != marker.id() {
            // The gene assignment itself moved. That is a curatorial
            // decision, never auto-corrected; the note is not compared
            // either, since it was composed against the input's marker.
            tracing::warn!(
                "marker mismatch for {}: input {}, registry {}",
                allele.symbol(),
                marker.id(),
                allele.marker_id()
            );
            report.record(Level::Warning, labels::MARKER_DRIFT);
            report.finding(Finding::MarkerDrift {
                symbol: allele.symbol().to_string(),
                input_marker: marker.id().to_string(),
                registry_marker: allele.marker_id().to_string(),
            });
        } else if !allele.note().matches(&note) {
            if allele.note().owned_by(&resolver.load_identity) {
                store.update_allele_note(
                    key,
                    Note::new(&note, &resolver.load_identity, &resolver.load_identity),
                )?;
                report.record(Level::Summary, labels::NOTES_UPDATED);
                report.finding(Finding::NoteUpdated {
                    symbol: allele.symbol().to_string(),
                });
                tracing::info!("molecular note for {} updated", allele.symbol());
            } else {
                report.record(Level::Warning, labels::NOTES_KEPT);
                report.finding(Finding::NoteKept {
                    symbol: allele.symbol().to_string(),
                    computed: note.clone(),
                });
                tracing::warn!(
                    "not updating curator-owned note for {}",
                    allele.symbol()
                );
            }
        }
    }

    // Attach this clone to the allele if the registry does not know it.
    let known = resolver
        .caches
        .cell_line(record.mutant_cell_line(), &*store)?;

    if known.is_none() {
        let derivation = resolver.derivation(store, report, record, strain)?;
        let cell_line =
            resolver.create_cell_line(store, report, record, strain, derivation)?;

        store.associate_cell_line(key, cell_line)?;
        resolver
            .caches
            .record_association(record.project_id(), key, record.mutant_cell_line());
    }

    Ok(Outcome::Reconciled { allele: key })
}
