//! The deletion file layout.
//!
//! Columns:
//!
//! ```text
//! 0   mutant cell line
//! 1   parental cell line
//! 2   strain
//! 3   project id
//! 4   gene symbol
//! 5   gene id
//! 6   deletion start
//! 7   deletion end
//! 8   deletion size
//! 9   genome build
//! 10  cassette
//! ```

use crate::config;
use crate::model::MutationType;
use crate::provider::Interpreter;
use crate::provider::Reject;
use crate::record::Fields;
use crate::record::Record;

/// The number of columns a deletion row has.
const NUM_FIELDS: usize = 11;

/// Screens and canonicalizes a deletion-layout row.
pub(super) fn interpret(interpreter: &Interpreter, row: &[String]) -> Result<Record, Reject> {
    if row.is_empty() || row[0].is_empty() {
        return Err(Reject::NonData);
    }

    if row[0] == "CloneID" || row[0].starts_with('#') {
        return Err(Reject::NonData);
    }

    if row.len() < NUM_FIELDS {
        return Err(Reject::ShortRow(row.len()));
    }

    // A comma in the gene symbol means one clone knocked out more than one
    // marker; those are curated by hand.
    let symbol = row[4].trim();
    if symbol.contains(',') {
        return Err(Reject::MultiGene(symbol.to_string()));
    }

    let parental = row[1].trim();
    if !config::parental_is_specified(parental) {
        return Err(Reject::MissingParental);
    }

    let mutant_cell_line = row[0].trim();
    interpreter.screen_prefix(mutant_cell_line)?;

    let start = parse(&row[6])?;
    let end = parse(&row[7])?;
    if start == 0 || end == 0 {
        return Err(Reject::MissingCoordinates);
    }

    Ok(Record::from(Fields {
        gene_id: row[5].trim().to_string(),
        build: row[9].trim().to_string(),
        cassette: row[10].trim().to_string(),
        project_id: row[3].trim().to_string(),
        mutant_cell_line: mutant_cell_line.to_string(),
        parent_cell_line: config::normalize_parental(parental),
        mutation_type: MutationType::Deletion,
        mutation_subtype: None,
        locus1: start,
        locus2: end,
    }))
}

/// Parses one coordinate.
fn parse(value: &str) -> Result<i64, Reject> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| Reject::BadNumber(value.to_string()))
}
