//! The targeted-knockout file layout.
//!
//! One file carries every pipeline's rows; the pipeline column decides
//! which rows belong to this run. Columns:
//!
//! ```text
//! 0   gene id
//! 1   genome build
//! 2   cassette
//! 3   pipeline
//! 4   project id
//! 5   mutant cell line
//! 6   parental cell line
//! 7   provider allele name
//! 8   mutation type
//! 9   mutation subtype
//! 10  insertion point 1 start
//! 11  insertion point 1 end
//! 12  insertion point 2 start (absent for deletions)
//! 13  insertion point 2 end   (absent for deletions)
//! ```

use crate::config;
use crate::model::MutationType;
use crate::provider::Interpreter;
use crate::provider::Reject;
use crate::record::Fields;
use crate::record::Record;

/// The number of columns a row must have up to the first coordinate pair.
const MIN_FIELDS: usize = 12;

/// The number of columns a row with both coordinate pairs has.
const FULL_FIELDS: usize = 14;

/// Screens and canonicalizes a targeted-layout row.
pub(super) fn interpret(interpreter: &Interpreter, row: &[String]) -> Result<Record, Reject> {
    if row.is_empty() || row[0].is_empty() {
        return Err(Reject::NonData);
    }

    if row[0] == "MGI ACCESSION ID" || row[0].starts_with('#') {
        return Err(Reject::NonData);
    }

    if row.len() < MIN_FIELDS {
        return Err(Reject::ShortRow(row.len()));
    }

    // One of a coordinate pair without the other.
    if row.len() == FULL_FIELDS - 1 || (row.len() == FULL_FIELDS && row[12].is_empty() != row[13].is_empty())
    {
        return Err(Reject::MissingCoordinates);
    }

    let project_id = row[4].trim();
    if project_id.parse::<u64>().is_err() {
        return Err(Reject::BadProjectId(project_id.to_string()));
    }

    // The pipeline column may be quoted.
    if !row[3].replace('"', "").contains(&interpreter.pipeline) {
        return Err(Reject::ForeignPipeline(row[3].clone()));
    }

    let parental = row[6].trim();
    if parental.contains(',') || !config::parental_is_specified(parental) {
        return Err(Reject::MissingParental);
    }

    let mutation_type = match row[8].as_str() {
        "Conditional Ready" => MutationType::Conditional,
        "Targeted Non Conditional" => MutationType::TargetedNonConditional,
        "Deletion" => MutationType::Deletion,
        other => return Err(Reject::UnknownMutationType(other.to_string())),
    };

    let mutant_cell_line = row[5].trim();
    interpreter.screen_prefix(mutant_cell_line)?;

    let first = parse_pair(&row[10], &row[11])?;
    let second = if row.len() == FULL_FIELDS && !row[12].is_empty() {
        Some(parse_pair(&row[12], &row[13])?)
    } else {
        None
    };

    let (locus1, locus2) = orient(first, second);

    let mutation_subtype = match row[9].trim() {
        "" => None,
        subtype => Some(subtype.to_string()),
    };

    Ok(Record::from(Fields {
        gene_id: row[0].trim().to_string(),
        build: row[1].trim().to_string(),
        cassette: row[2].trim().to_string(),
        project_id: project_id.to_string(),
        mutant_cell_line: mutant_cell_line.to_string(),
        parent_cell_line: config::normalize_parental(parental),
        mutation_type,
        mutation_subtype,
        locus1,
        locus2,
    }))
}

/// Parses one coordinate pair.
fn parse_pair(start: &str, end: &str) -> Result<(i64, i64), Reject> {
    let start = start
        .trim()
        .parse::<i64>()
        .map_err(|_| Reject::BadNumber(start.to_string()))?;
    let end = end
        .trim()
        .parse::<i64>()
        .map_err(|_| Reject::BadNumber(end.to_string()))?;

    Ok((start, end))
}

/// Orients the genomic coordinates.
///
/// With a single pair (a deletion row), the pair is taken as given. With
/// both pairs, the span is the overall min and max; negative-strand genes
/// are reported with their pairs descending, in which case the span is
/// emitted descending too.
fn orient(first: (i64, i64), second: Option<(i64, i64)>) -> (i64, i64) {
    match second {
        None => first,
        Some(second) => {
            let all = [first.0, first.1, second.0, second.1];
            let smallest = *all.iter().min().unwrap();
            let largest = *all.iter().max().unwrap();

            if first.0 > second.0 {
                (largest, smallest)
            } else {
                (smallest, largest)
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::config::tests::sample_config;
    use crate::provider::Family;

    /// A well-formed targeted row for the EUCOMM pipeline.
    pub fn sample_row() -> Vec<String> {
        [
            "MGI:97490",
            "GRCm38",
            "L1L2_Bact_P",
            "\"EUCOMM\"",
            "35505",
            "EPD0059_1_A05",
            "JM8A3.N1",
            "Pax6_A05",
            "Conditional Ready",
            "",
            "105668900",
            "105669013",
            "105671539",
            "105671648",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    fn interpreter() -> Interpreter {
        Interpreter::new(Family::Targeted, &sample_config()).unwrap()
    }

    #[test]
    fn test_interpret_well_formed_row() -> Result<(), Box<dyn std::error::Error>> {
        let record = interpreter().interpret(&sample_row())?;

        assert_eq!(record.gene_id(), "MGI:97490");
        assert_eq!(record.project_id(), "35505");
        assert_eq!(record.parent_cell_line(), "JM8A3N1");
        assert_eq!(record.mutation_type(), MutationType::Conditional);
        assert_eq!(record.locus1(), 105668900);
        assert_eq!(record.locus2(), 105671648);

        Ok(())
    }

    #[test]
    fn test_foreign_pipeline_rows_are_screened() {
        let mut row = sample_row();
        row[3] = "\"KOMP\"".to_string();

        assert_eq!(
            interpreter().interpret(&row),
            Err(Reject::ForeignPipeline("\"KOMP\"".to_string()))
        );
    }

    #[test]
    fn test_headers_and_comments_are_screened() {
        let mut row = sample_row();
        row[0] = "MGI ACCESSION ID".to_string();
        assert_eq!(interpreter().interpret(&row), Err(Reject::NonData));

        let mut row = sample_row();
        row[0] = "# produced 2011-06-01".to_string();
        assert_eq!(interpreter().interpret(&row), Err(Reject::NonData));
    }

    #[test]
    fn test_placeholder_parental_is_screened() {
        let mut row = sample_row();
        row[6] = "[ENTERYOURDATAVALUE]".to_string();

        assert_eq!(interpreter().interpret(&row), Err(Reject::MissingParental));
    }

    #[test]
    fn test_negative_strand_coordinates_stay_descending() -> Result<(), Box<dyn std::error::Error>>
    {
        let mut row = sample_row();
        row[10] = "105671539".to_string();
        row[11] = "105671648".to_string();
        row[12] = "105668900".to_string();
        row[13] = "105669013".to_string();

        let record = interpreter().interpret(&row)?;
        assert_eq!(record.locus1(), 105671648);
        assert_eq!(record.locus2(), 105668900);

        Ok(())
    }

    #[test]
    fn test_half_coordinate_pair_is_screened() {
        let mut row = sample_row();
        row[12] = String::new();

        assert_eq!(
            interpreter().interpret(&row),
            Err(Reject::MissingCoordinates)
        );
    }
}
