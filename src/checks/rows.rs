//! Per-row shape checks: blank rows, trailing delimiters and ragged rows.

use crate::issue::{Issue, IssueKind, MAX_SAMPLE_CHARS, truncate};
use crate::tokenizer::Row;

/// Longest value kept per field in a row sample.
const MAX_FIELD_SAMPLE_CHARS: usize = 30;

/// What the remaining per-row checks should do with a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowVerdict {
    /// The row takes part in quoting and value checks.
    Analyze(Option<Issue>),
    /// The row is excluded from quoting and value checks.
    Skip(Issue),
}

/// Check the shape of one data row against the header's effective width.
pub fn check_row(row: &Row<'_>, row_number: usize, column_count: usize) -> RowVerdict {
    if row.is_blank() {
        return RowVerdict::Skip(
            Issue::new(IssueKind::BlankRow, format!("Row {row_number} is blank")).at_row(row_number),
        );
    }

    let last_blank = row
        .fields
        .last()
        .is_some_and(|field| field.value.trim().is_empty());
    if last_blank {
        return RowVerdict::Analyze(Some(
            Issue::new(
                IssueKind::TrailingDelimiterRow,
                format!("Row {row_number} ends with an empty field (trailing delimiter)"),
            )
            .at_row(row_number)
            .with_sample(row_sample(row)),
        ));
    }

    if row.len() != column_count {
        return RowVerdict::Skip(
            Issue::new(
                IssueKind::RowWidthMismatch,
                format!(
                    "Row {row_number} has {} fields but the header has {column_count}",
                    row.len()
                ),
            )
            .at_row(row_number)
            .with_sample(row_sample(row)),
        );
    }

    RowVerdict::Analyze(None)
}

/// Sample of a row: fields truncated individually, joined with ` | `, and
/// truncated as a whole.
pub fn row_sample(row: &Row<'_>) -> String {
    let joined = row
        .values()
        .map(|value| truncate(value, MAX_FIELD_SAMPLE_CHARS))
        .collect::<Vec<_>>()
        .join(" | ");
    truncate(&joined, MAX_SAMPLE_CHARS)
}
