//! Cross-row check that each column is quoted consistently.

use super::header::Header;
use crate::issue::{Issue, IssueKind};
use crate::tokenizer::Row;

#[derive(Debug, Clone, Copy, Default)]
struct ColumnQuoting {
    first_quoted: Option<usize>,
    first_unquoted: Option<usize>,
}

/// Tracks, per column, the first row seen quoted and the first row seen unquoted.
#[derive(Debug, Clone)]
pub struct QuotingTracker {
    columns: Vec<ColumnQuoting>,
}

impl QuotingTracker {
    pub fn new(column_count: usize) -> Self {
        Self {
            columns: vec![ColumnQuoting::default(); column_count],
        }
    }

    /// Record the raw quoting style of each field in `row`.
    ///
    /// A field is quoted iff its raw text begins with `"`, so an empty cell
    /// counts as unquoted. Fields beyond the header's width are ignored.
    pub fn observe(&mut self, row: &Row<'_>, row_number: usize) {
        for (idx, column) in self.columns.iter_mut().enumerate() {
            let Some(raw) = row.raw_field(idx) else {
                break;
            };
            let slot = if raw.starts_with('"') {
                &mut column.first_quoted
            } else {
                &mut column.first_unquoted
            };
            slot.get_or_insert(row_number);
        }
    }

    /// One issue per column seen both quoted and unquoted.
    pub fn finish(self, header: &Header) -> Vec<Issue> {
        self.columns
            .iter()
            .enumerate()
            .filter_map(|(idx, column)| {
                let (quoted, unquoted) = (column.first_quoted?, column.first_unquoted?);
                let label = match header.name(idx) {
                    Some(name) => format!("Column '{name}'"),
                    None => format!("Column {}", idx + 1),
                };
                Some(
                    Issue::new(
                        IssueKind::InconsistentQuoting,
                        format!(
                            "{label} is inconsistently quoted: first quoted at row {quoted}, first unquoted at row {unquoted}"
                        ),
                    )
                    .at_row(quoted.max(unquoted))
                    .in_column_opt(header.name(idx)),
                )
            })
            .collect()
    }
}
