use serde::Serialize;

use crate::dialect::NewlineStyle;
use crate::issue::{Issue, Severity};

/// How far the analysis got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every validator ran.
    Completed { rows: usize, columns: usize },
    /// An unclosed quote stopped the analysis before rows were parsed.
    Aborted,
}

/// Format details sniffed from the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatInfo {
    pub encoding: &'static str,
    pub had_bom: bool,
    pub newline_style: NewlineStyle,
    pub delimiter: u8,
}

/// The immutable result of analyzing one file.
///
/// `row_count` and `column_count` are both `None` exactly when the analysis
/// was aborted by an unclosed quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Opaque correlation token.
    pub token: String,
    pub file_name: String,
    pub byte_size: usize,
    pub encoding: String,
    pub had_bom: bool,
    pub newline_style: NewlineStyle,
    pub delimiter: char,
    /// Number of data rows (after the header), blank rows included.
    pub row_count: Option<usize>,
    /// Effective column count of the header.
    pub column_count: Option<usize>,
    /// Issues sorted by severity, then row number.
    pub issues: Vec<Issue>,
}

impl AnalysisResult {
    pub fn new(
        token: String,
        file_name: impl Into<String>,
        byte_size: usize,
        format: &FormatInfo,
        outcome: Outcome,
        issues: Vec<Issue>,
    ) -> Self {
        let (row_count, column_count) = match outcome {
            Outcome::Completed { rows, columns } => (Some(rows), Some(columns)),
            Outcome::Aborted => (None, None),
        };

        Self {
            token,
            file_name: file_name.into(),
            byte_size,
            encoding: format.encoding.to_string(),
            had_bom: format.had_bom,
            newline_style: format.newline_style,
            delimiter: format.delimiter as char,
            row_count,
            column_count,
            issues,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match (self.row_count, self.column_count) {
            (Some(rows), Some(columns)) => Outcome::Completed { rows, columns },
            _ => Outcome::Aborted,
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.outcome() == Outcome::Aborted
    }

    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count_by_severity(Severity::Error) > 0
    }
}
