use std::fmt;

use serde::Serialize;

/// Severity of an issue, in descending priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Sort rank: Error=0, Warning=1, Info=2.
    pub const fn rank(&self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Info => "Info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of defect found in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    /// File starts with a UTF-8 byte-order mark.
    #[serde(rename = "UTF8_BOM")]
    Utf8Bom,
    /// Both LF and CRLF line endings are used.
    MixedLineEndings,
    /// The file ends inside a quoted field.
    UnclosedQuote,
    /// Tokenizing failed part way through the file.
    CsvParseFailed,
    /// Two header names are equal ignoring case and surrounding whitespace.
    DuplicateHeader,
    /// A header cell (other than the last) is blank.
    HeaderEmpty,
    /// The header ends with a delimiter, producing a blank last column.
    TrailingDelimiterHeader,
    /// A header name has leading or trailing whitespace.
    WhitespaceInHeaders,
    /// A data row has a different number of fields than the header.
    RowWidthMismatch,
    /// A data row ends with a blank field.
    TrailingDelimiterRow,
    /// A data row has only blank fields.
    BlankRow,
    /// A column is quoted in some rows and unquoted in others.
    InconsistentQuoting,
    /// A value looks like a date but no date layout accepts it.
    InvalidDate,
    /// A column mixes numbers, dates and text.
    ColumnTypeInstability,
}

impl IssueKind {
    /// Severity carried by every issue of this kind.
    pub const fn severity(&self) -> Severity {
        match self {
            IssueKind::UnclosedQuote
            | IssueKind::CsvParseFailed
            | IssueKind::DuplicateHeader
            | IssueKind::RowWidthMismatch => Severity::Error,
            IssueKind::MixedLineEndings
            | IssueKind::HeaderEmpty
            | IssueKind::TrailingDelimiterHeader
            | IssueKind::WhitespaceInHeaders
            | IssueKind::TrailingDelimiterRow
            | IssueKind::InconsistentQuoting
            | IssueKind::InvalidDate
            | IssueKind::ColumnTypeInstability => Severity::Warning,
            IssueKind::Utf8Bom | IssueKind::BlankRow => Severity::Info,
        }
    }

    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self {
            IssueKind::Utf8Bom => "UTF8_BOM",
            IssueKind::MixedLineEndings => "MIXED_LINE_ENDINGS",
            IssueKind::UnclosedQuote => "UNCLOSED_QUOTE",
            IssueKind::CsvParseFailed => "CSV_PARSE_FAILED",
            IssueKind::DuplicateHeader => "DUPLICATE_HEADER",
            IssueKind::HeaderEmpty => "HEADER_EMPTY",
            IssueKind::TrailingDelimiterHeader => "TRAILING_DELIMITER_HEADER",
            IssueKind::WhitespaceInHeaders => "WHITESPACE_IN_HEADERS",
            IssueKind::RowWidthMismatch => "ROW_WIDTH_MISMATCH",
            IssueKind::TrailingDelimiterRow => "TRAILING_DELIMITER_ROW",
            IssueKind::BlankRow => "BLANK_ROW",
            IssueKind::InconsistentQuoting => "INCONSISTENT_QUOTING",
            IssueKind::InvalidDate => "INVALID_DATE",
            IssueKind::ColumnTypeInstability => "COLUMN_TYPE_INSTABILITY",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single defect found during analysis.
///
/// Severity is derived from the kind, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(rename = "code")]
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    /// 1-based row number; the header is row 1.
    pub row_number: Option<usize>,
    pub column_name: Option<String>,
    pub sample: Option<String>,
}

impl Issue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        let message = message.into();
        debug_assert!(!message.is_empty(), "issue message must not be empty");
        Self {
            kind,
            severity: kind.severity(),
            message,
            row_number: None,
            column_name: None,
            sample: None,
        }
    }

    pub fn at_row(mut self, row: usize) -> Self {
        self.row_number = Some(row);
        self
    }

    pub fn in_column(mut self, name: impl Into<String>) -> Self {
        self.column_name = Some(name.into());
        self
    }

    /// Attach a column name when one could be resolved.
    pub fn in_column_opt(mut self, name: Option<&str>) -> Self {
        self.column_name = name.map(str::to_string);
        self
    }

    pub fn with_sample(mut self, sample: impl AsRef<str>) -> Self {
        self.sample = Some(truncate(sample.as_ref(), MAX_SAMPLE_CHARS));
        self
    }

    /// Ordering key: severity rank, then row with absent rows first.
    pub fn sort_key(&self) -> (u8, usize) {
        (self.severity.rank(), self.row_number.unwrap_or(0))
    }
}

/// Longest sample kept on an issue.
pub const MAX_SAMPLE_CHARS: usize = 200;

const ELLIPSIS: &str = "...";

/// Truncate to `max` characters, appending an ellipsis when shortened.
pub fn truncate(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => format!("{}{ELLIPSIS}", &value[..idx]),
        None => value.to_string(),
    }
}

/// Stable sort by severity then row number.
pub fn sort_issues(issues: &mut [Issue]) {
    issues.sort_by_key(Issue::sort_key);
}
