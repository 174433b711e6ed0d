//! Pre-flight scan for a file that ends inside a quoted field.

use crate::issue::{Issue, IssueKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Unquoted,
    InQuote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanClass {
    Quote,
    /// A quote immediately followed by another quote.
    DoubledQuote,
    Delimiter,
    Newline,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanAction {
    /// Record the current row and field as the open location.
    Open,
    /// Clear the open location.
    Close,
    /// Consume the second quote of a `""` pair.
    SkipNext,
    NextField,
    NextRow,
    /// Advance the row counter but keep the field index.
    NextRowInQuote,
    None,
}

fn scan_transition(state: ScanState, class: ScanClass) -> (ScanState, ScanAction) {
    use ScanAction::*;
    use ScanClass::*;
    use ScanState::*;

    match (state, class) {
        (Unquoted, Quote | DoubledQuote) => (InQuote, Open),
        (Unquoted, Delimiter) => (Unquoted, NextField),
        (Unquoted, Newline) => (Unquoted, NextRow),
        (Unquoted, Other) => (Unquoted, None),

        (InQuote, DoubledQuote) => (InQuote, SkipNext),
        (InQuote, Quote) => (Unquoted, Close),
        (InQuote, Newline) => (InQuote, NextRowInQuote),
        (InQuote, Delimiter | Other) => (InQuote, None),
    }
}

/// Location of a quote that was never closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenQuote {
    /// 1-based physical line where the quote opened.
    pub row: usize,
    /// 1-based field index within that line.
    pub field: usize,
    /// 1-based logical record where the quote opened; quoted newlines do not
    /// start a new record.
    pub record: usize,
}

/// Scan `text` and return where the last unterminated quote opened, if any.
///
/// Rows are counted on `\n`; `\r` is ignored.
pub fn find_unclosed_quote(text: &str, delimiter: u8) -> Option<OpenQuote> {
    let delimiter = delimiter as char;
    let mut state = ScanState::Unquoted;
    let mut row = 1usize;
    let mut field = 1usize;
    let mut record = 1usize;
    let mut open: Option<OpenQuote> = None;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let class = match c {
            '"' if chars.peek() == Some(&'"') => ScanClass::DoubledQuote,
            '"' => ScanClass::Quote,
            '\n' => ScanClass::Newline,
            c if c == delimiter => ScanClass::Delimiter,
            _ => ScanClass::Other,
        };

        let (next, action) = scan_transition(state, class);
        state = next;
        match action {
            ScanAction::Open => open = Some(OpenQuote { row, field, record }),
            ScanAction::Close => open = None,
            ScanAction::SkipNext => {
                chars.next();
            }
            ScanAction::NextField => field += 1,
            ScanAction::NextRow => {
                row += 1;
                record += 1;
                field = 1;
            }
            ScanAction::NextRowInQuote => row += 1,
            ScanAction::None => {}
        }
    }

    match state {
        ScanState::InQuote => open,
        ScanState::Unquoted => None,
    }
}

/// Best-effort header name for a 1-based field index.
///
/// Only the header row is parsed; if that fails the name is omitted.
pub fn resolve_column_name(text: &str, delimiter: u8, field: usize) -> Option<String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut record = csv::StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => record
            .get(field.checked_sub(1)?)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()),
        Ok(false) => None,
        Err(err) => {
            tracing::debug!(%err, "could not parse header while resolving unclosed quote column");
            None
        }
    }
}

/// Build the `UNCLOSED_QUOTE` issue for an open quote.
///
/// When the quote opens inside the header record the header cannot be parsed,
/// so no column name is attached.
pub fn unclosed_quote_issue(text: &str, delimiter: u8, open: OpenQuote) -> Issue {
    let column = if open.record == 1 {
        None
    } else {
        resolve_column_name(text, delimiter, open.field)
    };
    let message = match &column {
        Some(name) => format!(
            "Quoted field opened at row {} (column '{}') is never closed; the rest of the file cannot be parsed reliably",
            open.row, name
        ),
        None => format!(
            "Quoted field opened at row {} (field {}) is never closed; the rest of the file cannot be parsed reliably",
            open.row, open.field
        ),
    };

    Issue::new(IssueKind::UnclosedQuote, message)
        .at_row(open.row)
        .in_column_opt(column.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_quotes() {
        assert_eq!(find_unclosed_quote("a,b\n\"x\",\"y\"\n", b','), None);
        assert_eq!(find_unclosed_quote("a,\"he said \"\"hi\"\"\"\n", b','), None);
        assert_eq!(find_unclosed_quote("", b','), None);
    }

    #[test]
    fn test_unclosed_at_end() {
        let open = find_unclosed_quote("a,b,c\n1,2,3\n4,\"oops,6\n7,8,9\n", b',');
        assert_eq!(open, Some(OpenQuote { row: 3, field: 2, record: 3 }));
    }

    #[test]
    fn test_escaped_quote_keeps_field_open() {
        let open = find_unclosed_quote("a\n\"x\"\"", b',');
        assert_eq!(open, Some(OpenQuote { row: 2, field: 1, record: 2 }));
    }

    #[test]
    fn test_multiline_quoted_field_closes() {
        assert_eq!(find_unclosed_quote("a,b\n\"line1\nline2\",x\n", b','), None);
    }

    #[test]
    fn test_crlf_ignored_for_rows() {
        let open = find_unclosed_quote("a;b\r\n1;2\r\n3;\"x\r\n", b';');
        assert_eq!(open, Some(OpenQuote { row: 3, field: 2, record: 3 }));
    }

    #[test]
    fn test_resolve_column_name() {
        let text = "id, name ,city\n1,\"bob\n";
        assert_eq!(resolve_column_name(text, b',', 2), Some("name".to_string()));
        assert_eq!(resolve_column_name(text, b',', 9), None);
        assert_eq!(resolve_column_name(text, b',', 0), None);
        assert_eq!(resolve_column_name("", b',', 1), None);
    }

    #[test]
    fn test_unclosed_quote_issue() {
        let text = "id,name\n1,\"bob\n";
        let open = find_unclosed_quote(text, b',').unwrap();
        let issue = unclosed_quote_issue(text, b',', open);
        assert_eq!(issue.kind, IssueKind::UnclosedQuote);
        assert_eq!(issue.row_number, Some(2));
        assert_eq!(issue.column_name.as_deref(), Some("name"));
    }

    #[test]
    fn test_records_skip_quoted_newlines() {
        let open = find_unclosed_quote("a,b\n\"x\ny\",1\n2,\"open\n", b',');
        assert_eq!(open, Some(OpenQuote { row: 4, field: 2, record: 3 }));
    }

    #[test]
    fn test_quote_open_in_header_has_no_column() {
        let text = "id,\"name\n1,2\n3,4\n";
        let open = find_unclosed_quote(text, b',').unwrap();
        assert_eq!(open, OpenQuote { row: 1, field: 2, record: 1 });

        let issue = unclosed_quote_issue(text, b',', open);
        assert_eq!(issue.row_number, Some(1));
        assert_eq!(issue.column_name, None);
        assert!(issue.message.contains("(field 2)"));
    }

    #[test]
    fn test_quote_open_in_multiline_header_has_no_column() {
        let text = "\"a\nb\",\"c\n1,2\n";
        let open = find_unclosed_quote(text, b',').unwrap();
        assert_eq!(open, OpenQuote { row: 2, field: 2, record: 1 });
        assert_eq!(unclosed_quote_issue(text, b',', open).column_name, None);
    }
}
