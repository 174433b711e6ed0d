//! Export of issues as delimited text.

use std::io::{self, Write};

use csv::{QuoteStyle, WriterBuilder};

use crate::error::{LintError, Result};
use crate::issue::Issue;

/// Column headers of the exported table.
pub const EXPORT_HEADERS: [&str; 6] = [
    "code",
    "severity",
    "message",
    "rowNumber",
    "columnName",
    "sample",
];

/// Write `issues` as CSV to `writer`.
///
/// Fields are quoted only when needed (quote, comma or line break inside),
/// with embedded quotes doubled.
pub fn write_issues_csv<W: Write>(issues: &[Issue], writer: W) -> Result<()> {
    let mut out = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(writer);

    out.write_record(EXPORT_HEADERS)?;
    for issue in issues {
        let row_number = issue.row_number.map(|r| r.to_string()).unwrap_or_default();
        out.write_record([
            issue.kind.code(),
            issue.severity.as_str(),
            issue.message.as_str(),
            row_number.as_str(),
            issue.column_name.as_deref().unwrap_or(""),
            issue.sample.as_deref().unwrap_or(""),
        ])?;
    }
    out.flush()?;
    Ok(())
}

/// Render `issues` as a CSV string.
pub fn issues_to_csv(issues: &[Issue]) -> Result<String> {
    let mut buffer = Vec::new();
    write_issues_csv(issues, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|err| LintError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueKind;

    #[test]
    fn test_header_only_for_no_issues() {
        assert_eq!(
            issues_to_csv(&[]).unwrap(),
            "code,severity,message,rowNumber,columnName,sample\n"
        );
    }

    #[test]
    fn test_minimal_quoting() {
        let issues = vec![
            Issue::new(IssueKind::BlankRow, "Row 3 is blank").at_row(3),
            Issue::new(IssueKind::InvalidDate, "bad, \"date\"")
                .at_row(4)
                .in_column("when")
                .with_sample("32/13/2024"),
        ];
        let csv = issues_to_csv(&issues).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "BLANK_ROW,Info,Row 3 is blank,3,,");
        assert_eq!(
            lines[2],
            "INVALID_DATE,Warning,\"bad, \"\"date\"\"\",4,when,32/13/2024"
        );
    }
}
