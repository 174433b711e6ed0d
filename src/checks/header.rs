//! Header row integrity checks.

use foldhash::{HashMap, HashMapExt};

use crate::issue::{Issue, IssueKind};
use crate::tokenizer::Row;

/// The parsed header and its effective width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Trimmed column names, one per effective column.
    pub names: Vec<String>,
    /// Column count after trailing-delimiter correction.
    pub column_count: usize,
}

impl Header {
    /// Name of the column at `idx`, if it has a non-blank name.
    pub fn name(&self, idx: usize) -> Option<&str> {
        self.names
            .get(idx)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }
}

/// Validate the header row, returning the header and any issues found.
pub fn check_header(row: Option<&Row<'_>>) -> (Header, Vec<Issue>) {
    let mut issues = Vec::new();
    let Some(row) = row else {
        return (
            Header {
                names: Vec::new(),
                column_count: 0,
            },
            issues,
        );
    };

    let raw_names: Vec<&str> = row.values().collect();
    let mut column_count = raw_names.len();

    // Duplicates, grouped case-insensitively in order of first appearance.
    let mut groups: HashMap<String, (usize, usize)> = HashMap::with_capacity(raw_names.len());
    for (idx, name) in raw_names.iter().enumerate() {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            continue;
        }
        groups
            .entry(trimmed.to_lowercase())
            .and_modify(|(_, count)| *count += 1)
            .or_insert((idx, 1));
    }
    let mut duplicates: Vec<(usize, usize)> =
        groups.into_values().filter(|&(_, count)| count > 1).collect();
    duplicates.sort_unstable();
    for (first_idx, count) in duplicates {
        let name = raw_names[first_idx].trim();
        issues.push(
            Issue::new(
                IssueKind::DuplicateHeader,
                format!("Header '{name}' appears {count} times (names are compared case-insensitively)"),
            )
            .in_column(name),
        );
    }

    let last = raw_names.len().saturating_sub(1);
    for (idx, name) in raw_names.iter().enumerate() {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            if idx == last {
                column_count -= 1;
                issues.push(Issue::new(
                    IssueKind::TrailingDelimiterHeader,
                    "Header ends with a delimiter, producing an empty last column",
                ));
            } else {
                issues.push(
                    Issue::new(
                        IssueKind::HeaderEmpty,
                        format!("Header column {} has no name", idx + 1),
                    )
                    .at_row(1),
                );
            }
        } else if trimmed != *name {
            issues.push(
                Issue::new(
                    IssueKind::WhitespaceInHeaders,
                    format!("Header '{trimmed}' has leading or trailing whitespace"),
                )
                .at_row(1)
                .in_column(trimmed),
            );
        }
    }

    let names = raw_names
        .iter()
        .take(column_count)
        .map(|name| name.trim().to_string())
        .collect();

    (
        Header {
            names,
            column_count,
        },
        issues,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::first_row;

    fn check(line: &str) -> (Header, Vec<Issue>) {
        let row = first_row(line, b',').map(Result::unwrap);
        check_header(row.as_ref())
    }

    fn kinds(issues: &[Issue]) -> Vec<IssueKind> {
        issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_clean_header() {
        let (header, issues) = check("id,name,city");
        assert!(issues.is_empty());
        assert_eq!(header.column_count, 3);
        assert_eq!(header.names, vec!["id", "name", "city"]);
    }

    #[test]
    fn test_duplicate_header() {
        let (_, issues) = check("a,a,b");
        assert_eq!(kinds(&issues), vec![IssueKind::DuplicateHeader]);
        assert_eq!(issues[0].column_name.as_deref(), Some("a"));
        assert_eq!(issues[0].row_number, None);
    }

    #[test]
    fn test_duplicate_header_case_insensitive() {
        let (_, issues) = check("Name,id,NAME , name,ID");
        assert_eq!(
            kinds(&issues)
                .iter()
                .filter(|&&k| k == IssueKind::DuplicateHeader)
                .count(),
            2
        );
        assert_eq!(issues[0].column_name.as_deref(), Some("Name"));
        assert_eq!(issues[1].column_name.as_deref(), Some("id"));
    }

    #[test]
    fn test_trailing_delimiter_header() {
        let (header, issues) = check("a,b,");
        assert_eq!(kinds(&issues), vec![IssueKind::TrailingDelimiterHeader]);
        assert_eq!(header.column_count, 2);
        assert_eq!(header.names, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_header_name() {
        let (header, issues) = check("a, ,c");
        assert_eq!(kinds(&issues), vec![IssueKind::HeaderEmpty]);
        assert_eq!(issues[0].row_number, Some(1));
        assert_eq!(header.column_count, 3);
        assert_eq!(header.name(1), None);
    }

    #[test]
    fn test_whitespace_in_header() {
        let (header, issues) = check(" id,name ");
        assert_eq!(
            kinds(&issues),
            vec![IssueKind::WhitespaceInHeaders, IssueKind::WhitespaceInHeaders]
        );
        assert!(issues[1].message.contains("'name'"));
        assert_eq!(header.names, vec!["id", "name"]);
    }

    #[test]
    fn test_missing_header() {
        let (header, issues) = check_header(None);
        assert!(issues.is_empty());
        assert_eq!(header.column_count, 0);
    }
}
