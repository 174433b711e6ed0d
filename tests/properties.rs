//! Property-based tests for csv-lint.
//!
//! These check the invariants every analysis result must satisfy, whatever
//! the input looks like:
//! - row and column counts are either both present or both absent
//! - issues come out ordered by severity, then row number
//! - a file ending inside a quoted field reports nothing but that

use csv_lint::{AnalysisResult, Analyzer, CancellationToken, IssueKind, sort_issues};
use proptest::prelude::*;

fn analyze(data: &[u8]) -> AnalysisResult {
    Analyzer::new()
        .analyze("prop.csv", data, &CancellationToken::new())
        .expect("analysis only fails when cancelled")
}

/// Bytes drawn mostly from characters that matter to CSV structure.
fn csv_like_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop::sample::select(vec![
            b'a', b'Z', b'1', b'9', b'.', b'-', b'/', b' ', b',', b';', b'\t', b'|', b'"',
            b'\n', b'\r',
        ]),
        0..300,
    )
}

/// A rectangular grid of lowercase words with unique header names.
fn word_grid() -> impl Strategy<Value = (usize, Vec<Vec<String>>)> {
    (1usize..6).prop_flat_map(|cols| {
        let row = prop::collection::vec("[a-z]{1,8}", cols);
        (Just(cols), prop::collection::vec(row, 0..20))
    })
}

fn render(cols: usize, rows: &[Vec<String>]) -> String {
    let mut text = (0..cols)
        .map(|i| format!("col{i}"))
        .collect::<Vec<_>>()
        .join(",");
    text.push('\n');
    for row in rows {
        text.push_str(&row.join(","));
        text.push('\n');
    }
    text
}

fn is_sorted(result: &AnalysisResult) -> bool {
    result
        .issues
        .windows(2)
        .all(|pair| pair[0].sort_key() <= pair[1].sort_key())
}

proptest! {
    #[test]
    fn prop_counts_present_together(data in csv_like_bytes()) {
        let result = analyze(&data);
        prop_assert_eq!(result.row_count.is_some(), result.column_count.is_some());
        prop_assert_eq!(result.row_count.is_none(), result.is_aborted());
    }

    #[test]
    fn prop_arbitrary_bytes_never_fail(data in prop::collection::vec(any::<u8>(), 0..300)) {
        let result = analyze(&data);
        prop_assert_eq!(result.byte_size, data.len());
        prop_assert!(is_sorted(&result));
    }

    #[test]
    fn prop_issues_sorted_and_stable(data in csv_like_bytes()) {
        let result = analyze(&data);
        prop_assert!(is_sorted(&result));

        let mut resorted = result.issues.clone();
        sort_issues(&mut resorted);
        prop_assert_eq!(resorted, result.issues);
    }

    #[test]
    fn prop_clean_grid_has_no_issues((cols, rows) in word_grid()) {
        let text = render(cols, &rows);
        let result = analyze(text.as_bytes());

        prop_assert!(result.issues.is_empty(), "unexpected issues: {:?}", result.issues);
        prop_assert_eq!(result.row_count, Some(rows.len()));
        prop_assert_eq!(result.column_count, Some(cols));
    }

    #[test]
    fn prop_unterminated_quote_reports_only_that(
        (cols, rows) in word_grid(),
        tail in "[a-z ,\n]{0,40}",
    ) {
        let mut text = render(cols, &rows);
        text.push_str("x,\"");
        text.push_str(&tail);
        let result = analyze(text.as_bytes());

        let kinds: Vec<IssueKind> = result.issues.iter().map(|i| i.kind).collect();
        prop_assert_eq!(kinds, vec![IssueKind::UnclosedQuote]);
        prop_assert_eq!(result.issues[0].row_number, Some(rows.len() + 2));
        prop_assert_eq!(result.row_count, None);
        prop_assert_eq!(result.column_count, None);
    }
}
