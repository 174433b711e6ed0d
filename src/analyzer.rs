//! The `Analyzer` builder and the analysis pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::cancel::CancellationToken;
use crate::checks::header::check_header;
use crate::checks::quoting::QuotingTracker;
use crate::checks::rows::{RowVerdict, check_row};
use crate::checks::scanner::{find_unclosed_quote, unclosed_quote_issue};
use crate::checks::values::{
    ColumnProfile, classify, instability_issue, invalid_date_issue, looks_like_invalid_date,
};
use crate::dialect::{DEFAULT_DELIMITERS, NewlineStyle, detect_delimiter, detect_newline_style};
use crate::encoding::{decode_lenient, detect_encoding};
use crate::error::{LintError, Result};
use crate::issue::{Issue, IssueKind, sort_issues};
use crate::result::{AnalysisResult, FormatInfo, Outcome};
use crate::telemetry::{EventKind, TelemetryEvent, TelemetrySink, emit};
use crate::tokenizer::{TokenizeError, Tokenizer};

/// Minimum non-empty values before a column's type mix is judged.
pub const DEFAULT_MIN_TYPE_SAMPLES: usize = 10;

/// Single-pass CSV validator.
///
/// # Example
///
/// ```
/// use csv_lint::{Analyzer, CancellationToken, IssueKind};
///
/// let analyzer = Analyzer::new();
/// let result = analyzer
///     .analyze("people.csv", b"id,id,name\n1,2,Ada\n", &CancellationToken::new())
///     .unwrap();
///
/// assert_eq!(result.column_count, Some(3));
/// assert_eq!(result.issues[0].kind, IssueKind::DuplicateHeader);
/// ```
#[derive(Debug, Clone)]
pub struct Analyzer {
    /// Delimiter candidates in tie-breaking order.
    delimiter_candidates: Vec<u8>,
    /// Optional forced delimiter.
    forced_delimiter: Option<u8>,
    /// Minimum non-empty values for the type-instability check.
    min_type_samples: usize,
    /// Optional sink notified after each analysis.
    telemetry: Option<Arc<dyn TelemetrySink>>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Create a new Analyzer with default settings.
    pub fn new() -> Self {
        Self {
            delimiter_candidates: DEFAULT_DELIMITERS.to_vec(),
            forced_delimiter: None,
            min_type_samples: DEFAULT_MIN_TYPE_SAMPLES,
            telemetry: None,
        }
    }

    /// Force a specific delimiter (skip delimiter detection).
    pub fn delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.forced_delimiter = Some(delimiter);
        self
    }

    /// Set the delimiter candidates, in tie-breaking priority order.
    pub fn delimiter_candidates(&mut self, candidates: &[u8]) -> &mut Self {
        self.delimiter_candidates = candidates.to_vec();
        self
    }

    /// Set the minimum non-empty values a column needs before its type mix is judged.
    pub fn min_type_samples(&mut self, min: usize) -> &mut Self {
        self.min_type_samples = min;
        self
    }

    /// Attach a telemetry sink.
    pub fn telemetry(&mut self, sink: Arc<dyn TelemetrySink>) -> &mut Self {
        self.telemetry = Some(sink);
        self
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<()> {
        let usable = |d: u8| d.is_ascii() && !matches!(d, b'"' | b'\n' | b'\r');

        if self.delimiter_candidates.is_empty() && self.forced_delimiter.is_none() {
            return Err(LintError::InvalidConfig(
                "at least one delimiter candidate is required".to_string(),
            ));
        }
        if let Some(&bad) = self
            .delimiter_candidates
            .iter()
            .chain(self.forced_delimiter.iter())
            .find(|&&d| !usable(d))
        {
            return Err(LintError::InvalidConfig(format!(
                "unusable delimiter {:?}",
                bad as char
            )));
        }
        if self.min_type_samples == 0 {
            return Err(LintError::InvalidConfig(
                "min_type_samples must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Analyze a whole file held in memory.
    ///
    /// Malformed content never fails the call; it is reported as issues. The
    /// call fails only when `cancel` is triggered (or the configuration is
    /// invalid), in which case every issue found so far is discarded.
    #[instrument(skip(self, data, cancel), fields(bytes = data.len()))]
    pub fn analyze(
        &self,
        file_name: &str,
        data: &[u8],
        cancel: &CancellationToken,
    ) -> Result<AnalysisResult> {
        self.validate()?;

        let encoding = detect_encoding(data);
        if !encoding.is_utf8 {
            debug!("input is not valid UTF-8; decoding leniently");
        }
        let newline_style = detect_newline_style(data);
        let text = decode_lenient(data);
        let delimiter = self
            .forced_delimiter
            .unwrap_or_else(|| detect_delimiter(&text, &self.delimiter_candidates));

        let format = FormatInfo {
            encoding: encoding.name(),
            had_bom: encoding.has_bom,
            newline_style,
            delimiter,
        };
        debug!(delimiter = ?(delimiter as char), %newline_style, "sniffed format");

        let mut issues = Vec::new();
        if encoding.has_bom {
            issues.push(Issue::new(
                IssueKind::Utf8Bom,
                "File starts with a UTF-8 byte-order mark",
            ));
        }
        if newline_style == NewlineStyle::Mixed {
            issues.push(Issue::new(
                IssueKind::MixedLineEndings,
                "File mixes LF and CRLF line endings",
            ));
        }

        let outcome = match find_unclosed_quote(&text, delimiter) {
            Some(open) => {
                warn!(row = open.row, "unclosed quote; skipping row analysis");
                issues.push(unclosed_quote_issue(&text, delimiter, open));
                Outcome::Aborted
            }
            None => match self.check_rows(&text, delimiter, cancel, &mut issues) {
                Ok(outcome) => outcome,
                Err(err) => {
                    self.notify(TelemetryEvent::new(EventKind::AnalysisCancelled, data.len()));
                    return Err(err);
                }
            },
        };

        sort_issues(&mut issues);
        let result = AnalysisResult::new(
            Uuid::new_v4().to_string(),
            file_name,
            data.len(),
            &format,
            outcome,
            issues,
        );
        self.notify(TelemetryEvent::for_result(&result));
        debug!(issues = result.issues.len(), "analysis finished");

        Ok(result)
    }

    /// Read and analyze a file from disk.
    pub fn analyze_path<P: AsRef<Path>>(
        &self,
        path: P,
        cancel: &CancellationToken,
    ) -> Result<AnalysisResult> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        self.analyze(&file_name, &data, cancel)
    }

    /// Analyze several files in parallel, returning results in input order.
    pub fn analyze_paths(
        &self,
        paths: &[PathBuf],
        cancel: &CancellationToken,
    ) -> Vec<Result<AnalysisResult>> {
        paths
            .par_iter()
            .map(|path| self.analyze_path(path, cancel))
            .collect()
    }

    /// Tokenize the text and run the header, row, quoting and value checks.
    fn check_rows(
        &self,
        text: &str,
        delimiter: u8,
        cancel: &CancellationToken,
        issues: &mut Vec<Issue>,
    ) -> Result<Outcome> {
        let mut rows = Tokenizer::new(text, delimiter);

        let header_row = match rows.next().transpose() {
            Ok(row) => row,
            Err(err) => {
                issues.push(parse_failed_issue(&err));
                return Ok(Outcome::Completed {
                    rows: 0,
                    columns: 0,
                });
            }
        };
        let (header, header_issues) = check_header(header_row.as_ref());
        issues.extend(header_issues);

        let mut quoting = QuotingTracker::new(header.column_count);
        let mut profiles = vec![ColumnProfile::new(); header.column_count];
        let mut data_rows = 0usize;
        let mut row_number = 1usize;

        loop {
            if cancel.is_cancelled() {
                debug!(row_number, "analysis cancelled");
                return Err(LintError::Cancelled);
            }
            let row = match rows.next() {
                Some(Ok(row)) => row,
                Some(Err(err)) => {
                    issues.push(parse_failed_issue(&err));
                    break;
                }
                None => break,
            };
            row_number += 1;
            data_rows += 1;

            match check_row(&row, row_number, header.column_count) {
                RowVerdict::Skip(issue) => {
                    issues.push(issue);
                    continue;
                }
                RowVerdict::Analyze(issue) => issues.extend(issue),
            }

            quoting.observe(&row, row_number);

            for (idx, (profile, field)) in profiles.iter_mut().zip(&row.fields).enumerate() {
                let value = field.value.as_str();
                profile.record(classify(value), value, row_number);
                if looks_like_invalid_date(value) {
                    issues.push(invalid_date_issue(value, row_number, header.name(idx)));
                }
            }
        }

        issues.extend(quoting.finish(&header));
        for (idx, profile) in profiles.iter().enumerate() {
            if profile.is_unstable(self.min_type_samples) {
                issues.push(instability_issue(profile, header.name(idx), idx));
            }
        }

        Ok(Outcome::Completed {
            rows: data_rows,
            columns: header.column_count,
        })
    }

    fn notify(&self, event: TelemetryEvent) {
        if let Some(sink) = &self.telemetry {
            emit(sink.as_ref(), event);
        }
    }
}

fn parse_failed_issue(err: &TokenizeError) -> Issue {
    let TokenizeError::UnterminatedQuote { row } = err;
    Issue::new(
        IssueKind::CsvParseFailed,
        format!("Parsing stopped early: {err}"),
    )
    .at_row(*row)
}
