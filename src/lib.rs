//! csv-lint: single-pass structural and content validation for CSV files
//!
//! Detects every defect that would make a delimiter-separated file unsafe or
//! ambiguous to import, without stopping at the first one.
//!
//! # Quick Start
//!
//! ```
//! use csv_lint::{Analyzer, CancellationToken, IssueKind};
//!
//! let data = b"id,name,\n1,Ada\n2,Grace,extra,field\n";
//! let result = Analyzer::new()
//!     .analyze("people.csv", data, &CancellationToken::new())
//!     .unwrap();
//!
//! assert_eq!(result.delimiter, ',');
//! assert_eq!(result.column_count, Some(2));
//! for issue in &result.issues {
//!     println!("{} {:?} {}", issue.kind, issue.row_number, issue.message);
//! }
//! assert!(result.issues.iter().any(|i| i.kind == IssueKind::RowWidthMismatch));
//! ```
//!
//! # What is checked
//!
//! 1. Format sniffing: UTF-8 BOM, newline style, delimiter
//! 2. A pre-flight scan for a file ending inside a quoted field, which stops
//!    the analysis because later rows cannot be attributed reliably
//! 3. Header integrity: duplicate, empty and whitespace-padded names
//! 4. Row shape: blank rows, trailing delimiters, ragged rows
//! 5. Quoting consistency per column
//! 6. Value types per column, and date-like values that are not valid dates
//!
//! Issues are returned sorted by severity, then row number.

mod analyzer;
pub mod cache;
mod cancel;
pub mod checks;
pub mod dialect;
mod encoding;
mod error;
pub mod export;
mod issue;
mod result;
pub mod telemetry;
pub mod tokenizer;

pub use analyzer::{Analyzer, DEFAULT_MIN_TYPE_SAMPLES};
pub use cache::ResultCache;
pub use cancel::CancellationToken;
pub use dialect::NewlineStyle;
pub use encoding::{EncodingInfo, detect_encoding, is_utf8};
pub use error::{LintError, Result};
pub use export::{issues_to_csv, write_issues_csv};
pub use issue::{Issue, IssueKind, Severity, sort_issues};
pub use result::{AnalysisResult, Outcome};
pub use telemetry::{JsonLinesSink, TelemetryEvent, TelemetrySink, TracingSink};
