//! Newline style and delimiter sniffing.

use std::fmt;

use serde::Serialize;

/// Delimiter candidates in tie-breaking priority order.
pub const DEFAULT_DELIMITERS: &[u8] = b",\t;|";

/// Newline convention observed in the raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NewlineStyle {
    /// Unix-style line ending (\n).
    #[serde(rename = "LF")]
    Lf,
    /// Windows-style line ending (\r\n).
    #[serde(rename = "CRLF")]
    Crlf,
    /// Both styles are present.
    Mixed,
    /// No line ending at all (empty or single-line input).
    Unknown,
}

impl NewlineStyle {
    pub const fn as_str(&self) -> &'static str {
        match self {
            NewlineStyle::Lf => "LF",
            NewlineStyle::Crlf => "CRLF",
            NewlineStyle::Mixed => "Mixed",
            NewlineStyle::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for NewlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the newline style from raw (undecoded) bytes.
///
/// A `\n` preceded by `\r` counts as CRLF; any other `\n` counts as LF.
/// A lone `\r` counts as neither.
pub fn detect_newline_style(data: &[u8]) -> NewlineStyle {
    let mut crlf_count = 0usize;
    let mut lf_count = 0usize;

    for (i, &b) in data.iter().enumerate() {
        if b == b'\n' {
            if i > 0 && data[i - 1] == b'\r' {
                crlf_count += 1;
            } else {
                lf_count += 1;
            }
        }
    }

    match (lf_count > 0, crlf_count > 0) {
        (true, true) => NewlineStyle::Mixed,
        (true, false) => NewlineStyle::Lf,
        (false, true) => NewlineStyle::Crlf,
        (false, false) => NewlineStyle::Unknown,
    }
}

/// Detect the field delimiter from the first non-blank line of `text`.
///
/// Each candidate is counted on that line; the highest count wins and ties go
/// to the candidate listed first. An empty candidate list yields a comma.
pub fn detect_delimiter(text: &str, candidates: &[u8]) -> u8 {
    let first_line = text
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");

    let mut best = candidates.first().copied().unwrap_or(b',');
    let mut best_count = 0usize;

    for &candidate in candidates {
        let count = bytecount::count(first_line.as_bytes(), candidate);
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }

    best
}
