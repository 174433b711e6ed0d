//! Per-cell value classification, invalid-date detection and per-column
//! type-stability scoring.

use std::fmt;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};

use super::regexes::{
    DATE_ISO_PATTERN, DATE_SLASH_ISO_PATTERN, DATE_SLASH_PATTERN, DATETIME_ISO_PATTERN,
    NUMBER_PATTERN,
};
use crate::issue::{Issue, IssueKind};

/// Semantic kind of a single cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Empty,
    Number,
    Date,
    Text,
}

impl ValueKind {
    pub const COUNT: usize = 4;

    #[inline]
    pub const fn as_index(&self) -> usize {
        match self {
            ValueKind::Empty => 0,
            ValueKind::Number => 1,
            ValueKind::Date => 2,
            ValueKind::Text => 3,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Empty => write!(f, "empty"),
            ValueKind::Number => write!(f, "number"),
            ValueKind::Date => write!(f, "date"),
            ValueKind::Text => write!(f, "text"),
        }
    }
}

/// Classify a cell value.
pub fn classify(value: &str) -> ValueKind {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return ValueKind::Empty;
    }
    if NUMBER_PATTERN.is_match(trimmed) {
        return ValueKind::Number;
    }
    if is_exact_date(trimmed) {
        return ValueKind::Date;
    }
    ValueKind::Text
}

/// Exact match against the accepted date and date-time layouts.
fn is_exact_date(value: &str) -> bool {
    if DATE_ISO_PATTERN.is_match(value) {
        return NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok();
    }
    if DATE_SLASH_ISO_PATTERN.is_match(value) {
        return NaiveDate::parse_from_str(value, "%Y/%m/%d").is_ok();
    }
    if DATE_SLASH_PATTERN.is_match(value) {
        return NaiveDate::parse_from_str(value, "%m/%d/%Y").is_ok()
            || NaiveDate::parse_from_str(value, "%d/%m/%Y").is_ok();
    }
    if DATETIME_ISO_PATTERN.is_match(value) {
        let value = value.strip_suffix('Z').unwrap_or(value);
        return NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok();
    }
    false
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldOrder {
    Ymd,
    Mdy,
    Dmy,
}

/// One loose date layout used to accept date-like values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LooseLayout {
    separator: char,
    order: FieldOrder,
    year_digits: usize,
    /// Month and day must be exactly two digits.
    padded: bool,
}

impl LooseLayout {
    fn accepts(&self, value: &str) -> bool {
        let parts: Vec<&str> = value.split(self.separator).collect();
        let [a, b, c] = parts.as_slice() else {
            return false;
        };
        let (year, month, day) = match self.order {
            FieldOrder::Ymd => (*a, *b, *c),
            FieldOrder::Mdy => (*c, *a, *b),
            FieldOrder::Dmy => (*c, *b, *a),
        };

        let day_month_width = |s: &str| {
            if self.padded {
                s.len() == 2
            } else {
                (1..=2).contains(&s.len())
            }
        };
        if year.len() != self.year_digits || !day_month_width(month) || !day_month_width(day) {
            return false;
        }

        let (Ok(year), Ok(month), Ok(day)) =
            (year.parse::<i32>(), month.parse::<u32>(), day.parse::<u32>())
        else {
            return false;
        };
        let year = if self.year_digits == 2 {
            // two-digit years pivot at 2049
            if year < 50 { 2000 + year } else { 1900 + year }
        } else {
            year
        };
        NaiveDate::from_ymd_opt(year, month, day).is_some()
    }
}

/// The 24 loose layouts: two separators, three field orders, two year widths,
/// padded and unpadded day/month.
static LOOSE_LAYOUTS: LazyLock<Vec<LooseLayout>> = LazyLock::new(|| {
    let mut layouts = Vec::with_capacity(24);
    for separator in ['/', '-'] {
        for year_digits in [4, 2] {
            for order in [FieldOrder::Ymd, FieldOrder::Mdy, FieldOrder::Dmy] {
                for padded in [true, false] {
                    layouts.push(LooseLayout {
                        separator,
                        order,
                        year_digits,
                        padded,
                    });
                }
            }
        }
    }
    layouts
});

/// Loose heuristic for date-like values that no date layout accepts.
///
/// Only values containing `/` or `-` that split into 2-3 all-digit parts are
/// considered. Such a value is flagged when no loose layout accepts it and
/// either a part lies in (31, 100), or a part lies in (12, 31] while neither
/// of the first two parts (the possible month positions) is a valid month.
/// Calendar-impossible but well-formed values such as `2024-02-30` pass.
///
/// This is narrower than a plain "any part in (12, 31]" rule: a value whose
/// first or second part is a valid month is never flagged for a day-range
/// part, so two-part values such as `10-20` or `12/25` pass.
pub fn looks_like_invalid_date(value: &str) -> bool {
    let trimmed = value.trim();
    if !trimmed.contains(['/', '-']) {
        return false;
    }

    let parts: Vec<&str> = trimmed.split(['/', '-']).collect();
    if !(2..=3).contains(&parts.len())
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
    {
        return false;
    }

    if LOOSE_LAYOUTS.iter().any(|layout| layout.accepts(trimmed)) {
        return false;
    }

    // Parts longer than u32 cannot be in any of the ranges below.
    let numbers: Vec<u32> = parts.iter().filter_map(|p| p.parse().ok()).collect();

    let out_of_day_range = numbers.iter().any(|&n| n > 31 && n < 100);
    let has_month = numbers.iter().take(2).any(|&n| (1..=12).contains(&n));
    let day_without_month = numbers.iter().any(|&n| n > 12 && n <= 31) && !has_month;

    out_of_day_range || day_without_month
}

/// Build the `INVALID_DATE` issue for a cell.
pub fn invalid_date_issue(value: &str, row: usize, column: Option<&str>) -> Issue {
    let message = match column {
        Some(name) => format!(
            "Value '{}' in column '{}' looks like a date but is not a valid date",
            value.trim(),
            name
        ),
        None => format!("Value '{}' looks like a date but is not a valid date", value.trim()),
    };
    Issue::new(IssueKind::InvalidDate, message)
        .at_row(row)
        .in_column_opt(column)
        .with_sample(value.trim())
}

/// Per-column tally of value kinds.
#[derive(Debug, Clone, Default)]
pub struct ColumnProfile {
    counts: [usize; ValueKind::COUNT],
    first_rows: [Option<usize>; ValueKind::COUNT],
    examples: [Option<String>; ValueKind::COUNT],
}

impl ColumnProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one classified cell; the first example of each kind is kept.
    pub fn record(&mut self, kind: ValueKind, value: &str, row: usize) {
        let idx = kind.as_index();
        self.counts[idx] += 1;
        self.first_rows[idx].get_or_insert(row);
        if kind != ValueKind::Empty && self.examples[idx].is_none() {
            self.examples[idx] = Some(value.trim().to_string());
        }
    }

    #[inline]
    pub fn count(&self, kind: ValueKind) -> usize {
        self.counts[kind.as_index()]
    }

    #[inline]
    pub fn first_row(&self, kind: ValueKind) -> Option<usize> {
        self.first_rows[kind.as_index()]
    }

    pub fn example(&self, kind: ValueKind) -> Option<&str> {
        self.examples[kind.as_index()].as_deref()
    }

    pub fn non_empty(&self) -> usize {
        self.count(ValueKind::Number) + self.count(ValueKind::Date) + self.count(ValueKind::Text)
    }

    /// Proportion of `kind` among non-empty values.
    pub fn proportion(&self, kind: ValueKind) -> f64 {
        let total = self.non_empty();
        if total == 0 {
            return 0.0;
        }
        self.count(kind) as f64 / total as f64
    }

    /// Whether the column mixes value kinds enough to be flagged.
    pub fn is_unstable(&self, min_non_empty: usize) -> bool {
        if self.non_empty() < min_non_empty || self.non_empty() == 0 {
            return false;
        }

        let p_num = self.proportion(ValueKind::Number);
        let p_date = self.proportion(ValueKind::Date);
        let p_text = self.proportion(ValueKind::Text);

        let major_kinds = [p_num, p_date, p_text]
            .iter()
            .filter(|&&p| p >= 0.10)
            .count();
        let text_in_typed_column = (p_num >= 0.80 || p_date >= 0.80) && p_text >= 0.05;

        major_kinds >= 2 || text_in_typed_column
    }

    /// Row that best points at the odd values out.
    pub fn hint_row(&self) -> Option<usize> {
        let num = self.count(ValueKind::Number);
        let date = self.count(ValueKind::Date);
        let text = self.count(ValueKind::Text);

        if text > 0 && text < num + date {
            return self.first_row(ValueKind::Text);
        }
        if num > 0 && num < text {
            return self.first_row(ValueKind::Number);
        }
        if date > 0 && date < text {
            return self.first_row(ValueKind::Date);
        }
        [ValueKind::Number, ValueKind::Date, ValueKind::Text]
            .iter()
            .filter_map(|&k| self.first_row(k))
            .min()
    }

    /// Example shown in the message: text, else date, else number.
    pub fn preferred_example(&self) -> Option<&str> {
        self.example(ValueKind::Text)
            .or_else(|| self.example(ValueKind::Date))
            .or_else(|| self.example(ValueKind::Number))
    }
}

/// Build a `COLUMN_TYPE_INSTABILITY` issue for an unstable column.
pub fn instability_issue(profile: &ColumnProfile, column: Option<&str>, index: usize) -> Issue {
    let breakdown: Vec<String> = [ValueKind::Number, ValueKind::Date, ValueKind::Text]
        .iter()
        .filter(|&&k| profile.count(k) > 0)
        .map(|&k| format!("{} {}%", k, (profile.proportion(k) * 100.0).round() as u32))
        .collect();

    let label = match column {
        Some(name) => format!("Column '{name}'"),
        None => format!("Column {}", index + 1),
    };
    let mut message = format!("{label} mixes value types: {}", breakdown.join(", "));
    if let Some(example) = profile.preferred_example() {
        message.push_str(&format!(" (e.g. '{example}')"));
    }

    let mut issue = Issue::new(IssueKind::ColumnTypeInstability, message).in_column_opt(column);
    if let Some(row) = profile.hint_row() {
        issue = issue.at_row(row);
    }
    if let Some(example) = profile.preferred_example() {
        issue = issue.with_sample(example);
    }
    issue
}
