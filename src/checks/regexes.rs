//! Compiled regex patterns for value classification.

use regex::Regex;

/// Invariant-culture decimal: optional sign, digits with optional thousands
/// grouping, optional fractional part.
pub static NUMBER_PATTERN: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^[-+]?(?:(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d*)?|\.\d+)$")
        .expect("Invalid number pattern")
});

/// ISO date (yyyy-MM-dd).
pub static DATE_ISO_PATTERN: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid ISO date pattern")
});

/// Slash-separated ISO date (yyyy/MM/dd).
pub static DATE_SLASH_ISO_PATTERN: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^\d{4}/\d{2}/\d{2}$").expect("Invalid slash ISO date pattern")
});

/// Month-first or day-first date with a 4-digit year (MM/dd/yyyy, d/M/yyyy, ...).
pub static DATE_SLASH_PATTERN: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").expect("Invalid slash date pattern")
});

/// ISO date-time with optional milliseconds and optional trailing `Z`.
pub static DATETIME_ISO_PATTERN: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d{3})?Z?$")
        .expect("Invalid ISO datetime pattern")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_pattern() {
        for value in ["0", "42", "-7", "+3.5", "1,234", "1,234,567.89", ".5", "10."] {
            assert!(NUMBER_PATTERN.is_match(value), "{value}");
        }
        for value in ["", "-", "1,23", "12,3456", "1e5", "abc", "1.2.3", "$5"] {
            assert!(!NUMBER_PATTERN.is_match(value), "{value}");
        }
    }

    #[test]
    fn test_date_patterns() {
        assert!(DATE_ISO_PATTERN.is_match("2023-12-31"));
        assert!(!DATE_ISO_PATTERN.is_match("2023-1-31"));
        assert!(DATE_SLASH_ISO_PATTERN.is_match("2023/12/31"));
        assert!(DATE_SLASH_PATTERN.is_match("12/31/2023"));
        assert!(DATE_SLASH_PATTERN.is_match("1/5/2023"));
        assert!(!DATE_SLASH_PATTERN.is_match("1/5/23"));
    }

    #[test]
    fn test_datetime_pattern() {
        assert!(DATETIME_ISO_PATTERN.is_match("2023-12-31T12:30:45"));
        assert!(DATETIME_ISO_PATTERN.is_match("2023-12-31T12:30:45Z"));
        assert!(DATETIME_ISO_PATTERN.is_match("2023-12-31T12:30:45.123Z"));
        assert!(!DATETIME_ISO_PATTERN.is_match("2023-12-31 12:30:45"));
        assert!(!DATETIME_ISO_PATTERN.is_match("2023-12-31T12:30"));
    }
}
