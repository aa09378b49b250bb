//! Common Log Format line parser
//!
//! Only the `bytes` field is extracted. Lines that do not match the grammar,
//! and `bytes` fields that are `-` or not a non-negative integer, count as 0.

use once_cell::sync::Lazy;
use regex::Regex;

/// `host ident user [timestamp] "request" status bytes "referer" "agent"`
static CLF_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(\S+) (\S+) (\S+) \[([^\]]+)\] "([^"]+)" (\d{3}) (\S+) "([^"]*)" "([^"]*)"$"#)
        .expect("CLF pattern is a valid regex")
});

/// Capture group holding the `bytes` field
const BYTES_GROUP: usize = 7;

/// Classification of a line's `bytes` field
///
/// Every variant other than `Count` contributes 0 to a total, as does
/// `Count(0)`. The distinction is kept for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteField {
    /// A non-negative byte count
    Count(u64),
    /// The explicit `-` placeholder
    Placeholder,
    /// The field matched the grammar but is not a non-negative integer
    NonNumeric,
    /// The line does not match the grammar at all
    Unmatched,
}

impl ByteField {
    /// Byte count this field contributes to a total
    pub fn bytes(self) -> u64 {
        match self {
            ByteField::Count(n) => n,
            _ => 0,
        }
    }
}

/// Classify the `bytes` field of one log line
pub fn classify_line(line: &str) -> ByteField {
    let Some(captures) = CLF_PATTERN.captures(line) else {
        return ByteField::Unmatched;
    };

    match captures.get(BYTES_GROUP).map(|m| m.as_str()) {
        Some("-") => ByteField::Placeholder,
        Some(field) => field
            .parse::<u64>()
            .map_or(ByteField::NonNumeric, ByteField::Count),
        None => ByteField::Unmatched,
    }
}

/// Byte count of one log line, or 0 when unknown
pub fn parse_bytes(line: &str) -> u64 {
    classify_line(line).bytes()
}

/// Per-line byte extraction used by every strategy
pub trait LineParser: Send + Sync {
    /// Byte count contributed by `line`
    fn parse_bytes(&self, line: &str) -> u64;
}

/// Parser for the fixed Common Log Format grammar
#[derive(Debug, Clone, Copy, Default)]
pub struct ClfParser;

impl ClfParser {
    /// Create a new CLF parser
    pub fn new() -> Self {
        Self
    }
}

impl LineParser for ClfParser {
    fn parse_bytes(&self, line: &str) -> u64 {
        parse_bytes(line)
    }
}

/// Sum the byte counts of a run of lines, `None` on `u64` overflow
pub(crate) fn sum_lines<S: AsRef<str>>(parser: &dyn LineParser, lines: &[S]) -> Option<u64> {
    lines
        .iter()
        .try_fold(0u64, |acc, line| acc.checked_add(parser.parse_bytes(line.as_ref())))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str =
        r#"10.0.0.1 - - [01/Jan/2024:00:00:00 +0000] "GET /a HTTP/1.1" 200 100 "-" "-""#;

    #[test]
    fn test_well_formed_line() {
        assert_eq!(parse_bytes(WELL_FORMED), 100);
        assert_eq!(classify_line(WELL_FORMED), ByteField::Count(100));
    }

    #[test]
    fn test_apache_sample_line() {
        let line = r#"83.149.9.216 - - [17/May/2015:10:05:03 +0000] "GET /presentations/logstash-monitorama-2013/images/kibana-search.png HTTP/1.1" 200 203023 "http://semicomplete.com/presentations/logstash-monitorama-2013/" "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_9_1) AppleWebKit/537.36""#;
        assert_eq!(parse_bytes(line), 203023);
    }

    #[test]
    fn test_placeholder_bytes() {
        let line = r#"10.0.0.2 - - [01/Jan/2024:00:00:01 +0000] "GET /b HTTP/1.1" 200 - "-" "-""#;
        assert_eq!(classify_line(line), ByteField::Placeholder);
        assert_eq!(parse_bytes(line), 0);
    }

    #[test]
    fn test_non_numeric_bytes() {
        for field in ["abc", "-5", "12x", "99999999999999999999999"] {
            let line = format!(
                r#"10.0.0.3 - - [01/Jan/2024:00:00:02 +0000] "GET /c HTTP/1.1" 200 {field} "-" "-""#
            );
            assert_eq!(classify_line(&line), ByteField::NonNumeric, "field {field}");
            assert_eq!(parse_bytes(&line), 0);
        }
    }

    #[test]
    fn test_unmatched_lines() {
        let cases = [
            "malformed line without structure",
            "",
            // Common Log Format without referer and agent
            r#"10.0.0.1 - - [01/Jan/2024:00:00:00 +0000] "GET /a HTTP/1.1" 200 100"#,
            // Empty request
            r#"10.0.0.1 - - [01/Jan/2024:00:00:00 +0000] "" 200 100 "-" "-""#,
            // Four-digit status
            r#"10.0.0.1 - - [01/Jan/2024:00:00:00 +0000] "GET /a HTTP/1.1" 2000 100 "-" "-""#,
            // Trailing garbage
            r#"10.0.0.1 - - [01/Jan/2024:00:00:00 +0000] "GET /a HTTP/1.1" 200 100 "-" "-" extra"#,
        ];

        for line in cases {
            assert_eq!(classify_line(line), ByteField::Unmatched, "line {line:?}");
            assert_eq!(parse_bytes(line), 0);
        }
    }

    #[test]
    fn test_empty_referer_and_agent() {
        let line = r#"host ident user [ts] "GET / HTTP/1.0" 304 0 "" """#;
        assert_eq!(classify_line(line), ByteField::Count(0));
        assert_eq!(parse_bytes(line), 0);
    }

    #[test]
    fn test_parser_trait_matches_free_function() {
        let parser = ClfParser::new();
        assert_eq!(parser.parse_bytes(WELL_FORMED), parse_bytes(WELL_FORMED));
        assert_eq!(sum_lines(&parser, &[WELL_FORMED, WELL_FORMED, "junk"]), Some(200));
    }

    #[test]
    fn test_sum_lines_overflow() {
        let max = format!(r#"h i u [t] "GET / HTTP/1.0" 200 {} "r" "a""#, u64::MAX);
        let parser = ClfParser::new();
        assert_eq!(sum_lines(&parser, &[max.as_str()]), Some(u64::MAX));
        assert_eq!(sum_lines(&parser, &[max.as_str(), WELL_FORMED]), None);
    }

    #[test]
    fn test_shared_pattern_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..100).map(|_| parse_bytes(WELL_FORMED)).sum::<u64>()))
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 10_000);
        }
    }
}
