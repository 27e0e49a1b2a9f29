use crate::core::quote::QuoteTracker;
use crate::domain::model::{CheckSummary, ExpectedWidth};
use crate::utils::error::{CheckError, Result};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

pub const UNTERMINATED_QUOTE: &str = "unexpected end of data: unterminated quoted field";

/// Longest field, in characters, accepted by default.
pub const DEFAULT_FIELD_SIZE_LIMIT: usize = 131_072;

/// Checks that every record of a CSV source has as many fields as the first.
///
/// Blank lines count as records with no fields, so they take part in the
/// width comparison and in line numbering.
#[derive(Debug, Clone)]
pub struct Validator {
    field_size_limit: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            field_size_limit: DEFAULT_FIELD_SIZE_LIMIT,
        }
    }
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_size_limit(mut self, limit: usize) -> Self {
        self.field_size_limit = limit;
        self
    }

    pub fn check_path(&self, path: &Path) -> Result<CheckSummary> {
        let file = File::open(path).map_err(|source| CheckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_dir = file
            .metadata()
            .map(|meta| meta.is_dir())
            .map_err(|source| CheckError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        if is_dir {
            return Err(CheckError::Io {
                path: path.to_path_buf(),
                source: io::Error::other("is a directory"),
            });
        }
        tracing::debug!("Opened {}", path.display());

        self.check_reader(file)
    }

    /// Single pass over `source`. Stops at the first fault.
    pub fn check_reader<R: Read>(&self, source: R) -> Result<CheckSummary> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(QuoteTracker::new(source));

        let mut expected = ExpectedWidth::new();
        let mut lineno: u64 = 0;
        // Records returned by the csv reader; it never returns blank lines.
        let mut parsed: u64 = 0;
        let mut current = StringRecord::new();
        let mut next = StringRecord::new();

        let first = reader.read_record(&mut current);
        observe_blank_lines(&mut reader, parsed, &mut lineno, &mut expected)?;
        let mut has_current = first.map_err(|e| CheckError::from_csv(lineno + 1, &e))?;

        while has_current {
            lineno += 1;

            // One record of lookahead: an open quote at end of input belongs to
            // the last record and must be reported before its width.
            let lookahead = reader.read_record(&mut next);
            if matches!(lookahead, Ok(false)) && reader.get_ref().ended_in_quoted_field() {
                tracing::info!("Unterminated quoted field in record {}", lineno);
                return Err(CheckError::Parse {
                    line: lineno,
                    message: UNTERMINATED_QUOTE.to_string(),
                });
            }

            self.check_field_sizes(lineno, &current)?;
            expected.observe(lineno, current.len()).inspect_err(|e| {
                tracing::info!("Width mismatch: {}", e);
            })?;
            if lineno == 1 {
                tracing::debug!("Established width of {} columns", current.len());
            }
            parsed += 1;

            observe_blank_lines(&mut reader, parsed, &mut lineno, &mut expected)?;
            has_current = lookahead.map_err(|e| CheckError::from_csv(lineno + 1, &e))?;
            std::mem::swap(&mut current, &mut next);
        }

        let summary = CheckSummary {
            records: lineno,
            width: expected.get(),
        };
        tracing::debug!(
            "Checked {} records, width {:?}",
            summary.records,
            summary.width
        );
        Ok(summary)
    }

    fn check_field_sizes(&self, line: u64, record: &StringRecord) -> Result<()> {
        let oversized = record.iter().any(|field| {
            field.len() > self.field_size_limit && field.chars().count() > self.field_size_limit
        });
        if oversized {
            return Err(CheckError::Parse {
                line,
                message: format!("field larger than field limit ({})", self.field_size_limit),
            });
        }
        Ok(())
    }
}

/// Feeds the blank lines preceding record `parsed` to the width check as
/// zero-field records.
fn observe_blank_lines<R: Read>(
    reader: &mut Reader<QuoteTracker<R>>,
    parsed: u64,
    lineno: &mut u64,
    expected: &mut ExpectedWidth,
) -> Result<()> {
    for _ in 0..reader.get_mut().take_blank_lines_before(parsed) {
        *lineno += 1;
        expected.observe(*lineno, 0)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(input: &str) -> Result<CheckSummary> {
        Validator::new().check_reader(input.as_bytes())
    }

    fn assert_message(input: &str, expected: &str) {
        match check(input) {
            Err(e) => assert_eq!(e.to_string(), expected),
            Ok(summary) => panic!("expected failure, got {:?}", summary),
        }
    }

    #[test]
    fn test_consistent_rows() {
        let summary = check("a,b\n1,2\n3,4\n").unwrap();
        assert_eq!(summary.records, 3);
        assert_eq!(summary.width, Some(2));
    }

    #[test]
    fn test_short_row_reported() {
        assert_message("a,b,c\n1,2,3\n4,5\n", "line 3: expected 3 columns, got 2");
    }

    #[test]
    fn test_long_row_reported() {
        assert_message("a\nb,c\nd\n", "line 2: expected 1 columns, got 2");
    }

    #[test]
    fn test_only_first_fault_reported() {
        assert_message("a,b\n1\n1,2,3\n", "line 2: expected 2 columns, got 1");
    }

    #[test]
    fn test_empty_input() {
        let summary = check("").unwrap();
        assert_eq!(summary.records, 0);
        assert_eq!(summary.width, None);
    }

    #[test]
    fn test_single_row_any_width() {
        let summary = check("a,b,c,d,e\n").unwrap();
        assert_eq!(summary.records, 1);
        assert_eq!(summary.width, Some(5));
    }

    #[test]
    fn test_quoted_fields_embed_delimiter_and_newline() {
        let summary = check("name,note\n\"Doe, Jane\",\"line one\nline two\"\nx,\"y \"\"z\"\"\"\n")
            .unwrap();
        assert_eq!(summary.records, 3);
        assert_eq!(summary.width, Some(2));
    }

    #[test]
    fn test_record_numbers_count_records_not_lines() {
        assert_message(
            "a,b\n\"multi\nline\",2\n3\n",
            "line 3: expected 2 columns, got 1",
        );
    }

    #[test]
    fn test_missing_trailing_newline() {
        assert!(check("a,b\n1,2").is_ok());
        assert_message("a,b\n1", "line 2: expected 2 columns, got 1");
    }

    #[test]
    fn test_crlf_terminators() {
        assert!(check("a,b\r\n1,2\r\n").is_ok());
    }

    #[test]
    fn test_unterminated_quote() {
        assert_message(
            "a,b\n1,\"2\n3,4\n",
            &format!("line 2: {}", UNTERMINATED_QUOTE),
        );
    }

    #[test]
    fn test_unterminated_quote_reported_before_width() {
        assert_message(
            "a,b,c\n1,\"2\n",
            &format!("line 2: {}", UNTERMINATED_QUOTE),
        );
    }

    #[test]
    fn test_unterminated_quote_on_first_record() {
        assert_message("\"abc", &format!("line 1: {}", UNTERMINATED_QUOTE));
    }

    #[test]
    fn test_trailing_blank_line_is_an_empty_record() {
        assert_message("a,b\n1,2\n\n", "line 3: expected 2 columns, got 0");
    }

    #[test]
    fn test_blank_line_between_records() {
        assert_message("a,b\n\n1,2\n", "line 2: expected 2 columns, got 0");
    }

    #[test]
    fn test_leading_blank_lines_set_width_zero() {
        assert_message("\n\na,b\n", "line 3: expected 0 columns, got 2");
    }

    #[test]
    fn test_blank_lines_only() {
        let summary = check("\n\n\n").unwrap();
        assert_eq!(summary.records, 3);
        assert_eq!(summary.width, Some(0));
    }

    #[test]
    fn test_blank_crlf_line() {
        assert_message("a,b\r\n\r\n1,2\r\n", "line 2: expected 2 columns, got 0");
    }

    #[test]
    fn test_empty_lines_inside_quotes_are_field_content() {
        let summary = check("a,b\n\"x\n\ny\",2\n").unwrap();
        assert_eq!(summary.records, 2);
        assert_eq!(summary.width, Some(2));
    }

    #[test]
    fn test_oversized_field() {
        let err = Validator::new()
            .with_field_size_limit(4)
            .check_reader("ab,cdef\nabcde,x\n".as_bytes())
            .unwrap_err();
        assert!(err.is_verdict());
        assert_eq!(err.to_string(), "line 2: field larger than field limit (4)");
    }

    #[test]
    fn test_field_limit_counts_characters() {
        let summary = Validator::new()
            .with_field_size_limit(5)
            .check_reader("ééééé,a\n".as_bytes())
            .unwrap();
        assert_eq!(summary.width, Some(2));
    }

    #[test]
    fn test_default_field_limit() {
        let at_limit = format!("{},b\n", "x".repeat(DEFAULT_FIELD_SIZE_LIMIT));
        assert!(check(&at_limit).is_ok());

        let over_limit = format!("a,b\n{},b\n", "x".repeat(DEFAULT_FIELD_SIZE_LIMIT + 1));
        assert_message(&over_limit, "line 2: field larger than field limit (131072)");
    }

    #[test]
    fn test_invalid_utf8_on_first_record() {
        let err = Validator::new()
            .check_reader(&b"a,\xff\n1,2\n"[..])
            .unwrap_err();
        assert!(err.is_verdict());
        assert_eq!(err.to_string(), "line 1: invalid UTF-8 in field 1");
    }

    #[test]
    fn test_invalid_utf8_after_valid_records() {
        let err = Validator::new()
            .check_reader(&b"a,b\n1,2\n\xfe,3\n"[..])
            .unwrap_err();
        assert_eq!(err.to_string(), "line 3: invalid UTF-8 in field 0");
    }
}
