//! Document title/date extraction from the leading paragraph.

use super::ConsumedParagraphs;
use chrono::NaiveDate;
use regex::Regex;

/// Structured metadata decoded from the leading paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocMetadata {
    /// Title text with the date prefix removed
    pub title: String,

    /// The full original paragraph line
    pub full_line: String,

    /// Decoded date, absent when the digits are not a valid calendar day
    pub date: Option<NaiveDate>,
}

/// Detects the `YYMMDD-Title` pattern in a document's first paragraph.
pub struct MetadataExtractor {
    pattern: Regex,
}

impl MetadataExtractor {
    /// Create an extractor with the fixed title pattern.
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^\s*(\d{6})\s*-\s*(.+)").unwrap(),
        }
    }

    /// Test the first paragraph against the title pattern.
    ///
    /// A match consumes container index 0, so the line is excluded from
    /// figure-title search windows and from the output blocks. An
    /// invalid calendar value keeps the title but drops the date.
    pub fn extract(
        &self,
        para_texts: &[String],
        consumed: &mut ConsumedParagraphs,
    ) -> Option<DocMetadata> {
        let first = para_texts.first()?;
        let caps = self.pattern.captures(first)?;

        let date = parse_yymmdd(&caps[1]);
        let title = caps[2].trim().to_string();
        consumed.insert(0);

        Some(DocMetadata {
            title,
            full_line: first.trim().to_string(),
            date,
        })
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode six digits as a date in the fixed 20YY century.
fn parse_yymmdd(digits: &str) -> Option<NaiveDate> {
    // The regex guarantees six ASCII digits, so slicing is safe.
    let yy: i32 = digits[0..2].parse().ok()?;
    let mm: u32 = digits[2..4].parse().ok()?;
    let dd: u32 = digits[4..6].parse().ok()?;
    NaiveDate::from_ymd_opt(2000 + yy, mm, dd)
}
