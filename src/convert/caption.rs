//! Title and credit attribution for figure groups.

use super::{ConsumedParagraphs, ConvertOptions};
use crate::model::FigureGroup;
use regex::Regex;

/// Title candidates are probed at these offsets from the first
/// member's container, in priority order.
const TITLE_OFFSETS: [i64; 3] = [-2, -1, 1];

/// Credit candidates are probed at these offsets from the last
/// member's container, in priority order. Forward candidates always
/// win over backward ones.
const CREDIT_OFFSETS: [i64; 4] = [1, 2, -1, -2];

/// Recognizer for credit lines: a localized "Source:" prefix with a
/// half- or full-width colon.
pub struct CreditPattern {
    prefix: Regex,
}

impl CreditPattern {
    /// Compile the fixed credit-line pattern.
    pub fn new() -> Self {
        Self {
            prefix: Regex::new(r"(?i)^\s*(来源|source)\s*[：:]\s*").unwrap(),
        }
    }

    /// Check whether a line is a credit line.
    pub fn is_credit(&self, text: &str) -> bool {
        self.prefix.is_match(text)
    }

    /// Strip the prefix and trailing punctuation from a credit line.
    pub fn normalize(&self, text: &str) -> String {
        self.prefix
            .replace(text, "")
            .trim()
            .trim_end_matches(|c| ".,;，。；".contains(c))
            .trim_end()
            .to_string()
    }
}

impl Default for CreditPattern {
    fn default() -> Self {
        Self::new()
    }
}

/// Assigns an optional title and credit to each group from nearby
/// prose, consuming the chosen paragraphs system-wide.
pub struct CaptionAttributor {
    max_title_len: usize,
    credit: CreditPattern,
}

impl CaptionAttributor {
    /// Create an attributor from the pipeline options.
    pub fn new(options: &ConvertOptions) -> Self {
        Self {
            max_title_len: options.max_title_len,
            credit: CreditPattern::new(),
        }
    }

    /// Attribute a title and a credit to one group.
    ///
    /// Consumed candidates (figure containers, the document-title
    /// line, captions claimed by earlier groups) are skipped, which
    /// guarantees each paragraph serves at most one group.
    pub fn attribute(
        &self,
        group: &mut FigureGroup,
        para_texts: &[String],
        consumed: &mut ConsumedParagraphs,
    ) {
        group.title = self.find_title(group, para_texts, consumed);
        group.credit = self.find_credit(group, para_texts, consumed);

        let title_part = match &group.title {
            Some(t) => format!("title: '{}'", preview(t)),
            None => "title: none".to_string(),
        };
        let credit_part = match &group.credit {
            Some(c) => format!("credit: '{}'", preview(c)),
            None => "credit: none".to_string(),
        };
        group.reason = format!("{}, {}, {}", group.reason, title_part, credit_part);
    }

    fn find_title(
        &self,
        group: &FigureGroup,
        para_texts: &[String],
        consumed: &mut ConsumedParagraphs,
    ) -> Option<String> {
        let anchor = group.first().container as i64;
        for offset in TITLE_OFFSETS {
            let Some(idx) = in_range(anchor + offset, para_texts.len()) else {
                continue;
            };
            if consumed.contains(idx) {
                continue;
            }
            let text = para_texts[idx].trim();
            if self.is_title_candidate(text) {
                consumed.insert(idx);
                return Some(text.to_string());
            }
        }
        None
    }

    fn find_credit(
        &self,
        group: &FigureGroup,
        para_texts: &[String],
        consumed: &mut ConsumedParagraphs,
    ) -> Option<String> {
        let anchor = group.last().container as i64;
        for offset in CREDIT_OFFSETS {
            let Some(idx) = in_range(anchor + offset, para_texts.len()) else {
                continue;
            };
            if consumed.contains(idx) {
                continue;
            }
            let text = &para_texts[idx];
            if self.credit.is_credit(text) {
                consumed.insert(idx);
                return Some(self.credit.normalize(text));
            }
        }
        None
    }

    /// A title candidate is non-empty prose at or under the length cap
    /// that is not itself a credit line.
    fn is_title_candidate(&self, text: &str) -> bool {
        !text.is_empty() && text.chars().count() <= self.max_title_len && !self.credit.is_credit(text)
    }
}

fn in_range(idx: i64, len: usize) -> Option<usize> {
    if idx >= 0 && (idx as usize) < len {
        Some(idx as usize)
    } else {
        None
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > 20 {
        let cut: String = text.chars().take(20).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FigureElement, Layout};

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn group_at(containers: &[usize]) -> FigureGroup {
        let members = containers
            .iter()
            .map(|&c| FigureElement::new(c, 0))
            .collect();
        FigureGroup::new(members, Layout::Column, "test")
    }

    #[test]
    fn test_credit_pattern_variants() {
        let credit = CreditPattern::new();
        assert!(credit.is_credit("Source: Agency X"));
        assert!(credit.is_credit("  source： Bloomberg"));
        assert!(credit.is_credit("来源：某机构"));
        assert!(!credit.is_credit("Sources say otherwise"));
        assert!(!credit.is_credit("A plain caption"));
    }

    #[test]
    fn test_credit_normalize() {
        let credit = CreditPattern::new();
        assert_eq!(credit.normalize("Source: Agency X."), "Agency X");
        assert_eq!(credit.normalize("来源：某机构。"), "某机构");
        assert_eq!(credit.normalize("  SOURCE : Reuters ;, "), "Reuters");
    }

    #[test]
    fn test_title_priority_order() {
        let para_texts = texts(&["Far title", "Near title", "", "after"]);
        let mut consumed = ConsumedParagraphs::new();
        consumed.insert(2);

        let mut group = group_at(&[2]);
        let attributor = CaptionAttributor::new(&ConvertOptions::default());
        attributor.attribute(&mut group, &para_texts, &mut consumed);

        // Offset -2 is probed first.
        assert_eq!(group.title.as_deref(), Some("Far title"));
        assert!(consumed.contains(0));
        assert!(!consumed.contains(1));
    }

    #[test]
    fn test_title_skips_consumed_and_credit_lines() {
        let para_texts = texts(&["250101-Doc", "Source: someone", "", "Short caption"]);
        let mut consumed = ConsumedParagraphs::new();
        consumed.insert(0); // document title
        consumed.insert(2); // figure container

        let mut group = group_at(&[2]);
        let attributor = CaptionAttributor::new(&ConvertOptions::default());
        attributor.attribute(&mut group, &para_texts, &mut consumed);

        // -2 is the consumed doc title, -1 is a credit line, +1 wins.
        assert_eq!(group.title.as_deref(), Some("Short caption"));
    }

    #[test]
    fn test_title_rejects_long_prose() {
        let long = "x".repeat(46);
        let para_texts = texts(&[&long, "", ""]);
        let mut consumed = ConsumedParagraphs::new();
        consumed.insert(1);

        let mut group = group_at(&[1]);
        let attributor = CaptionAttributor::new(&ConvertOptions::default());
        attributor.attribute(&mut group, &para_texts, &mut consumed);
        assert!(group.title.is_none());
    }

    #[test]
    fn test_credit_forward_wins_over_backward() {
        let para_texts = texts(&["Source: Behind", "", "Source: Ahead"]);
        let mut consumed = ConsumedParagraphs::new();
        consumed.insert(1);

        let mut group = group_at(&[1]);
        let attributor = CaptionAttributor::new(&ConvertOptions::default());
        attributor.attribute(&mut group, &para_texts, &mut consumed);

        assert_eq!(group.credit.as_deref(), Some("Ahead"));
        assert!(consumed.contains(2));
        assert!(!consumed.contains(0));
    }

    #[test]
    fn test_credit_not_claimed_twice() {
        let para_texts = texts(&["", "Source: Shared", ""]);
        let mut consumed = ConsumedParagraphs::new();
        consumed.insert(0);
        consumed.insert(2);

        let attributor = CaptionAttributor::new(&ConvertOptions::default());

        let mut first = group_at(&[0]);
        attributor.attribute(&mut first, &para_texts, &mut consumed);
        assert_eq!(first.credit.as_deref(), Some("Shared"));

        let mut second = group_at(&[2]);
        attributor.attribute(&mut second, &para_texts, &mut consumed);
        assert!(second.credit.is_none());
    }

    #[test]
    fn test_reason_records_outcome() {
        let para_texts = texts(&["Caption", "", "Source: X"]);
        let mut consumed = ConsumedParagraphs::new();
        consumed.insert(1);

        let mut group = group_at(&[1]);
        let attributor = CaptionAttributor::new(&ConvertOptions::default());
        attributor.attribute(&mut group, &para_texts, &mut consumed);

        assert!(group.reason.contains("title: 'Caption'"));
        assert!(group.reason.contains("credit: 'X'"));
    }
}
