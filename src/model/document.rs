//! Output document types.

use super::{Asset, Layout};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The normalized content document: ordered blocks plus asset and
/// report sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NcjDocument {
    /// Document-level metadata
    pub doc: DocInfo,

    /// Ordered content blocks
    pub blocks: Vec<Block>,

    /// Deduplicated assets, in first-registration order
    pub assets: Vec<Asset>,

    /// Warnings and optional debug trace
    pub report: Report,
}

impl NcjDocument {
    /// Number of figure blocks.
    pub fn figure_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_figure()).count()
    }

    /// Number of distinct figure groups.
    pub fn group_count(&self) -> usize {
        let mut ids: Vec<&str> = self
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Figure { group_id, .. } => Some(group_id.as_str()),
                Block::Paragraph { .. } => None,
            })
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Concatenated paragraph text, for quick inspection.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph { text } => Some(text.as_str()),
                Block::Figure { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Document-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocInfo {
    /// Title extracted from the leading paragraph, if any
    pub title: Option<String>,

    /// Date decoded from the leading paragraph, if valid
    pub date: Option<NaiveDate>,

    /// Content locale tag
    pub locale: String,

    /// Output schema version
    pub version: String,

    /// Source file name, when known
    pub source_file: Option<String>,
}

/// A block in the normalized output stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A surviving prose paragraph
    Paragraph {
        /// Trimmed paragraph text
        text: String,
    },

    /// One figure of a group, at its document position
    Figure {
        /// Content-addressed asset id
        asset_id: String,
        /// Group title; set only on the first member
        title: Option<String>,
        /// Group credit; set only on the last member
        credit: Option<String>,
        /// Owning group id
        group_id: String,
        /// 1-based rank within the group
        group_seq: usize,
        /// Member count of the group
        group_len: usize,
        /// Layout label of the group
        layout: Layout,
    },
}

impl Block {
    /// Create a paragraph block.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph { text: text.into() }
    }

    /// Check if this block is a figure.
    pub fn is_figure(&self) -> bool {
        matches!(self, Block::Figure { .. })
    }

    /// Check if this block is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Block::Paragraph { .. })
    }
}

/// Conversion report: non-fatal warnings and optional debug trace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    /// Non-fatal problems encountered (missing media, store failures)
    pub warnings: Vec<String>,

    /// Group-formation trace, populated only in debug mode
    pub debug: Vec<String>,
}
