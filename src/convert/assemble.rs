//! Final ordered assembly of the output block stream.

use super::ConsumedParagraphs;
use crate::model::{Block, FigureGroup};
use std::collections::{HashMap, HashSet};

/// Merges groups and surviving paragraphs into one ordered stream.
///
/// The pass walks container indices once. Grouped figures are emitted
/// contiguously at their first member's position; each surviving
/// paragraph is emitted at its own position.
pub struct BlockAssembler<'a> {
    groups: &'a [FigureGroup],
    asset_ids: &'a HashMap<(usize, usize), String>,
}

impl<'a> BlockAssembler<'a> {
    /// Create an assembler over attributed groups and registered assets.
    pub fn new(
        groups: &'a [FigureGroup],
        asset_ids: &'a HashMap<(usize, usize), String>,
    ) -> Self {
        Self { groups, asset_ids }
    }

    /// Produce the ordered block stream and the per-group debug trace.
    pub fn assemble(
        &self,
        para_texts: &[String],
        consumed: &ConsumedParagraphs,
    ) -> (Vec<Block>, Vec<String>) {
        let mut blocks = Vec::new();
        let mut debug = Vec::new();
        let mut emitted: HashSet<&str> = HashSet::new();
        let mut figure_ordinal = 0usize;

        for (idx, text) in para_texts.iter().enumerate() {
            for group in self.groups {
                if group.first().container == idx && !emitted.contains(group.id.as_str()) {
                    self.emit_group(group, &mut blocks, &mut figure_ordinal);
                    debug.push(format!("{}: {}", group.id, group.reason));
                    emitted.insert(group.id.as_str());
                }
            }

            let text = text.trim();
            if !text.is_empty() && !consumed.contains(idx) {
                blocks.push(Block::paragraph(text));
            }
        }

        (blocks, debug)
    }

    fn emit_group(&self, group: &FigureGroup, blocks: &mut Vec<Block>, ordinal: &mut usize) {
        let group_len = group.len();
        for (seq, member) in group.members.iter().enumerate() {
            let asset_id = self
                .asset_ids
                .get(&(member.container, member.run_index))
                .cloned()
                .unwrap_or_else(|| format!("img_missing_{:04}", *ordinal));

            blocks.push(Block::Figure {
                asset_id,
                title: if seq == 0 { group.title.clone() } else { None },
                credit: if seq == group_len - 1 {
                    group.credit.clone()
                } else {
                    None
                },
                group_id: group.id.clone(),
                group_seq: seq + 1,
                group_len,
                layout: group.layout,
            });
            *ordinal += 1;
        }
    }
}
