//! Two-phase figure grouping.
//!
//! Phase A merges figures that share a container into immediate row
//! groups. Phase B scans the remaining figures with a single forward
//! cursor and merges neighbors whose container gap stays within the
//! configured threshold and whose intervening paragraphs carry no
//! substantial prose. The partition is fully determined by container
//! indices, the gap threshold, and the intervening text; ties are
//! broken strictly by document order.

use super::caption::CreditPattern;
use super::ConvertOptions;
use crate::model::{FigureElement, FigureGroup, Layout};
use log::debug;
use std::collections::BTreeMap;

/// Clusters figure elements into ordered groups with a layout label.
pub struct FigureGrouper {
    max_gap_paras: usize,
    max_title_len: usize,
    page_width_ratio: f64,
    credit: CreditPattern,
}

impl FigureGrouper {
    /// Create a grouper from the pipeline options.
    pub fn new(options: &ConvertOptions) -> Self {
        Self {
            max_gap_paras: options.max_gap_paras,
            max_title_len: options.max_title_len,
            page_width_ratio: options.page_width_ratio,
            credit: CreditPattern::new(),
        }
    }

    /// Partition figures into groups.
    ///
    /// `figures` must be in document order. The returned groups are
    /// sorted by their first member's position and carry ids assigned
    /// in that order.
    pub fn group(
        &self,
        figures: &[FigureElement],
        para_texts: &[String],
        page_width_emu: u64,
    ) -> Vec<FigureGroup> {
        if figures.is_empty() {
            return Vec::new();
        }

        let mut groups = Vec::new();

        // Phase A: co-located figures form immediate row groups.
        let mut by_container: BTreeMap<usize, Vec<&FigureElement>> = BTreeMap::new();
        for fig in figures {
            by_container.entry(fig.container).or_default().push(fig);
        }

        for (&container, members) in &by_container {
            if members.len() >= 2 {
                let reason = format!(
                    "row by co-located(container={}, {} images)",
                    container,
                    members.len()
                );
                groups.push(FigureGroup::new(
                    members.iter().map(|&f| f.clone()).collect(),
                    Layout::Row,
                    reason,
                ));
            }
        }

        // Phase B: forward-cursor adjacency scan over the leftovers.
        let remaining: Vec<&FigureElement> = by_container
            .values()
            .filter(|members| members.len() < 2)
            .flat_map(|members| members.iter().copied())
            .collect();

        let mut i = 0;
        while i < remaining.len() {
            let mut members = vec![remaining[i].clone()];
            let mut j = i + 1;

            while j < remaining.len() {
                let prev = &members[members.len() - 1];
                let next = remaining[j];

                // Leftover containers are distinct, so next is strictly ahead.
                let gap = next.container - prev.container - 1;
                if gap > self.max_gap_paras {
                    break;
                }
                if self.has_substantial_text(para_texts, prev.container, next.container) {
                    break;
                }

                members.push(next.clone());
                j += 1;
            }

            let group = self.finish_group(members, page_width_emu);
            debug!("formed group: {}", group.reason);
            groups.push(group);
            i = j;
        }

        // Stable ids in first-appearance order.
        groups.sort_by_key(|g| (g.first().container, g.first().run_index));
        for (n, group) in groups.iter_mut().enumerate() {
            group.id = format!("grp_{:04}", n + 1);
        }
        groups
    }

    /// Substantial prose between two containers breaks adjacency:
    /// anything longer than the title cap that is not a credit line.
    fn has_substantial_text(&self, para_texts: &[String], from: usize, to: usize) -> bool {
        para_texts
            .iter()
            .take(to)
            .skip(from + 1)
            .any(|text| {
                let text = text.trim();
                text.chars().count() > self.max_title_len && !self.credit.is_credit(text)
            })
    }

    fn finish_group(&self, members: Vec<FigureElement>, page_width_emu: u64) -> FigureGroup {
        if members.len() == 1 {
            let reason = format!("single figure(container={})", members[0].container);
            return FigureGroup::new(members, Layout::Column, reason);
        }

        let containers: Vec<String> = members
            .iter()
            .map(|m| format!("container={}", m.container))
            .collect();
        let single_container = members
            .iter()
            .all(|m| m.container == members[0].container);

        let layout = if single_container || self.fits_side_by_side(&members, page_width_emu) {
            Layout::Row
        } else {
            Layout::Column
        };

        let reason = format!(
            "{} by adjacent-containers({}, gap<={})",
            layout,
            containers.join(", "),
            self.max_gap_paras
        );
        FigureGroup::new(members, layout, reason)
    }

    /// Width test for row reclassification: every adjacent pair of
    /// declared widths must fit the configured fraction of the page.
    fn fits_side_by_side(&self, members: &[FigureElement], page_width_emu: u64) -> bool {
        let budget = self.page_width_ratio * page_width_emu as f64;
        members.windows(2).all(|pair| {
            match (pair[0].width_emu, pair[1].width_emu) {
                (Some(a), Some(b)) => (a + b) as f64 <= budget,
                _ => false,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouper() -> FigureGrouper {
        FigureGrouper::new(&ConvertOptions::default())
    }

    fn empty_texts(n: usize) -> Vec<String> {
        vec![String::new(); n]
    }

    fn fig(container: usize, run_index: usize) -> FigureElement {
        FigureElement::new(container, run_index)
    }

    #[test]
    fn test_no_figures() {
        let groups = grouper().group(&[], &empty_texts(5), 1000);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_co_located_figures_form_row_group() {
        let figures = vec![fig(2, 0), fig(2, 1)];
        let groups = grouper().group(&figures, &empty_texts(5), 1000);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].layout, Layout::Row);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[0].id, "grp_0001");
        assert!(groups[0].reason.contains("co-located"));
    }

    #[test]
    fn test_adjacent_figures_merge_within_gap() {
        // Containers 1 and 3: gap of one empty paragraph, merges.
        let figures = vec![fig(1, 0), fig(3, 0)];
        let groups = grouper().group(&figures, &empty_texts(5), 1000);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].layout, Layout::Column);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_gap_beyond_threshold_splits() {
        // Containers 1 and 4: gap of two paragraphs exceeds default 1.
        let figures = vec![fig(1, 0), fig(4, 0)];
        let groups = grouper().group(&figures, &empty_texts(6), 1000);

        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.len() == 1));
        assert!(groups.iter().all(|g| g.layout == Layout::Column));
        assert_eq!(groups[0].id, "grp_0001");
        assert_eq!(groups[1].id, "grp_0002");
    }

    #[test]
    fn test_substantial_prose_splits() {
        let mut texts = empty_texts(4);
        texts[2] = "y".repeat(50);

        let figures = vec![fig(1, 0), fig(3, 0)];
        let groups = grouper().group(&figures, &texts, 1000);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_credit_line_between_does_not_split() {
        let mut texts = empty_texts(4);
        texts[2] = format!("Source: {}", "y".repeat(60));

        let figures = vec![fig(1, 0), fig(3, 0)];
        let groups = grouper().group(&figures, &texts, 1000);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_short_prose_between_does_not_split() {
        let mut texts = empty_texts(4);
        texts[2] = "a short caption".to_string();

        let figures = vec![fig(1, 0), fig(3, 0)];
        let groups = grouper().group(&figures, &texts, 1000);
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_side_by_side_widths_reclassify_row() {
        let figures = vec![
            fig(1, 0).with_size(400, 300),
            fig(2, 0).with_size(400, 300),
        ];
        let groups = grouper().group(&figures, &empty_texts(4), 1000);

        assert_eq!(groups.len(), 1);
        // 400 + 400 <= 0.95 * 1000
        assert_eq!(groups[0].layout, Layout::Row);
    }

    #[test]
    fn test_wide_figures_stay_column() {
        let figures = vec![
            fig(1, 0).with_size(600, 300),
            fig(2, 0).with_size(600, 300),
        ];
        let groups = grouper().group(&figures, &empty_texts(4), 1000);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].layout, Layout::Column);
    }

    #[test]
    fn test_missing_widths_stay_column() {
        let figures = vec![fig(1, 0), fig(2, 0)];
        let groups = grouper().group(&figures, &empty_texts(4), 1000);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].layout, Layout::Column);
    }

    #[test]
    fn test_phase_a_members_excluded_from_phase_b() {
        // Container 2 hosts a pair (phase A); container 3 is adjacent
        // but must become its own group.
        let figures = vec![fig(2, 0), fig(2, 1), fig(3, 0)];
        let groups = grouper().group(&figures, &empty_texts(5), 1000);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].layout, Layout::Row);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].len(), 1);
    }

    #[test]
    fn test_ids_follow_first_appearance_order() {
        // Phase A group appears after a phase B singleton in the document.
        let figures = vec![fig(0, 0), fig(4, 0), fig(4, 1)];
        let groups = grouper().group(&figures, &empty_texts(6), 1000);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, "grp_0001");
        assert_eq!(groups[0].first().container, 0);
        assert_eq!(groups[1].id, "grp_0002");
        assert_eq!(groups[1].first().container, 4);
    }

    #[test]
    fn test_chain_of_three_merges() {
        let figures = vec![fig(1, 0), fig(2, 0), fig(3, 0)];
        let groups = grouper().group(&figures, &empty_texts(5), 1000);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 3);
        assert_eq!(groups[0].layout, Layout::Column);
    }

    #[test]
    fn test_custom_gap_threshold() {
        let options = ConvertOptions::default().with_max_gap_paras(2);
        let figures = vec![fig(1, 0), fig(4, 0)];
        let groups =
            FigureGrouper::new(&options).group(&figures, &empty_texts(6), 1000);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_deterministic_repartition() {
        let mut texts = empty_texts(8);
        texts[3] = "z".repeat(60);
        let figures = vec![fig(1, 0), fig(2, 0), fig(4, 0), fig(6, 0), fig(6, 1)];

        let first = grouper().group(&figures, &texts, 1000);
        let second = grouper().group(&figures, &texts, 1000);

        let shape = |groups: &[FigureGroup]| -> Vec<(String, usize, Layout)> {
            groups
                .iter()
                .map(|g| (g.id.clone(), g.len(), g.layout))
                .collect()
        };
        assert_eq!(shape(&first), shape(&second));
    }
}
