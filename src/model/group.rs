//! Figure group types produced by the grouping pass.

use super::FigureElement;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout label for a figure group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Members rendered side by side
    Row,
    /// Members rendered stacked
    Column,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Row => write!(f, "row"),
            Layout::Column => write!(f, "column"),
        }
    }
}

/// An ordered cluster of figures treated as one visual unit.
///
/// Members keep their original document order. The id is assigned in
/// first-appearance order (`grp_0001`, `grp_0002`, ...) and is the only
/// key used to track a group through assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureGroup {
    /// Stable group id, `grp_%04d`
    pub id: String,

    /// Member figures in document order (never empty)
    pub members: Vec<FigureElement>,

    /// Layout label
    pub layout: Layout,

    /// Optional title attributed from nearby prose
    pub title: Option<String>,

    /// Optional credit attributed from nearby prose
    pub credit: Option<String>,

    /// Human-readable trace of how the group was formed
    pub reason: String,
}

impl FigureGroup {
    /// Create a group; the id is assigned later in first-appearance order.
    pub fn new(members: Vec<FigureElement>, layout: Layout, reason: impl Into<String>) -> Self {
        debug_assert!(!members.is_empty());
        Self {
            id: String::new(),
            members,
            layout,
            title: None,
            credit: None,
            reason: reason.into(),
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Groups are never empty; provided for completeness.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// First member in document order.
    pub fn first(&self) -> &FigureElement {
        &self.members[0]
    }

    /// Last member in document order.
    pub fn last(&self) -> &FigureElement {
        &self.members[self.members.len() - 1]
    }

    /// Check if all members share one container index.
    pub fn single_container(&self) -> bool {
        self.members
            .iter()
            .all(|m| m.container == self.members[0].container)
    }
}
