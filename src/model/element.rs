//! Input element types produced by the upstream extractor.

use serde::{Deserialize, Serialize};

/// Fallback page width in EMU when the extractor reports none
/// (the width of an A4 body with default margins).
pub const DEFAULT_PAGE_WIDTH_EMU: u64 = 7_559_675;

/// A single element of the extracted document, in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    /// Prose content of one paragraph or table container.
    Paragraph {
        /// Zero-based document-order position of the container
        index: usize,
        /// Text content (may be empty for figure-only containers)
        text: String,
    },

    /// An inline image hosted by a container.
    Figure(FigureElement),
}

impl Element {
    /// Create a paragraph element.
    pub fn paragraph(index: usize, text: impl Into<String>) -> Self {
        Element::Paragraph {
            index,
            text: text.into(),
        }
    }

    /// Create a figure element with no declared size.
    pub fn figure(container: usize, run_index: usize, source_ref: impl Into<String>) -> Self {
        Element::Figure(FigureElement {
            container,
            run_index,
            width_emu: None,
            height_emu: None,
            source_ref: Some(source_ref.into()),
        })
    }

    /// Check if this element is a figure.
    pub fn is_figure(&self) -> bool {
        matches!(self, Element::Figure(_))
    }

    /// The container index this element occupies or references.
    pub fn container(&self) -> usize {
        match self {
            Element::Paragraph { index, .. } => *index,
            Element::Figure(fig) => fig.container,
        }
    }
}

/// An image reference extracted from the document.
///
/// `container` is the document-order position of the paragraph or table
/// hosting the image; co-located figures share a container and are
/// ordered by `run_index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureElement {
    /// Container index of the hosting paragraph/table
    pub container: usize,

    /// Position among the drawings of the same container
    pub run_index: usize,

    /// Declared width in EMU, if present in the source
    pub width_emu: Option<u64>,

    /// Declared height in EMU, if present in the source
    pub height_emu: Option<u64>,

    /// Opaque media reference resolved by the byte accessor
    pub source_ref: Option<String>,
}

impl FigureElement {
    /// Create a figure element.
    pub fn new(container: usize, run_index: usize) -> Self {
        Self {
            container,
            run_index,
            width_emu: None,
            height_emu: None,
            source_ref: None,
        }
    }

    /// Set the declared dimensions in EMU.
    pub fn with_size(mut self, width_emu: u64, height_emu: u64) -> Self {
        self.width_emu = Some(width_emu);
        self.height_emu = Some(height_emu);
        self
    }

    /// Set the media reference.
    pub fn with_source_ref(mut self, source_ref: impl Into<String>) -> Self {
        self.source_ref = Some(source_ref.into());
        self
    }
}

/// The ordered element sequence handed over by the extractor, plus the
/// declared page width used by the side-by-side layout test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementStream {
    /// Elements in document order
    pub elements: Vec<Element>,

    /// Declared page width in EMU
    pub page_width_emu: u64,
}

impl ElementStream {
    /// Create a stream with an explicit page width.
    pub fn new(elements: Vec<Element>, page_width_emu: u64) -> Self {
        Self {
            elements,
            page_width_emu,
        }
    }

    /// Create a stream with the default page width.
    pub fn with_default_width(elements: Vec<Element>) -> Self {
        Self::new(elements, DEFAULT_PAGE_WIDTH_EMU)
    }

    /// Check if the stream has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of container slots covered by the stream.
    pub fn container_count(&self) -> usize {
        self.elements
            .iter()
            .map(|e| e.container() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Trimmed prose per container index.
    ///
    /// Containers that host only figures get an empty entry, so the
    /// result is indexable by any container index in the stream.
    pub fn para_texts(&self) -> Vec<String> {
        let mut texts = vec![String::new(); self.container_count()];
        for element in &self.elements {
            if let Element::Paragraph { index, text } = element {
                texts[*index] = text.trim().to_string();
            }
        }
        texts
    }

    /// All figure elements, in document order.
    pub fn figures(&self) -> Vec<FigureElement> {
        let mut figures: Vec<FigureElement> = self
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Figure(fig) => Some(fig.clone()),
                Element::Paragraph { .. } => None,
            })
            .collect();
        figures.sort_by_key(|f| (f.container, f.run_index));
        figures
    }
}
