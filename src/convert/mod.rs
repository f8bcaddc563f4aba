//! The conversion pipeline: element stream in, normalized document out.
//!
//! The pipeline is deterministic and single-threaded. One pass runs the
//! metadata extractor, the two-phase figure grouper, the caption
//! attributor, the asset registry, and the final block assembly, all
//! sharing one explicit consumed-paragraph set.
//!
//! # Example
//!
//! ```
//! use ncj::convert::{convert, ConvertOptions, NoMedia};
//! use ncj::model::{Element, ElementStream};
//!
//! fn main() -> ncj::Result<()> {
//!     let stream = ElementStream::with_default_width(vec![
//!         Element::paragraph(0, "250101-Demo Title"),
//!         Element::paragraph(1, "Intro text"),
//!         Element::figure(2, 0, "media/image1.png"),
//!         Element::paragraph(3, "Source: Agency X"),
//!     ]);
//!     let doc = convert(&stream, &NoMedia, &ConvertOptions::default())?;
//!     assert_eq!(doc.doc.title.as_deref(), Some("Demo Title"));
//!     Ok(())
//! }
//! ```

mod assemble;
mod assets;
mod caption;
mod grouping;
mod metadata;

pub use assemble::BlockAssembler;
pub use assets::{AssetRegistry, InMemoryMedia, MediaSource, NoMedia};
pub use caption::{CaptionAttributor, CreditPattern};
pub use grouping::FigureGrouper;
pub use metadata::{DocMetadata, MetadataExtractor};

use crate::error::{Error, Result};
use crate::model::{DocInfo, ElementStream, NcjDocument, Report};
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::path::PathBuf;

/// Output schema version tag.
pub const NCJ_VERSION: &str = "v1";

/// Options for the conversion pipeline.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Maximum character length for a figure title candidate
    pub max_title_len: usize,

    /// Maximum container gap bridged by adjacency grouping
    pub max_gap_paras: usize,

    /// Fraction of page width two figures may jointly occupy and
    /// still count as side-by-side
    pub page_width_ratio: f64,

    /// Record group-formation reasons in the report
    pub debug: bool,

    /// Directory for the on-disk asset store (None = metadata only)
    pub assets_dir: Option<PathBuf>,

    /// Locale tag recorded in the output
    pub locale: String,

    /// Source file name recorded in the output
    pub source_file: Option<String>,
}

impl ConvertOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title length cap.
    pub fn with_max_title_len(mut self, len: usize) -> Self {
        self.max_title_len = len;
        self
    }

    /// Set the maximum adjacency gap in containers.
    pub fn with_max_gap_paras(mut self, gap: usize) -> Self {
        self.max_gap_paras = gap;
        self
    }

    /// Set the side-by-side page width ratio.
    pub fn with_page_width_ratio(mut self, ratio: f64) -> Self {
        self.page_width_ratio = ratio;
        self
    }

    /// Enable or disable the debug trace.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the asset output directory.
    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = Some(dir.into());
        self
    }

    /// Set the locale tag.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set the source file name.
    pub fn with_source_file(mut self, name: impl Into<String>) -> Self {
        self.source_file = Some(name.into());
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_title_len: 45,
            max_gap_paras: 1,
            page_width_ratio: 0.95,
            debug: false,
            assets_dir: None,
            locale: "zh-CN".to_string(),
            source_file: None,
        }
    }
}

/// The set of container indices absorbed by figures, captions, or the
/// document title.
///
/// One instance is threaded through the whole pipeline; a paragraph in
/// this set never surfaces as an output block and never serves a
/// second group.
#[derive(Debug, Clone, Default)]
pub struct ConsumedParagraphs(BTreeSet<usize>);

impl ConsumedParagraphs {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a container index as consumed.
    pub fn insert(&mut self, index: usize) {
        self.0.insert(index);
    }

    /// Check whether a container index is consumed.
    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    /// Number of consumed indices.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if nothing has been consumed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Convert an element stream into a normalized document.
///
/// This is the crate's core contract: a pure function from
/// `(elements, media, options)` to the output structure. The only side
/// effect is the optional write-once asset store.
///
/// # Errors
///
/// Returns [`Error::Input`] for an empty stream. Per-asset media
/// failures are not errors; they substitute placeholders and land in
/// `report.warnings`.
pub fn convert<M: MediaSource>(
    stream: &ElementStream,
    media: &M,
    options: &ConvertOptions,
) -> Result<NcjDocument> {
    if stream.is_empty() {
        return Err(Error::Input("empty element stream".to_string()));
    }

    let para_texts = stream.para_texts();
    let figures = stream.figures();
    let mut consumed = ConsumedParagraphs::new();

    let metadata = MetadataExtractor::new().extract(&para_texts, &mut consumed);

    let mut groups =
        FigureGrouper::new(options).group(&figures, &para_texts, stream.page_width_emu);

    // Figure containers are consumed before captions are searched, so
    // a hosting paragraph can never double as a title or credit.
    for group in &groups {
        for member in &group.members {
            consumed.insert(member.container);
        }
    }

    let attributor = CaptionAttributor::new(options);
    for group in groups.iter_mut() {
        attributor.attribute(group, &para_texts, &mut consumed);
    }

    let mut registry = AssetRegistry::new(options.assets_dir.as_deref());
    let mut asset_ids: HashMap<(usize, usize), String> = HashMap::new();
    for (ordinal, fig) in figures.iter().enumerate() {
        let id = registry.register(fig, ordinal, media);
        asset_ids.insert((fig.container, fig.run_index), id);
    }

    let assembler = BlockAssembler::new(&groups, &asset_ids);
    let (blocks, debug) = assembler.assemble(&para_texts, &consumed);

    let (warnings, assets) = registry.into_parts();

    Ok(NcjDocument {
        doc: DocInfo {
            title: metadata.as_ref().map(|m| m.title.clone()),
            date: metadata.as_ref().and_then(|m| m.date),
            locale: options.locale.clone(),
            version: NCJ_VERSION.to_string(),
            source_file: options.source_file.clone(),
        },
        blocks,
        assets,
        report: Report {
            warnings,
            debug: if options.debug { debug } else { Vec::new() },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = ConvertOptions::new()
            .with_max_title_len(30)
            .with_max_gap_paras(2)
            .with_page_width_ratio(0.8)
            .with_debug(true)
            .with_locale("en-US")
            .with_source_file("report.docx");

        assert_eq!(options.max_title_len, 30);
        assert_eq!(options.max_gap_paras, 2);
        assert!(options.debug);
        assert_eq!(options.locale, "en-US");
        assert_eq!(options.source_file.as_deref(), Some("report.docx"));
    }

    #[test]
    fn test_options_defaults() {
        let options = ConvertOptions::default();
        assert_eq!(options.max_title_len, 45);
        assert_eq!(options.max_gap_paras, 1);
        assert!((options.page_width_ratio - 0.95).abs() < f64::EPSILON);
        assert!(!options.debug);
        assert!(options.assets_dir.is_none());
        assert_eq!(options.locale, "zh-CN");
    }

    #[test]
    fn test_consumed_paragraphs() {
        let mut consumed = ConsumedParagraphs::new();
        assert!(consumed.is_empty());

        consumed.insert(3);
        consumed.insert(3);
        assert!(consumed.contains(3));
        assert!(!consumed.contains(4));
        assert_eq!(consumed.len(), 1);
    }

    #[test]
    fn test_convert_empty_stream_is_fatal() {
        use crate::model::ElementStream;

        let stream = ElementStream::with_default_width(vec![]);
        let result = convert(&stream, &NoMedia, &ConvertOptions::default());
        assert!(matches!(result, Err(Error::Input(_))));
    }
}
