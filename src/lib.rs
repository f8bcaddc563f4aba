//! # ncj
//!
//! Normalized Content JSON conversion for extracted word-processing
//! documents.
//!
//! The crate takes a flat, ordered sequence of paragraph and image
//! elements — produced by an external document extractor — and turns it
//! into an ordered block stream suitable for downstream layout engines.
//! Its core is the grouping-and-attribution engine: deciding which
//! images belong together as one visual figure group, whether that
//! group is laid out side by side or stacked, and which nearby prose
//! lines are the group's title and credit. Image bytes are
//! content-addressed into stable, deduplicated assets.
//!
//! ## Quick Start
//!
//! ```
//! use ncj::{convert, ConvertOptions, NoMedia};
//! use ncj::model::{Element, ElementStream};
//!
//! fn main() -> ncj::Result<()> {
//!     let stream = ElementStream::with_default_width(vec![
//!         Element::paragraph(0, "250101-Demo Title"),
//!         Element::paragraph(1, "Intro text"),
//!         Element::figure(2, 0, "media/image1.png"),
//!         Element::paragraph(3, "Source: Agency X"),
//!         Element::paragraph(4, "More text"),
//!     ]);
//!
//!     let doc = convert(&stream, &NoMedia, &ConvertOptions::default())?;
//!     let json = ncj::render::to_json(&doc, ncj::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Two-phase figure grouping**: co-located images merge into row
//!   groups, adjacent images merge across small container gaps
//! - **Caption attribution**: fixed-offset title and credit search with
//!   system-wide paragraph consumption
//! - **Content-addressed assets**: sha256-derived ids, deduplicated,
//!   with an optional write-once on-disk store
//! - **Deterministic**: one synchronous pass, stable group ids, stable
//!   output order

pub mod convert;
pub mod error;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use convert::{
    convert, AssetRegistry, BlockAssembler, CaptionAttributor, ConsumedParagraphs, ConvertOptions,
    CreditPattern, DocMetadata, FigureGrouper, InMemoryMedia, MediaSource, MetadataExtractor,
    NoMedia, NCJ_VERSION,
};
pub use error::{Error, Result};
pub use model::{
    Asset, Block, DocInfo, Element, ElementStream, FigureElement, FigureGroup, Layout,
    NcjDocument, Report,
};
pub use render::{to_json, JsonFormat};

/// Convert an element stream straight to a JSON string.
///
/// Convenience wrapper over [`convert`] and [`render::to_json`].
pub fn convert_to_json<M: MediaSource>(
    stream: &ElementStream,
    media: &M,
    options: &ConvertOptions,
    format: JsonFormat,
) -> Result<String> {
    let doc = convert(stream, media, options)?;
    render::to_json(&doc, format)
}
