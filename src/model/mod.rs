//! Data model for the normalized content stream.
//!
//! This module defines the intermediate representation that bridges
//! upstream document extraction and the normalized block output. The
//! input side (`Element`, `ElementStream`) mirrors what the external
//! extractor produces; the output side (`Block`, `NcjDocument`) is the
//! ordered stream handed to layout engines.

mod asset;
mod document;
mod element;
mod group;

pub use asset::Asset;
pub use document::{Block, DocInfo, NcjDocument, Report};
pub use element::{Element, ElementStream, FigureElement, DEFAULT_PAGE_WIDTH_EMU};
pub use group::{FigureGroup, Layout};
