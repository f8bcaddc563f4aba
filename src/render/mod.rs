//! Rendering module for serializing the normalized document.

mod json;

pub use json::{to_json, JsonFormat};
