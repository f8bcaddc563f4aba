//! JSON rendering for normalized documents.

use crate::error::{Error, Result};
use crate::model::NcjDocument;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a document to JSON.
pub fn to_json(doc: &NcjDocument, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, DocInfo, Report};

    fn sample() -> NcjDocument {
        NcjDocument {
            doc: DocInfo {
                title: Some("Test".to_string()),
                date: None,
                locale: "zh-CN".to_string(),
                version: "v1".to_string(),
                source_file: None,
            },
            blocks: vec![Block::paragraph("Hello")],
            assets: vec![],
            report: Report::default(),
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("Test"));
        assert!(json.contains("\"type\": \"paragraph\""));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines
        assert!(json.contains("\"version\":\"v1\""));
    }
}
