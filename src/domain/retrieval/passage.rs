use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A retrieved knowledge base passage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    /// Identifier of the passage (source URI or synthetic id)
    pub id: String,
    /// Passage content text
    pub content: String,
    /// Similarity score (0.0 - 1.0, higher is more similar)
    pub score: f32,
    /// Passage metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
    /// Source document reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Passage {
    /// Create a new passage
    pub fn new(id: impl Into<String>, content: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            score,
            metadata: HashMap::new(),
            source: None,
        }
    }

    /// Set all metadata
    pub fn with_all_metadata(mut self, metadata: HashMap<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set source reference
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passage_builder() {
        let passage = Passage::new("doc-1", "Some content", 0.92)
            .with_source("s3://bucket/doc.pdf");

        assert_eq!(passage.id, "doc-1");
        assert_eq!(passage.score, 0.92);
        assert_eq!(passage.source.as_deref(), Some("s3://bucket/doc.pdf"));
    }

    #[test]
    fn test_passage_serialization_skips_empty() {
        let passage = Passage::new("doc-1", "text", 0.5);
        let json = serde_json::to_string(&passage).unwrap();
        assert!(!json.contains("metadata"));
        assert!(!json.contains("source"));
    }
}
