//! YAML serialization.

use crate::document::ProcessedDocument;
use crate::Result;

/// YAML serializer for processing results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct YamlSerializer;

impl YamlSerializer {
    /// Create a YAML serializer.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Serialize a processed document to YAML.
    ///
    /// # Errors
    /// Returns an error when serialization fails.
    pub fn serialize(&self, doc: &ProcessedDocument) -> Result<String> {
        Ok(serde_yaml::to_string(doc)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ClassifierOptions;
    use crate::document::{CapabilitySet, DocumentMetadata};
    use crate::element::Element;
    use crate::hierarchy::build_hierarchy;
    use crate::toc::derive_toc;

    #[test]
    fn test_yaml_output() {
        let built = build_hierarchy(
            &[Element::heading(0, 1, "Section")],
            &ClassifierOptions::default(),
        );
        let toc = derive_toc(&built.tree);
        let doc = ProcessedDocument {
            tree: built.tree,
            toc,
            tables: built.tables,
            images: built.images,
            page_mappings: Vec::new(),
            headers_footers: Vec::new(),
            endnotes: Vec::new(),
            capabilities: CapabilitySet::default(),
            metadata: DocumentMetadata::default(),
            warnings: Vec::new(),
        };
        let yaml = YamlSerializer::new().serialize(&doc).unwrap();
        assert!(yaml.contains("toc:"));
        assert!(yaml.contains("Section"));
    }
}
