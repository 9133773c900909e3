use crate::analysis::domain::DocSection;
use std::collections::HashMap;

/// DocExtractor port: the lightweight YAML-front-matter/Markdown
/// section parser used to extract documentation snippets.
///
/// This is a simple I/O shim; the docs detection unit consumes it
/// through this narrow contract.
pub trait DocExtractor: Send + Sync {
    /// Splits a Markdown document into heading-delimited sections.
    fn extract_sections(&self, path: &str, content: &str) -> Vec<DocSection>;

    /// Parses the leading YAML front-matter block, if any, into a flat
    /// string map. Returns `None` when no front matter is present or it
    /// cannot be parsed.
    fn front_matter(&self, content: &str) -> Option<HashMap<String, String>>;
}
