use crate::analysis::domain::DocSection;
use crate::ports::outbound::DocExtractor;
use std::collections::HashMap;

/// MarkdownExtractor adapter for splitting markdown documentation
///
/// Sections are delimited by ATX headings; text before the first
/// heading becomes an untitled preamble section. Front matter is the
/// registry-style YAML block between leading `---` fences.
pub struct MarkdownExtractor;

impl MarkdownExtractor {
    pub fn new() -> Self {
        Self
    }

    fn strip_front_matter(content: &str) -> &str {
        let Some(rest) = content.strip_prefix("---\n") else {
            return content;
        };
        match rest.find("\n---") {
            Some(end) => {
                let after = &rest[end + 4..];
                after.strip_prefix('\n').unwrap_or(after)
            }
            None => content,
        }
    }
}

impl Default for MarkdownExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocExtractor for MarkdownExtractor {
    fn extract_sections(&self, path: &str, content: &str) -> Vec<DocSection> {
        let body = Self::strip_front_matter(content);
        let mut sections = Vec::new();
        let mut heading = String::new();
        let mut lines: Vec<&str> = Vec::new();
        let mut in_code_fence = false;

        let mut flush = |heading: &str, lines: &mut Vec<&str>, sections: &mut Vec<DocSection>| {
            let text = lines.join("\n").trim().to_string();
            if !heading.is_empty() || !text.is_empty() {
                sections.push(DocSection {
                    file: path.to_string(),
                    heading: heading.to_string(),
                    body: text,
                });
            }
            lines.clear();
        };

        for line in body.lines() {
            if line.trim_start().starts_with("```") {
                in_code_fence = !in_code_fence;
                lines.push(line);
                continue;
            }
            // Headings inside code fences are content, not structure
            if !in_code_fence && line.starts_with('#') {
                flush(&heading, &mut lines, &mut sections);
                heading = line.trim_start_matches('#').trim().to_string();
            } else {
                lines.push(line);
            }
        }
        flush(&heading, &mut lines, &mut sections);

        sections
    }

    fn front_matter(&self, content: &str) -> Option<HashMap<String, String>> {
        let rest = content.strip_prefix("---\n")?;
        let end = rest.find("\n---")?;
        let yaml = &rest[..end];

        let parsed: serde_yaml_ng::Value = serde_yaml_ng::from_str(yaml).ok()?;
        let mapping = parsed.as_mapping()?;

        let mut front = HashMap::new();
        for (key, value) in mapping {
            let Some(key) = key.as_str() else {
                continue;
            };
            let rendered = match value {
                serde_yaml_ng::Value::String(s) => s.clone(),
                serde_yaml_ng::Value::Number(n) => n.to_string(),
                serde_yaml_ng::Value::Bool(b) => b.to_string(),
                _ => continue,
            };
            front.insert(key.to_string(), rendered);
        }
        Some(front)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_split_on_headings() {
        let extractor = MarkdownExtractor::new();
        let content = "intro text\n\n# Model\n\ndetails\n\n## Training Data\n\nmore\n";
        let sections = extractor.extract_sections("README.md", content);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].heading, "");
        assert_eq!(sections[0].body, "intro text");
        assert_eq!(sections[1].heading, "Model");
        assert_eq!(sections[2].heading, "Training Data");
        assert_eq!(sections[2].body, "more");
    }

    #[test]
    fn test_headings_in_code_fences_are_ignored() {
        let extractor = MarkdownExtractor::new();
        let content = "# Usage\n\n```bash\n# not a heading\necho hi\n```\n";
        let sections = extractor.extract_sections("README.md", content);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].body.contains("# not a heading"));
    }

    #[test]
    fn test_front_matter_parsing() {
        let extractor = MarkdownExtractor::new();
        let content = "---\nbase_model: meta-llama/Llama-3-8B\npipeline_tag: text-generation\nlikes: 42\n---\n\n# Card\n";
        let front = extractor.front_matter(content).unwrap();
        assert_eq!(
            front.get("base_model").map(String::as_str),
            Some("meta-llama/Llama-3-8B")
        );
        assert_eq!(front.get("likes").map(String::as_str), Some("42"));

        // Front matter is not part of the section bodies
        let sections = extractor.extract_sections("MODEL_CARD.md", content);
        assert_eq!(sections[0].heading, "Card");
    }

    #[test]
    fn test_no_front_matter() {
        let extractor = MarkdownExtractor::new();
        assert!(extractor.front_matter("# Plain\n").is_none());
    }
}
