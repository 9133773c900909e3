use crate::analysis::domain::{
    Category, Evidence, Finding, ParsedDocs, Resumable, Severity,
};
use crate::analysis::units::{DetectionUnit, UnitInput, UnitOutcome};
use crate::ports::outbound::DocExtractor;
use crate::shared::Result;
use async_trait::async_trait;
use std::sync::Arc;

const MAX_DOC_FILES: usize = 20;

const AI_DOC_TOPICS: &[&str] = &[
    "model",
    "training",
    "dataset",
    "fine-tun",
    "inference",
    "prompt",
    "llm",
    "evaluation",
    "benchmark",
];

/// Documentation parsing unit.
///
/// Extracts sections from the README and other markdown files and
/// publishes them as the parsed-docs side channel for the governance
/// and risk units. A finding is only emitted when the documentation
/// actually discusses AI topics.
pub struct DocsParserUnit {
    extractor: Arc<dyn DocExtractor>,
}

impl DocsParserUnit {
    pub fn new(extractor: Arc<dyn DocExtractor>) -> Self {
        Self { extractor }
    }

    fn is_model_card_path(path: &str) -> bool {
        let lower = path.to_lowercase();
        let name = lower.rsplit('/').next().unwrap_or(&lower);
        name == "model_card.md" || name == "modelcard.md" || name == "model-card.md"
    }

    fn doc_candidates(input: &UnitInput<'_>) -> Vec<String> {
        let mut readme = Vec::new();
        let mut rest = Vec::new();
        for file in input.repo.files() {
            let lower = file.path.to_lowercase();
            if !lower.ends_with(".md") {
                continue;
            }
            let name = lower.rsplit('/').next().unwrap_or(&lower);
            if name == "readme.md" {
                readme.push(file.path.clone());
            } else if Self::is_model_card_path(&file.path)
                || lower.starts_with("docs/")
                || lower.starts_with("doc/")
            {
                rest.push(file.path.clone());
            }
        }
        // Root README sorts first so it always survives the cap.
        readme.sort_by_key(|p| p.matches('/').count());
        readme.extend(rest);
        readme.truncate(MAX_DOC_FILES);
        readme
    }
}

#[async_trait]
impl DetectionUnit for DocsParserUnit {
    fn name(&self) -> &'static str {
        "docs"
    }

    async fn run(&self, input: UnitInput<'_>) -> Result<Resumable<UnitOutcome>> {
        let mut docs = ParsedDocs::default();
        let mut ai_topic_evidence = Vec::new();

        for path in Self::doc_candidates(&input) {
            let Some(content) = input.repo.file_content(&path).await? else {
                continue;
            };

            let name = path.to_lowercase();
            let is_readme = name.rsplit('/').next().unwrap_or(&name) == "readme.md";
            if is_readme && docs.readme_path.is_none() {
                docs.readme_path = Some(path.clone());
            }

            if Self::is_model_card_path(&path) {
                docs.has_model_card = true;
            }
            // Registry-style model cards carry YAML front matter with
            // model metadata keys.
            if let Some(front) = self.extractor.front_matter(&content) {
                if front.contains_key("model_name")
                    || front.contains_key("base_model")
                    || front.contains_key("pipeline_tag")
                {
                    docs.has_model_card = true;
                }
            }

            let sections = self.extractor.extract_sections(&path, &content);
            for section in &sections {
                let heading = section.heading.to_lowercase();
                if AI_DOC_TOPICS.iter().any(|t| heading.contains(t)) && ai_topic_evidence.len() < 5 {
                    ai_topic_evidence
                        .push(Evidence::file(&path).with_snippet(section.heading.clone()));
                }
            }
            docs.sections.extend(sections);
        }

        let mut findings = Vec::new();
        if !ai_topic_evidence.is_empty() {
            let mut finding = Finding::new(
                "docs-ai-topics",
                Category::Metadata,
                Severity::Info,
                5,
                "AI Topics in Documentation",
                format!(
                    "Documentation contains {} section(s) covering AI topics",
                    ai_topic_evidence.len()
                ),
            );
            for ev in ai_topic_evidence {
                finding.push_evidence(ev);
            }
            findings.push(finding);
        }

        let mut outcome = UnitOutcome::from_findings(findings);
        outcome.parsed_docs = Some(docs);
        Ok(Resumable::Complete(outcome))
    }
}
