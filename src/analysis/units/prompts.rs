use crate::analysis::domain::{Category, Evidence, Finding, Resumable, Severity};
use crate::analysis::units::{DetectionUnit, Needs, UnitInput, UnitOutcome};
use crate::shared::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

static SYSTEM_PROMPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(system_prompt|"role"\s*:\s*"system"|you are an? [a-z]+ (assistant|agent|expert))"#)
        .expect("system prompt pattern")
});

/// Prompt asset scan unit.
///
/// Two sources: prompt template files identified from the listing, and
/// embedded system-prompt string literals in files already confirmed
/// to contain AI usage.
pub struct PromptScanUnit;

impl PromptScanUnit {
    pub fn new() -> Self {
        Self
    }

    fn is_prompt_asset(path: &str) -> bool {
        let lower = path.to_lowercase();
        if lower.ends_with(".prompt") || lower.ends_with(".prompty") {
            return true;
        }
        let in_prompt_dir = lower.split('/').any(|seg| seg == "prompts" || seg == "prompt");
        if in_prompt_dir && (lower.ends_with(".txt") || lower.ends_with(".md") || lower.ends_with(".yaml") || lower.ends_with(".yml") || lower.ends_with(".json")) {
            return true;
        }
        (lower.ends_with(".jinja") || lower.ends_with(".j2")) && lower.contains("prompt")
    }
}

#[async_trait]
impl DetectionUnit for PromptScanUnit {
    fn name(&self) -> &'static str {
        "prompts"
    }

    fn needs(&self) -> Needs {
        Needs {
            ai_files: true,
            ..Needs::NONE
        }
    }

    async fn run(&self, input: UnitInput<'_>) -> Result<Resumable<UnitOutcome>> {
        let mut findings = Vec::new();

        let assets: Vec<String> = input
            .repo
            .files()
            .iter()
            .filter(|f| Self::is_prompt_asset(&f.path))
            .map(|f| f.path.clone())
            .collect();

        if !assets.is_empty() {
            let mut finding = Finding::new(
                "prompts-assets",
                Category::Prompts,
                Severity::Low,
                5,
                "Prompt Template Files Detected",
                format!("{} prompt template file(s) in the repository", assets.len()),
            );
            for path in &assets {
                finding.push_evidence(Evidence::file(path));
            }
            findings.push(finding);
        }

        // Embedded system prompts: only files already confirmed as AI
        // usage sites are worth fetching here.
        let mut embedded = Vec::new();
        if let Some(ai_files) = input.ai_files {
            for path in ai_files {
                let Some(content) = input.repo.file_content(path).await? else {
                    continue;
                };
                for (line_no, line) in content.lines().enumerate() {
                    if SYSTEM_PROMPT.is_match(line) {
                        embedded.push(
                            Evidence::at_line(path, line_no as u32 + 1)
                                .with_snippet(line.trim().chars().take(120).collect::<String>()),
                        );
                        break;
                    }
                }
            }
        }
        if !embedded.is_empty() {
            let mut finding = Finding::new(
                "prompts-embedded",
                Category::Prompts,
                Severity::Low,
                5,
                "Embedded System Prompts Detected",
                format!("System prompt literals in {} file(s)", embedded.len()),
            );
            for ev in embedded {
                finding.push_evidence(ev);
            }
            findings.push(finding);
        }

        Ok(Resumable::Complete(UnitOutcome::from_findings(findings)))
    }
}
