use crate::analysis::domain::{Category, Evidence, Finding, Resumable, Severity};
use crate::analysis::units::{DetectionUnit, UnitInput, UnitOutcome};
use crate::shared::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

const MAX_CONFIG_FILES: usize = 40;

static MODEL_PARAM_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^\s*"?(model|model_name|model_id|llm|llm_model|embedding_model|temperature|max_tokens|top_p|provider)"?\s*[:=]"#,
    )
    .expect("config param pattern")
});

static PROVIDER_MENTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(openai|anthropic|claude|gemini|mistral|cohere|groq|ollama|huggingface|bedrock|vertex)\b")
        .expect("provider mention pattern")
});

/// Configuration scan unit.
///
/// Flags configuration files that carry model parameters or provider
/// blocks. Model names found in configs are picked up by the model
/// identification unit, which scans config files as its second
/// priority tier; this unit only records the configuration surface.
pub struct ConfigScanUnit;

impl ConfigScanUnit {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DetectionUnit for ConfigScanUnit {
    fn name(&self) -> &'static str {
        "configs"
    }

    async fn run(&self, input: UnitInput<'_>) -> Result<Resumable<UnitOutcome>> {
        let mut findings = Vec::new();

        let config_paths: Vec<String> = input
            .repo
            .files()
            .iter()
            .filter(|f| f.is_config())
            .take(MAX_CONFIG_FILES)
            .map(|f| f.path.clone())
            .collect();

        for path in config_paths {
            let Some(content) = input.repo.file_content(&path).await? else {
                continue;
            };

            let mut evidence = Vec::new();
            let mut has_param = false;
            let mut has_provider = false;
            for (line_no, line) in content.lines().enumerate() {
                let param = MODEL_PARAM_LINE.is_match(line);
                let provider = PROVIDER_MENTION.is_match(line);
                if (param || provider) && evidence.len() < 3 {
                    evidence.push(
                        Evidence::at_line(&path, line_no as u32 + 1)
                            .with_snippet(line.trim().chars().take(120).collect::<String>()),
                    );
                }
                has_param |= param;
                has_provider |= provider;
            }

            // Parameter keys alone (temperature in an unrelated config)
            // are not enough; require a provider mention alongside.
            if !(has_param && has_provider) {
                continue;
            }

            let mut finding = Finding::new(
                format!("config-{}", path.replace('/', "-")),
                Category::Config,
                Severity::Low,
                5,
                format!("AI Configuration: {}", path),
                format!("Configuration file {} declares model parameters", path),
            );
            for ev in evidence {
                finding.push_evidence(ev);
            }
            findings.push(finding);
        }

        Ok(Resumable::Complete(UnitOutcome::from_findings(findings)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_param_line() {
        assert!(MODEL_PARAM_LINE.is_match("model: gpt-4o"));
        assert!(MODEL_PARAM_LINE.is_match("  \"model_name\": \"claude-3-opus\","));
        assert!(MODEL_PARAM_LINE.is_match("temperature = 0.2"));
        assert!(!MODEL_PARAM_LINE.is_match("# model settings below"));
    }

    #[test]
    fn test_provider_mention() {
        assert!(PROVIDER_MENTION.is_match("provider: anthropic"));
        assert!(PROVIDER_MENTION.is_match("OPENAI_BASE_URL=https://api.openai.com"));
        assert!(!PROVIDER_MENTION.is_match("database: postgres"));
    }
}
