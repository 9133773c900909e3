use crate::analysis::domain::{
    Category, DetectedDependencies, Evidence, Finding, Resumable, ResumeState, SearchQuery,
    Severity,
};
use crate::analysis::units::{DetectionUnit, UnitInput, UnitOutcome};
use crate::ports::outbound::SearchOutcome;
use crate::shared::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Per-minute quota of the host's code search API; the smart query set
/// never plans more queries than this.
pub const QUERY_BUDGET: usize = 10;

/// Bound on the exhaustive in-memory fallback scan.
const MAX_FALLBACK_FILES: usize = 200;

/// Code-usage detection unit (the rate-limited one).
///
/// With an authenticated search capability: a ranked query set,
/// generated from the detected dependency list when the SBOM path
/// succeeded ("smart mode"), otherwise a fixed broad set ("fallback
/// mode"). Quota is tracked from response headers; the unit halts and
/// returns a pause signal the instant it would exceed quota. Without
/// search: bounded in-memory scanning of source files against
/// language-specific SDK/endpoint regex tables.
pub struct CodeUsageUnit;

impl CodeUsageUnit {
    pub fn new() -> Self {
        Self
    }

    /// Smart mode: only search for providers whose package is actually
    /// installed, and framework-specific sub-patterns only when the
    /// corresponding sub-package is present.
    fn smart_queries(deps: &DetectedDependencies) -> Vec<SearchQuery> {
        let mut queries = Vec::new();
        let mut push = |provider: &str, expression: &str, label: &str| {
            if queries.len() < QUERY_BUDGET {
                queries.push(SearchQuery::new(provider, expression, label));
            }
        };

        if deps.contains_like("openai") {
            push("openai", "\"from openai\"", "OpenAI SDK Usage Detected");
        }
        if deps.contains_like("anthropic") {
            push(
                "anthropic",
                "\"import anthropic\" OR \"@anthropic-ai/sdk\"",
                "Anthropic SDK Usage Detected",
            );
        }
        if deps.contains_like("langchain") {
            push("langchain", "\"from langchain\"", "LangChain Usage Detected");
        }
        if deps.contains("langchain-openai") || deps.contains("@langchain/openai") {
            push(
                "langchain-openai",
                "\"from langchain_openai\"",
                "LangChain OpenAI Integration Detected",
            );
        }
        if deps.contains_like("google-generativeai") || deps.contains_like("google-genai") {
            push(
                "google",
                "\"import google.generativeai\"",
                "Google Generative AI Usage Detected",
            );
        }
        if deps.contains_like("transformers") {
            push(
                "transformers",
                "\"from transformers import\"",
                "Transformers Pipeline Usage Detected",
            );
        }
        if deps.contains_like("cohere") {
            push("cohere", "\"import cohere\"", "Cohere SDK Usage Detected");
        }
        if deps.contains_like("mistralai") {
            push("mistralai", "\"from mistralai\"", "Mistral SDK Usage Detected");
        }
        if deps.contains_like("groq") {
            push("groq", "\"from groq\"", "Groq SDK Usage Detected");
        }
        if deps.contains_like("ollama") {
            push("ollama", "\"import ollama\" OR \"ollama.chat\"", "Ollama Usage Detected");
        }
        if deps.contains_like("llama-index") || deps.contains_like("llama_index") {
            push(
                "llama-index",
                "\"from llama_index\"",
                "LlamaIndex Usage Detected",
            );
        }
        if deps.contains_like("huggingface") {
            push(
                "huggingface-hub",
                "\"from huggingface_hub\"",
                "Hugging Face Hub Usage Detected",
            );
        }
        queries
    }

    /// Fallback mode: provider-agnostic broad queries used when no
    /// dependency graph is available.
    fn fallback_queries() -> Vec<SearchQuery> {
        vec![
            SearchQuery::new("openai", "\"from openai\"", "OpenAI SDK Usage Detected"),
            SearchQuery::new(
                "anthropic",
                "\"import anthropic\"",
                "Anthropic SDK Usage Detected",
            ),
            SearchQuery::new("langchain", "\"from langchain\"", "LangChain Usage Detected"),
            SearchQuery::new(
                "transformers",
                "\"from transformers import\"",
                "Transformers Pipeline Usage Detected",
            ),
            SearchQuery::new("openai", "\"api.openai.com\"", "OpenAI API Endpoint Detected"),
            SearchQuery::new(
                "anthropic",
                "\"api.anthropic.com\"",
                "Anthropic API Endpoint Detected",
            ),
            SearchQuery::new(
                "google",
                "\"generativelanguage.googleapis.com\"",
                "Google Generative AI Endpoint Detected",
            ),
            SearchQuery::new(
                "huggingface-hub",
                "\"huggingface.co/models\"",
                "Hugging Face Model Download Detected",
            ),
        ]
    }

    /// Executes planned queries starting at `start`, halting with a
    /// pause signal the instant the next query would exceed quota.
    async fn run_queries(
        &self,
        input: &UnitInput<'_>,
        queries: Vec<SearchQuery>,
        start: usize,
        mut provider_evidence: HashMap<String, Vec<Evidence>>,
    ) -> Result<Resumable<UnitOutcome>> {
        for (index, query) in queries.iter().enumerate().skip(start) {
            match input.repo.code_search(&query.expression).await? {
                SearchOutcome::Results { items, rate_limit } => {
                    let evidence = provider_evidence.entry(query.provider.clone()).or_default();
                    for item in items.into_iter().take(3) {
                        let mut ev = Evidence::file(&item.path);
                        ev.url = item.url;
                        ev.snippet = item.snippet;
                        evidence.push(ev);
                    }
                    // Halt before the next query rather than predicting
                    // multiple queries ahead.
                    if rate_limit.remaining == 0 && index + 1 < queries.len() {
                        return Ok(Resumable::Paused {
                            partial: Self::outcome_from(&queries, &provider_evidence),
                            checkpoint: ResumeState {
                                queries: queries.clone(),
                                next_query: index + 1,
                                provider_evidence,
                                rate_limit,
                            },
                        });
                    }
                }
                SearchOutcome::RateLimited(window) => {
                    // This query was rejected and has not executed.
                    return Ok(Resumable::Paused {
                        partial: Self::outcome_from(&queries, &provider_evidence),
                        checkpoint: ResumeState {
                            queries: queries.clone(),
                            next_query: index,
                            provider_evidence,
                            rate_limit: window,
                        },
                    });
                }
                SearchOutcome::Unavailable => {
                    // Search capability withdrawn mid-run: keep whatever
                    // was accumulated and stop issuing queries.
                    break;
                }
            }
        }

        Ok(Resumable::Complete(Self::outcome_from(
            &queries,
            &provider_evidence,
        )))
    }

    fn outcome_from(
        queries: &[SearchQuery],
        provider_evidence: &HashMap<String, Vec<Evidence>>,
    ) -> UnitOutcome {
        let mut findings = Vec::new();
        let mut ai_files = Vec::new();

        // Deterministic output order: follow the planned query order.
        let mut seen = Vec::new();
        for query in queries {
            if seen.contains(&query.provider) {
                continue;
            }
            seen.push(query.provider.clone());
            let Some(evidence) = provider_evidence.get(&query.provider) else {
                continue;
            };
            if evidence.is_empty() {
                continue;
            }
            for ev in evidence {
                if !ai_files.contains(&ev.file) {
                    ai_files.push(ev.file.clone());
                }
            }
            let mut finding = Finding::new(
                format!("code-{}", query.provider),
                Category::Code,
                Severity::Medium,
                10,
                query.label.clone(),
                format!(
                    "Code-level usage of {} confirmed by repository search",
                    query.provider
                ),
            );
            for ev in evidence.iter().take(5).cloned() {
                finding.push_evidence(ev);
            }
            findings.push(finding);
        }

        UnitOutcome {
            findings,
            ai_files,
            ..Default::default()
        }
    }

    /// Exhaustive bounded in-memory scan used when the search
    /// capability is unavailable.
    async fn local_scan(&self, input: &UnitInput<'_>) -> Result<UnitOutcome> {
        let mut provider_evidence: HashMap<String, Vec<Evidence>> = HashMap::new();
        let mut labels: HashMap<String, String> = HashMap::new();
        let mut scanned = 0usize;

        let source_files: Vec<String> = input
            .repo
            .files()
            .iter()
            .filter(|f| f.is_source())
            .map(|f| f.path.clone())
            .collect();

        for path in source_files {
            if scanned >= MAX_FALLBACK_FILES {
                break;
            }
            scanned += 1;
            let Some(content) = input.repo.file_content(&path).await? else {
                continue;
            };
            for pattern in sdk_patterns_for(&path) {
                for (line_no, line) in content.lines().enumerate() {
                    // A base_url pointing at the official host is plain
                    // OpenAI usage, not a compatible endpoint.
                    if pattern.provider == "compatible-endpoint" && line.contains("api.openai.com")
                    {
                        continue;
                    }
                    if pattern.regex.is_match(line) {
                        labels
                            .entry(pattern.provider.to_string())
                            .or_insert_with(|| pattern.label.to_string());
                        provider_evidence
                            .entry(pattern.provider.to_string())
                            .or_default()
                            .push(
                                Evidence::at_line(&path, line_no as u32 + 1)
                                    .with_snippet(line.trim().chars().take(120).collect::<String>()),
                            );
                        break;
                    }
                }
            }
        }

        let mut findings = Vec::new();
        let mut ai_files = Vec::new();
        let mut providers: Vec<&String> = provider_evidence.keys().collect();
        providers.sort();
        for provider in providers {
            let evidence = &provider_evidence[provider];
            for ev in evidence {
                if !ai_files.contains(&ev.file) {
                    ai_files.push(ev.file.clone());
                }
            }
            let mut finding = Finding::new(
                format!("code-{}", provider),
                Category::Code,
                Severity::Medium,
                10,
                labels[provider].clone(),
                format!("Code-level usage of {} found by local source scan", provider),
            );
            for ev in evidence.iter().take(5).cloned() {
                finding.push_evidence(ev);
            }
            findings.push(finding);
        }

        Ok(UnitOutcome {
            findings,
            ai_files,
            ..Default::default()
        })
    }
}

struct SdkPattern {
    provider: &'static str,
    label: &'static str,
    regex: &'static Lazy<Regex>,
}

static PY_OPENAI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:from\s+openai\b|import\s+openai\b)").expect("pattern"));
static PY_ANTHROPIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:from\s+anthropic\b|import\s+anthropic\b)").expect("pattern"));
static PY_GOOGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:import|from)\s+google\.generativeai\b").expect("pattern"));
static PY_LANGCHAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*from\s+langchain\w*\b").expect("pattern"));
static PY_TRANSFORMERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*from\s+transformers\b").expect("pattern"));
static PY_LLAMAINDEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*from\s+llama_index\b").expect("pattern"));
static JS_OPENAI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:require\(|from\s+)['"]openai['"]"#).expect("pattern")
});
static JS_ANTHROPIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:require\(|from\s+)['"]@anthropic-ai/sdk['"]"#).expect("pattern")
});
static JS_GOOGLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:require\(|from\s+)['"]@google/generative-ai['"]"#).expect("pattern")
});
static ANY_OPENAI_ENDPOINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"api\.openai\.com").expect("pattern"));
static ANY_ANTHROPIC_ENDPOINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"api\.anthropic\.com").expect("pattern"));
static ANY_COMPATIBLE_ENDPOINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"base_url\s*[:=]\s*['"]https?://[^'"]+/v1['"]?"#).expect("pattern")
});

fn sdk_patterns_for(path: &str) -> Vec<&'static SdkPattern> {
    static PY: Lazy<Vec<SdkPattern>> = Lazy::new(|| {
        vec![
            SdkPattern { provider: "openai", label: "OpenAI SDK Usage Detected", regex: &PY_OPENAI },
            SdkPattern { provider: "anthropic", label: "Anthropic SDK Usage Detected", regex: &PY_ANTHROPIC },
            SdkPattern { provider: "google", label: "Google Generative AI Usage Detected", regex: &PY_GOOGLE },
            SdkPattern { provider: "langchain", label: "LangChain Usage Detected", regex: &PY_LANGCHAIN },
            SdkPattern { provider: "transformers", label: "Transformers Pipeline Usage Detected", regex: &PY_TRANSFORMERS },
            SdkPattern { provider: "llama-index", label: "LlamaIndex Usage Detected", regex: &PY_LLAMAINDEX },
        ]
    });
    static JS: Lazy<Vec<SdkPattern>> = Lazy::new(|| {
        vec![
            SdkPattern { provider: "openai", label: "OpenAI SDK Usage Detected", regex: &JS_OPENAI },
            SdkPattern { provider: "anthropic", label: "Anthropic SDK Usage Detected", regex: &JS_ANTHROPIC },
            SdkPattern { provider: "google", label: "Google Generative AI Usage Detected", regex: &JS_GOOGLE },
        ]
    });
    static ANY: Lazy<Vec<SdkPattern>> = Lazy::new(|| {
        vec![
            SdkPattern { provider: "openai-endpoint", label: "OpenAI API Endpoint Detected", regex: &ANY_OPENAI_ENDPOINT },
            SdkPattern { provider: "anthropic-endpoint", label: "Anthropic API Endpoint Detected", regex: &ANY_ANTHROPIC_ENDPOINT },
            SdkPattern { provider: "compatible-endpoint", label: "OpenAI-compatible API Endpoint Detected", regex: &ANY_COMPATIBLE_ENDPOINT },
        ]
    });

    let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();
    let mut patterns: Vec<&'static SdkPattern> = match ext.as_str() {
        "py" | "ipynb" => PY.iter().collect(),
        "js" | "jsx" | "ts" | "tsx" => JS.iter().collect(),
        _ => Vec::new(),
    };
    patterns.extend(ANY.iter());
    patterns
}

#[async_trait]
impl DetectionUnit for CodeUsageUnit {
    fn name(&self) -> &'static str {
        "code_usage"
    }

    fn needs(&self) -> super::Needs {
        super::Needs {
            dependencies: true,
            ..super::Needs::NONE
        }
    }

    async fn run(&self, input: UnitInput<'_>) -> Result<Resumable<UnitOutcome>> {
        // Resume path: continue from the recorded checkpoint.
        if let Some(state) = input.resume.clone() {
            return self
                .run_queries(&input, state.queries.clone(), state.next_query, state.provider_evidence)
                .await;
        }

        if !input.repo.search_available() {
            return Ok(Resumable::Complete(self.local_scan(&input).await?));
        }

        let queries = match input.dependencies {
            Some(deps) if deps.sbom_available || !deps.packages.is_empty() => {
                let smart = Self::smart_queries(deps);
                if smart.is_empty() {
                    // Installed AI packages drive the search; none found
                    // means nothing worth a quota unit.
                    return Ok(Resumable::Complete(UnitOutcome::default()));
                }
                smart
            }
            _ => Self::fallback_queries(),
        };

        self.run_queries(&input, queries, 0, HashMap::new()).await
    }
}
