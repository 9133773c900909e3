use once_cell::sync::Lazy;
use regex::Regex;

/// One provider-specific model-name pattern.
///
/// The table is ordered: explicit commercial-provider literals first,
/// the maximally permissive open-registry `org/model` capture last, so
/// that a literal hit wins over the generic capture.
pub struct ModelPattern {
    pub provider: &'static str,
    pub regex: &'static Lazy<Regex>,
    /// Default task classification when the registry has none.
    pub default_task: Option<&'static str>,
}

static OPENAI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(gpt-4o(?:-mini)?|gpt-4(?:-turbo(?:-preview)?|\.1(?:-mini|-nano)?)?|gpt-3\.5-turbo(?:-16k)?|o[134](?:-mini|-preview|-pro)?|text-embedding-3-(?:small|large)|text-embedding-ada-002|dall-e-[23]|whisper-1|tts-1(?:-hd)?)\b",
    )
    .expect("openai model pattern")
});

static ANTHROPIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(claude-(?:3(?:[.-]5)?-(?:opus|sonnet|haiku)(?:-\d{8})?|(?:opus|sonnet|haiku)-4(?:[.-]\d)?(?:-\d{8})?|2(?:\.[01])?|instant-1(?:\.2)?))\b",
    )
    .expect("anthropic model pattern")
});

static GOOGLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(gemini-(?:2(?:\.[05])?|1(?:\.[05])?)-(?:pro|flash|ultra)(?:-(?:latest|exp|\d{3}))?|gemini-pro(?:-vision)?|(?:models/)?(?:text-)?embedding-(?:gecko-)?00[1-9]|text-bison(?:-\d{3})?|chat-bison(?:-\d{3})?)\b",
    )
    .expect("google model pattern")
});

static MISTRAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(mistral-(?:tiny|small|medium|large)(?:-latest|-\d{4})?|open-mistral-(?:7b|nemo)|open-mixtral-8x(?:7b|22b)|codestral(?:-latest|-\d{4})?)\b",
    )
    .expect("mistral model pattern")
});

static COHERE: Lazy<Regex> = Lazy::new(|| {
    // Bare "command" is far too common in source code; require a
    // variant suffix.
    Regex::new(r"\b(command-(?:r-plus|r|light|nightly)(?:-\d{2}-\d{4})?|embed-(?:english|multilingual)-v[23]\.0|rerank-(?:english|multilingual)-v[23]\.0)\b")
        .expect("cohere model pattern")
});

static META: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b((?:meta-)?llama-?3(?:[.-][12])?-(?:\d{1,3}[bB])(?:-[A-Za-z-]+)?|llama-?2-(?:7b|13b|70b)(?:-chat)?(?:-hf)?)\b")
        .expect("meta model pattern")
});

/// Generic Hugging Face `organization/model` capture. Maximally
/// permissive by design; every capture must pass the validation
/// filter before it becomes a finding.
static HUGGINGFACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Za-z0-9][A-Za-z0-9_.-]{1,38}/[A-Za-z0-9][A-Za-z0-9_.-]{1,90})\b")
        .expect("huggingface capture pattern")
});

/// Ordered provider pattern table.
pub static MODEL_PATTERNS: Lazy<Vec<ModelPattern>> = Lazy::new(|| {
    vec![
        ModelPattern {
            provider: "openai",
            regex: &OPENAI,
            default_task: Some("text-generation"),
        },
        ModelPattern {
            provider: "anthropic",
            regex: &ANTHROPIC,
            default_task: Some("text-generation"),
        },
        ModelPattern {
            provider: "google",
            regex: &GOOGLE,
            default_task: Some("text-generation"),
        },
        ModelPattern {
            provider: "mistral",
            regex: &MISTRAL,
            default_task: Some("text-generation"),
        },
        ModelPattern {
            provider: "cohere",
            regex: &COHERE,
            default_task: Some("text-generation"),
        },
        ModelPattern {
            provider: "meta",
            regex: &META,
            default_task: Some("text-generation"),
        },
        ModelPattern {
            provider: "huggingface",
            regex: &HUGGINGFACE,
            default_task: None,
        },
    ]
});

/// Normalizes a captured model name to its canonical identity form.
///
/// Google embedding-style names are canonicalized to `models/x`; other
/// names are lowercased with surrounding quotes stripped.
pub fn normalize_model_name(provider: &str, raw: &str) -> String {
    let trimmed = raw.trim_matches(|c| c == '"' || c == '\'' || c == '`');
    let lower = trimmed.to_lowercase();
    if provider == "google" && lower.contains("embedding-") && !lower.starts_with("models/") {
        return format!("models/{}", lower);
    }
    lower
}

/// Task classification inferred from a model name, used when no
/// registry metadata is available.
pub fn infer_task(name: &str) -> Option<&'static str> {
    let name = name.to_lowercase();
    if name.contains("embed") || name.contains("gecko") {
        Some("embedding")
    } else if name.contains("whisper") {
        Some("speech-recognition")
    } else if name.contains("dall-e")
        || name.contains("stable-diffusion")
        || name.contains("sdxl")
        || name.contains("flux")
    {
        Some("image-generation")
    } else if name.contains("tts") {
        Some("text-to-speech")
    } else if name.contains("rerank") {
        Some("rerank")
    } else {
        None
    }
}

/// Architecture family inferred from name substrings.
pub fn infer_architecture(name: &str) -> Option<&'static str> {
    let name = name.to_lowercase();
    for (needle, family) in [
        ("llama", "llama"),
        ("mistral", "mistral"),
        ("mixtral", "mixtral"),
        ("gpt", "gpt"),
        ("claude", "claude"),
        ("gemini", "gemini"),
        ("gemma", "gemma"),
        ("qwen", "qwen"),
        ("phi-", "phi"),
        ("bert", "bert"),
        ("t5", "t5"),
        ("falcon", "falcon"),
        ("stable-diffusion", "stable-diffusion"),
        ("whisper", "whisper"),
    ] {
        if name.contains(needle) {
            return Some(family);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captures(provider: &str, text: &str) -> Vec<String> {
        MODEL_PATTERNS
            .iter()
            .filter(|p| p.provider == provider)
            .flat_map(|p| p.regex.find_iter(text).map(|m| m.as_str().to_string()))
            .collect()
    }

    #[test]
    fn test_openai_literals() {
        let hits = captures("openai", r#"model="gpt-4o", fallback="gpt-3.5-turbo""#);
        assert_eq!(hits, vec!["gpt-4o", "gpt-3.5-turbo"]);
        assert!(!captures("openai", "gpt2-community-finetune").contains(&"gpt2".to_string()));
    }

    #[test]
    fn test_anthropic_literals() {
        assert_eq!(
            captures("anthropic", "claude-3-5-sonnet-20241022"),
            vec!["claude-3-5-sonnet-20241022"]
        );
        assert!(!captures("anthropic", "clause-3-sonnet").iter().any(|h| h.contains("clause")));
    }

    #[test]
    fn test_google_embedding_capture() {
        let hits = captures("google", "model = \"models/embedding-001\"");
        assert!(hits.iter().any(|h| h.contains("embedding-001")));
    }

    #[test]
    fn test_huggingface_generic_capture() {
        let hits = captures("huggingface", "meta-llama/Llama-3-8B-Instruct");
        assert_eq!(hits, vec!["meta-llama/Llama-3-8B-Instruct"]);
    }

    #[test]
    fn test_normalize_google_embedding() {
        assert_eq!(
            normalize_model_name("google", "embedding-001"),
            "models/embedding-001"
        );
        // Already canonical: no double prefix
        assert_eq!(
            normalize_model_name("google", "models/embedding-001"),
            "models/embedding-001"
        );
    }

    #[test]
    fn test_normalize_strips_quotes_and_lowercases() {
        assert_eq!(normalize_model_name("openai", "\"GPT-4o\""), "gpt-4o");
    }

    #[test]
    fn test_infer_task() {
        assert_eq!(infer_task("text-embedding-3-small"), Some("embedding"));
        assert_eq!(infer_task("dall-e-3"), Some("image-generation"));
        assert_eq!(infer_task("whisper-1"), Some("speech-recognition"));
        assert_eq!(infer_task("gpt-4o"), None);
    }

    #[test]
    fn test_infer_architecture() {
        assert_eq!(infer_architecture("meta-llama/llama-3-8b-instruct"), Some("llama"));
        assert_eq!(infer_architecture("gpt-4o"), Some("gpt"));
        assert_eq!(infer_architecture("embedding-001"), None);
    }
}
