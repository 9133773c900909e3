/// Controlled keyword-to-package mapping used by the finding
/// reconciler to attribute code findings to dependency findings.
///
/// A code finding is attributed to a package when its title contains
/// one of the package's keywords (case-insensitive) and none of the
/// package's exclusion phrases.
pub struct MergeRule {
    pub package: &'static str,
    pub keywords: &'static [&'static str],
    /// Title phrases that must never be attributed to this package.
    pub exclusions: &'static [&'static str],
}

pub const MERGE_RULES: &[MergeRule] = &[
    MergeRule {
        package: "openai",
        keywords: &["openai", "chatgpt", "gpt-4", "gpt-3.5", "dall-e", "whisper"],
        // Compatible endpoints are commonly reached through a different
        // client library; never attribute them to the openai package.
        exclusions: &["openai-compatible", "openai compatible"],
    },
    MergeRule {
        package: "anthropic",
        keywords: &["anthropic", "claude"],
        exclusions: &[],
    },
    MergeRule {
        package: "google-generativeai",
        keywords: &["gemini", "google generative", "generativeai", "vertex"],
        exclusions: &[],
    },
    MergeRule {
        package: "cohere",
        keywords: &["cohere"],
        exclusions: &[],
    },
    MergeRule {
        package: "mistralai",
        keywords: &["mistral"],
        exclusions: &[],
    },
    MergeRule {
        package: "groq",
        keywords: &["groq"],
        exclusions: &[],
    },
    MergeRule {
        package: "langchain",
        keywords: &["langchain"],
        exclusions: &[],
    },
    MergeRule {
        package: "llama-index",
        keywords: &["llama-index", "llamaindex"],
        exclusions: &[],
    },
    MergeRule {
        package: "transformers",
        keywords: &["transformers", "hugging face pipeline", "huggingface pipeline"],
        exclusions: &[],
    },
    MergeRule {
        package: "huggingface-hub",
        keywords: &["huggingface hub", "hf hub", "hf_hub"],
        exclusions: &[],
    },
    MergeRule {
        package: "ollama",
        keywords: &["ollama"],
        exclusions: &[],
    },
    MergeRule {
        package: "replicate",
        keywords: &["replicate"],
        exclusions: &[],
    },
];

/// Whether a code finding title should be attributed to the given
/// dependency package. The dependency name may be a scoped or
/// compound form of the rule package (`langchain-openai`,
/// `@anthropic-ai/sdk`).
pub fn title_matches_package(title: &str, package: &str) -> bool {
    let title = title.to_lowercase();
    let package = package.to_lowercase();
    for rule in MERGE_RULES {
        if package != rule.package && !package.contains(rule.package) {
            continue;
        }
        if rule.exclusions.iter().any(|ex| title.contains(ex)) {
            continue;
        }
        if rule.keywords.iter().any(|kw| title.contains(kw)) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_sdk_title_matches() {
        assert!(title_matches_package("OpenAI SDK Usage Detected", "openai"));
        assert!(title_matches_package("ChatGPT API Calls", "openai"));
    }

    #[test]
    fn test_compatible_endpoint_excluded() {
        assert!(!title_matches_package(
            "OpenAI-compatible API Endpoint Detected",
            "openai"
        ));
        assert!(!title_matches_package(
            "OpenAI compatible endpoint via base_url",
            "openai"
        ));
    }

    #[test]
    fn test_scoped_and_compound_package_names() {
        assert!(title_matches_package("Anthropic SDK Usage Detected", "@anthropic-ai/sdk"));
        assert!(title_matches_package("LangChain Usage Detected", "langchain-openai"));
    }

    #[test]
    fn test_unrelated_title_does_not_match() {
        assert!(!title_matches_package("Anthropic SDK Usage Detected", "openai"));
        assert!(!title_matches_package("CUDA Usage Detected", "openai"));
    }
}
