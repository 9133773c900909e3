/// Controlled vocabulary of AI library/framework components.
///
/// Library BOM components are keyed by these canonical names so that
/// `torch`, `pytorch` and `pytorch-lightning` findings collapse into
/// one `pytorch` node.
pub struct LibraryEntry {
    pub canonical: &'static str,
    /// Names and name fragments that resolve to this library.
    pub aliases: &'static [&'static str],
    /// purl for the canonical package, when one exists.
    pub purl: Option<&'static str>,
}

pub const LIBRARY_VOCABULARY: &[LibraryEntry] = &[
    LibraryEntry {
        canonical: "transformers",
        aliases: &["transformers", "sentence-transformers"],
        purl: Some("pkg:pypi/transformers"),
    },
    LibraryEntry {
        canonical: "pytorch",
        aliases: &["torch", "pytorch"],
        purl: Some("pkg:pypi/torch"),
    },
    LibraryEntry {
        canonical: "tensorflow",
        aliases: &["tensorflow", "keras"],
        purl: Some("pkg:pypi/tensorflow"),
    },
    LibraryEntry {
        canonical: "diffusers",
        aliases: &["diffusers"],
        purl: Some("pkg:pypi/diffusers"),
    },
    LibraryEntry {
        canonical: "langchain",
        aliases: &["langchain", "langgraph", "@langchain"],
        purl: Some("pkg:pypi/langchain"),
    },
    LibraryEntry {
        canonical: "llama-index",
        aliases: &["llama-index", "llama_index"],
        purl: Some("pkg:pypi/llama-index"),
    },
    LibraryEntry {
        canonical: "openai-sdk",
        aliases: &["openai", "async-openai", "go-openai"],
        purl: Some("pkg:pypi/openai"),
    },
    LibraryEntry {
        canonical: "anthropic-sdk",
        aliases: &["anthropic", "@anthropic-ai/sdk"],
        purl: Some("pkg:pypi/anthropic"),
    },
    LibraryEntry {
        canonical: "huggingface-hub",
        aliases: &["huggingface-hub", "huggingface_hub", "@huggingface/inference"],
        purl: Some("pkg:pypi/huggingface-hub"),
    },
    LibraryEntry {
        canonical: "vllm",
        aliases: &["vllm"],
        purl: Some("pkg:pypi/vllm"),
    },
    LibraryEntry {
        canonical: "onnxruntime",
        aliases: &["onnxruntime", "onnx"],
        purl: Some("pkg:pypi/onnxruntime"),
    },
    LibraryEntry {
        canonical: "llama-cpp",
        aliases: &["llama-cpp-python", "llama.cpp"],
        purl: Some("pkg:pypi/llama-cpp-python"),
    },
];

/// Resolves a package or framework name to its canonical library name.
pub fn canonical_library(name: &str) -> Option<&'static str> {
    let name = name.to_lowercase();
    for entry in LIBRARY_VOCABULARY {
        for alias in entry.aliases {
            if name == *alias {
                return Some(entry.canonical);
            }
        }
    }
    // Second pass: fragment match for compound names (langchain-openai)
    for entry in LIBRARY_VOCABULARY {
        for alias in entry.aliases {
            if alias.len() >= 5 && name.contains(alias) {
                return Some(entry.canonical);
            }
        }
    }
    None
}

pub fn library_purl(canonical: &str) -> Option<&'static str> {
    LIBRARY_VOCABULARY
        .iter()
        .find(|e| e.canonical == canonical)
        .and_then(|e| e.purl)
}

/// Library components implied by a model's task category.
///
/// Text-generation and embedding tasks imply the default inference
/// frameworks; image-generation implies the diffusion framework.
pub fn implied_libraries(task: &str) -> &'static [&'static str] {
    match task {
        "text-generation" | "embedding" | "text2text-generation" | "feature-extraction" => {
            &["transformers", "pytorch"]
        }
        "image-generation" | "text-to-image" => &["diffusers"],
        _ => &[],
    }
}

/// Default frameworks implied by any open-registry model without an
/// explicit framework finding.
pub const DEFAULT_REGISTRY_FRAMEWORKS: &[&str] = &["transformers", "pytorch"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_library_exact() {
        assert_eq!(canonical_library("torch"), Some("pytorch"));
        assert_eq!(canonical_library("openai"), Some("openai-sdk"));
        assert_eq!(canonical_library("transformers"), Some("transformers"));
    }

    #[test]
    fn test_canonical_library_fragment() {
        assert_eq!(canonical_library("langchain-openai"), Some("langchain"));
        assert_eq!(canonical_library("@langchain/core"), Some("langchain"));
    }

    #[test]
    fn test_canonical_library_unknown() {
        assert_eq!(canonical_library("requests"), None);
        assert_eq!(canonical_library("numpy"), None);
    }

    #[test]
    fn test_implied_libraries_by_task() {
        assert_eq!(implied_libraries("text-generation"), &["transformers", "pytorch"]);
        assert_eq!(implied_libraries("embedding"), &["transformers", "pytorch"]);
        assert_eq!(implied_libraries("text-to-image"), &["diffusers"]);
        assert!(implied_libraries("speech-recognition").is_empty());
    }

    #[test]
    fn test_library_purl() {
        assert_eq!(library_purl("pytorch"), Some("pkg:pypi/torch"));
        assert_eq!(library_purl("nonexistent"), None);
    }
}
