/// Allow-list of AI/LLM-related package names across ecosystems.
///
/// Matching is bidirectional substring based: a package named
/// `langchain-openai` matches both the `langchain` and `openai`
/// entries, and a scoped name like `@anthropic-ai/sdk` matches
/// `anthropic`.
pub const AI_PACKAGES: &[&str] = &[
    // Provider SDKs
    "openai",
    "anthropic",
    "cohere",
    "mistralai",
    "groq",
    "google-generativeai",
    "google-genai",
    "vertexai",
    "replicate",
    "together",
    "fireworks-ai",
    "ollama",
    // Frameworks and orchestration
    "langchain",
    "langgraph",
    "llama-index",
    "llama_index",
    "haystack-ai",
    "semantic-kernel",
    "dspy",
    "guidance",
    "autogen",
    "crewai",
    "instructor",
    "litellm",
    "guardrails-ai",
    // Model runtimes and tooling
    "transformers",
    "diffusers",
    "sentence-transformers",
    "huggingface-hub",
    "huggingface_hub",
    "tokenizers",
    "tiktoken",
    "safetensors",
    "accelerate",
    "peft",
    "trl",
    "bitsandbytes",
    "vllm",
    "llama-cpp-python",
    "llama.cpp",
    "onnxruntime",
    "torch",
    "pytorch",
    "tensorflow",
    "keras",
    "jax",
    "flax",
    // Data and training pipeline
    "datasets",
    "dvc",
    "mlflow",
    "wandb",
    // Vector stores / RAG plumbing
    "chromadb",
    "pinecone",
    "weaviate",
    "qdrant",
    "faiss",
    "pgvector",
    // JS ecosystem
    "@anthropic-ai/sdk",
    "@langchain/core",
    "@langchain/openai",
    "@google/generative-ai",
    "@huggingface/inference",
    "ai", // Vercel AI SDK
    "@ai-sdk/openai",
    // Rust/Go
    "async-openai",
    "llm-chain",
    "candle-core",
    "go-openai",
];

/// Package names too generic for substring matching in either
/// direction; these only match exactly.
const EXACT_ONLY: &[&str] = &["ai", "torch", "jax", "datasets", "dvc"];

/// Whether a package name from a dependency graph matches the
/// allow-list. Exact or substring match in both directions, to
/// tolerate scoped and prefixed names.
pub fn is_ai_package(name: &str) -> bool {
    let name = name.to_lowercase();
    AI_PACKAGES.iter().any(|entry| {
        if name == *entry {
            return true;
        }
        if EXACT_ONLY.contains(entry) {
            return false;
        }
        name.contains(entry) || entry.contains(name.as_str())
    })
}

/// Allow-list entries that appear inside the given package name.
/// Used to derive provider keywords from compound names like
/// `langchain-openai`.
pub fn matched_entries(name: &str) -> Vec<&'static str> {
    let name = name.to_lowercase();
    AI_PACKAGES
        .iter()
        .filter(|entry| {
            if name == **entry {
                return true;
            }
            !EXACT_ONLY.contains(entry) && name.contains(**entry)
        })
        .copied()
        .collect()
}

/// Word-boundary match of an allow-list entry inside a manifest line.
///
/// Avoids partial-name false positives: `fastapi` must not match the
/// `ai` entry, while `langchain-openai==0.1.8` matches both
/// `langchain` and `openai`.
pub fn line_matches(line: &str, entry: &str) -> bool {
    let line = line.to_lowercase();
    let mut start = 0;
    while let Some(pos) = line[start..].find(entry) {
        let abs = start + pos;
        let before_ok = abs == 0 || !is_word_char(line.as_bytes()[abs - 1]);
        let after = abs + entry.len();
        let after_ok = after >= line.len() || !is_word_char(line.as_bytes()[after]);
        if before_ok && after_ok {
            return true;
        }
        start = abs + 1;
    }
    false
}

fn is_word_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
