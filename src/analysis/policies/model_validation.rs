use once_cell::sync::Lazy;
use regex::Regex;

/// Validation filter for candidates captured by the generic
/// `org/model` pattern.
///
/// The capture pattern is maximally permissive, so every candidate is
/// checked against the classes of strings that share its shape: MIME
/// types, framework import paths, CSS utility classes, placeholders,
/// and malformed org/model forms. Rejections are silent by design.
pub fn is_plausible_model_name(candidate: &str) -> bool {
    let Some((org, model)) = candidate.split_once('/') else {
        return false;
    };
    if org.is_empty() || model.is_empty() || model.contains('/') {
        return false;
    }

    let lower = candidate.to_lowercase();
    let org_lower = org.to_lowercase();
    let model_lower = model.to_lowercase();

    // Registry organization names never contain dots; a dotted org is
    // a hostname or file path (`huggingface.co/models`, `setup.py/...`)
    if org.contains('.') {
        return false;
    }
    if MIME_PREFIXES.contains(&org_lower.as_str()) {
        return false;
    }
    if IMPORT_PATH_PREFIXES.contains(&org_lower.as_str()) || org_lower.starts_with("node:") {
        return false;
    }
    // CSS utility classes: `text-white/80`, `bg-black/50`, `w-1/2`
    if CSS_UTILITY.is_match(&lower) {
        return false;
    }
    // Opacity/fraction suffixes in general: purely numeric model part
    if model_lower.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    if PLACEHOLDERS.contains(&org_lower.as_str()) || PLACEHOLDERS.contains(&model_lower.as_str()) {
        return false;
    }
    if org_lower.starts_with("your-") || model_lower.starts_with("your-") {
        return false;
    }
    // File names are not model ids
    if model_lower.ends_with(".py")
        || model_lower.ends_with(".js") || model_lower.ends_with(".ts")
        || model_lower.ends_with(".md") || model_lower.ends_with(".json")
        || model_lower.ends_with(".yaml") || model_lower.ends_with(".yml")
    {
        return false;
    }
    // Common URL/path segments that pass the shape check
    if PATH_SEGMENTS.contains(&org_lower.as_str()) {
        return false;
    }
    // A real model name contains at least one letter on both sides
    if !org.chars().any(|c| c.is_ascii_alphabetic())
        || !model.chars().any(|c| c.is_ascii_alphabetic())
    {
        return false;
    }
    true
}

const MIME_PREFIXES: &[&str] = &[
    "application",
    "text",
    "image",
    "audio",
    "video",
    "multipart",
    "font",
    "model", // model/gltf+json etc.
    "message",
];

const IMPORT_PATH_PREFIXES: &[&str] = &[
    "next",
    "react",
    "react-dom",
    "vue",
    "svelte",
    "node",
    "express",
    "lodash",
    "rxjs",
    "os",
    "fs",
    "path",
    "url",
    "util",
    "http",
    "https",
    "assert",
    "crypto",
    "stream",
    "dist",
    "build",
];

const PLACEHOLDERS: &[&str] = &[
    "org",
    "organization",
    "owner",
    "user",
    "username",
    "repo",
    "model",
    "model-name",
    "model_name",
    "example",
    "foo",
    "bar",
    "baz",
    "my-org",
    "my-model",
    "xxx",
    "name",
    "namespace",
    "account",
];

const PATH_SEGMENTS: &[&str] = &[
    "src",
    "lib",
    "api",
    "v1",
    "v2",
    "static",
    "assets",
    "public",
    "docs",
    "test",
    "tests",
    "github.com",
    "pkg",
    "cmd",
    "usr",
    "etc",
    "var",
    "bin",
    "tmp",
    "home",
];

static CSS_UTILITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:-?(?:text|bg|border|ring|fill|stroke|from|via|to|divide|outline|shadow|accent|caret|decoration|placeholder|w|h|m[trblxy]?|p[trblxy]?|inset|top|bottom|left|right|grid-cols|grid-rows|basis|translate-[xy]|opacity)-[a-z0-9.%\[\]-]+)/\d{1,3}$",
    )
    .expect("css utility pattern")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_real_model_names() {
        assert!(is_plausible_model_name("meta-llama/Llama-3-8B-Instruct"));
        assert!(is_plausible_model_name("mistralai/Mistral-7B-v0.1"));
        assert!(is_plausible_model_name("sentence-transformers/all-MiniLM-L6-v2"));
        assert!(is_plausible_model_name("BAAI/bge-large-en-v1.5"));
        assert!(is_plausible_model_name("stabilityai/stable-diffusion-xl-base-1.0"));
    }

    #[test]
    fn test_rejects_mime_types() {
        assert!(!is_plausible_model_name("application/json"));
        assert!(!is_plausible_model_name("text/html"));
        assert!(!is_plausible_model_name("image/png"));
        assert!(!is_plausible_model_name("model/gltf+json"));
    }

    #[test]
    fn test_rejects_import_paths() {
        assert!(!is_plausible_model_name("next/head"));
        assert!(!is_plausible_model_name("react-dom/client"));
        assert!(!is_plausible_model_name("node:path/posix"));
        assert!(!is_plausible_model_name("lodash/debounce"));
    }

    #[test]
    fn test_rejects_css_utility_classes() {
        assert!(!is_plausible_model_name("text-white/80"));
        assert!(!is_plausible_model_name("bg-black/50"));
        assert!(!is_plausible_model_name("w-1/2"));
        assert!(!is_plausible_model_name("border-gray-200/40"));
    }

    #[test]
    fn test_rejects_placeholders() {
        assert!(!is_plausible_model_name("org/model"));
        assert!(!is_plausible_model_name("user/repo"));
        assert!(!is_plausible_model_name("your-org/your-model"));
        assert!(!is_plausible_model_name("example/whatever"));
    }

    #[test]
    fn test_rejects_malformed_shapes() {
        assert!(!is_plausible_model_name("no-slash"));
        assert!(!is_plausible_model_name("/leading-slash"));
        assert!(!is_plausible_model_name("trailing-slash/"));
        assert!(!is_plausible_model_name("123/456"));
    }

    #[test]
    fn test_rejects_path_segments_and_files() {
        assert!(!is_plausible_model_name("src/main.py"));
        assert!(!is_plausible_model_name("docs/readme.md"));
        assert!(!is_plausible_model_name("api/v1"));
        assert!(!is_plausible_model_name("github.com/someone"));
        assert!(!is_plausible_model_name("huggingface.co/models"));
    }
}
