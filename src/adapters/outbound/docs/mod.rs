mod markdown_extractor;

pub use markdown_extractor::MarkdownExtractor;
