use clap::Parser;

use crate::analysis::domain::Category;
use crate::application::dto::OutputFormat;

/// Parses a `--format` value into the list of formats to emit.
///
/// `all` expands to every supported format in a fixed order.
pub fn parse_formats(value: &str) -> Result<Vec<OutputFormat>, String> {
    if value.eq_ignore_ascii_case("all") {
        return Ok(OutputFormat::ALL.to_vec());
    }
    value.parse().map(|format| vec![format])
}

/// Parses a category name used by `--exclude-category`.
pub fn parse_category(value: &str) -> Result<Category, String> {
    match value.to_lowercase().as_str() {
        "dependencies" => Ok(Category::Dependencies),
        "code" => Ok(Category::Code),
        "metadata" => Ok(Category::Metadata),
        "config" => Ok(Category::Config),
        "ci" => Ok(Category::Ci),
        "models" => Ok(Category::Models),
        "prompts" => Ok(Category::Prompts),
        "hardware" => Ok(Category::Hardware),
        "infrastructure" => Ok(Category::Infrastructure),
        "governance" => Ok(Category::Governance),
        "risk" => Ok(Category::Risk),
        _ => Err(format!(
            "Unknown category: {}. Valid categories: dependencies, code, metadata, config, ci, models, prompts, hardware, infrastructure, governance, risk",
            value
        )),
    }
}

/// Generate AI Bills of Materials for source repositories
#[derive(Parser, Debug)]
#[command(name = "aibom-scan")]
#[command(version)]
#[command(
    about = "Detect AI/LLM components in a repository and emit CycloneDX, SPDX and extended AIBOM documents",
    long_about = None
)]
pub struct Args {
    /// Scan target: a local directory or an owner/repo slug
    pub target: String,

    /// Output format: cyclonedx-json, cyclonedx-xml, spdx, extended or all
    #[arg(short, long)]
    pub format: Option<String>,

    /// Output file path, or a directory when emitting multiple formats
    /// (if not specified, a single document goes to stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// API token for the repository host (falls back to GITHUB_TOKEN)
    #[arg(short, long)]
    pub token: Option<String>,

    /// Drop findings in a category before scoring and serialization
    /// Can be specified multiple times: -e governance -e risk
    #[arg(short = 'e', long = "exclude-category", value_name = "CATEGORY")]
    pub exclude_category: Vec<String>,

    /// Exit with code 1 when AI components are detected
    #[arg(long)]
    pub fail_on_detect: bool,

    /// Config file path (defaults to .aibom.toml in the target directory)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Upper bound in seconds for waiting out a code-search rate limit
    #[arg(long, value_name = "SECS")]
    pub max_resume_wait: Option<i64>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
