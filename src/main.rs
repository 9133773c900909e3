mod adapters;
mod analysis;
mod application;
mod cli;
mod config;
mod ports;
mod shared;

use adapters::outbound::console::StderrProgressReporter;
use adapters::outbound::docs::MarkdownExtractor;
use adapters::outbound::filesystem::{FileSystemWriter, LocalRepositoryContext, StdoutPresenter};
use adapters::outbound::network::{
    CachingRepositoryContext, GithubRepositoryContext, HuggingFaceClient,
};
use analysis::domain::Category;
use analysis::services::{ConfidenceLevel, ConfidenceScorer};
use analysis::units::build_registry;
use application::dto::{AnalysisRequest, AnalysisResponse, OutputFormat};
use application::session::AnalysisSession;
use application::use_cases::{AnalyzeRepositoryUseCase, SynthesizeDocumentsUseCase};
use cli::Args;
use config::ConfigFile;
use owo_colors::OwoColorize;
use ports::outbound::{OutputPresenter, RepositoryContext};
use shared::error::{AibomError, ExitCode};
use shared::Result;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // clap itself exits with code 2 on invalid arguments
    let args = Args::parse_args();

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n{}\n", "❌ An error occurred:".red());
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

/// How the positional target argument was interpreted.
enum ScanTarget {
    Local(PathBuf),
    Hosted(String),
}

async fn run(args: Args) -> Result<ExitCode> {
    let target = resolve_target(&args.target)?;

    let config = load_config(&args, &target)?;

    let format_value = args
        .format
        .clone()
        .or_else(|| config.format.clone())
        .unwrap_or_else(|| "cyclonedx-json".to_string());
    let formats = cli::parse_formats(&format_value)
        .map_err(|message| AibomError::Validation { message })?;

    let excludes = resolve_excludes(&args, &config)?;
    let token = resolve_token(&args, &config);
    let fail_on_detect = args.fail_on_detect || config.fail_on_detect.unwrap_or(false);

    let registry = Arc::new(HuggingFaceClient::new()?);
    let extractor = Arc::new(MarkdownExtractor::new());
    let units = build_registry(registry, extractor);
    let request = AnalysisRequest {
        max_resume_wait_secs: args.max_resume_wait,
    };

    // Both targets go through the caching decorator so repeated
    // manifest reads across units cost one fetch.
    let response = match &target {
        ScanTarget::Local(path) => {
            let repository = CachingRepositoryContext::new(LocalRepositoryContext::new(path)?);
            analyze(repository, units, request).await?
        }
        ScanTarget::Hosted(slug) => {
            let reporter = StderrProgressReporter::new();
            let repository = CachingRepositoryContext::new(
                GithubRepositoryContext::load(slug, token, &reporter).await?,
            );
            analyze(repository, units, request).await?
        }
    };

    let response = apply_excludes(response, &excludes);

    let use_case = SynthesizeDocumentsUseCase::new(StderrProgressReporter::new());
    let session = use_case.execute(response, &formats)?;

    write_documents(&session, args.output.as_deref())?;
    print_summary(&session);

    if fail_on_detect && session.ai_detected() {
        Ok(ExitCode::AiComponentsDetected)
    } else {
        Ok(ExitCode::Success)
    }
}

async fn analyze<RC: RepositoryContext>(
    repository: RC,
    units: Vec<Box<dyn analysis::units::DetectionUnit>>,
    request: AnalysisRequest,
) -> Result<AnalysisResponse> {
    let use_case = AnalyzeRepositoryUseCase::new(repository, StderrProgressReporter::new(), units);
    use_case.execute(request).await
}

/// An existing directory wins over slug interpretation, so `dir/name`
/// on disk is never mistaken for a hosted repository.
fn resolve_target(raw: &str) -> Result<ScanTarget> {
    let path = Path::new(raw);
    if path.exists() {
        if path.is_dir() {
            return Ok(ScanTarget::Local(path.to_path_buf()));
        }
        return Err(AibomError::InvalidTarget {
            target: raw.to_string(),
            reason: "exists but is not a directory".to_string(),
        }
        .into());
    }
    GithubRepositoryContext::parse_slug(raw)?;
    Ok(ScanTarget::Hosted(raw.to_string()))
}

fn load_config(args: &Args, target: &ScanTarget) -> Result<ConfigFile> {
    if let Some(path) = &args.config {
        return config::load_config_from_path(Path::new(path));
    }
    let search_dir = match target {
        ScanTarget::Local(path) => path.clone(),
        ScanTarget::Hosted(_) => PathBuf::from("."),
    };
    Ok(config::discover_config(&search_dir)?.unwrap_or_default())
}

fn resolve_excludes(args: &Args, config: &ConfigFile) -> Result<Vec<Category>> {
    let mut excludes = Vec::new();
    let config_excludes = config.exclude_categories.as_deref().unwrap_or(&[]);
    for name in args.exclude_category.iter().chain(config_excludes) {
        let category =
            cli::parse_category(name).map_err(|message| AibomError::Validation { message })?;
        if !excludes.contains(&category) {
            excludes.push(category);
        }
    }
    Ok(excludes)
}

/// Flag wins over environment wins over config file.
fn resolve_token(args: &Args, config: &ConfigFile) -> Option<String> {
    args.token
        .clone()
        .or_else(|| std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()))
        .or_else(|| config.token.clone())
}

/// Drops excluded categories and recomputes the score so the emitted
/// documents never reference a filtered finding.
fn apply_excludes(mut response: AnalysisResponse, excludes: &[Category]) -> AnalysisResponse {
    if excludes.is_empty() {
        return response;
    }
    response
        .findings
        .retain(|f| !excludes.contains(&f.category));
    response.score = ConfidenceScorer::score(&response.findings);
    response.confidence = ConfidenceScorer::level(response.score);
    response
}

fn document_file_name(session: &AnalysisSession, format: OutputFormat) -> String {
    format!("{}.{}", session.summary.name, format.extension())
}

fn write_documents(session: &AnalysisSession, output: Option<&str>) -> Result<()> {
    if session.documents.len() == 1 {
        let document = &session.documents[0];
        let presenter: Box<dyn OutputPresenter> = match output {
            Some(path) if Path::new(path).is_dir() => Box::new(FileSystemWriter::new(
                Path::new(path).join(document_file_name(session, document.format)),
            )),
            Some(path) => Box::new(FileSystemWriter::new(PathBuf::from(path))),
            None => Box::new(StdoutPresenter::new()),
        };
        return presenter.present(&document.content);
    }

    // Multiple documents always land in a directory
    let dir = PathBuf::from(output.unwrap_or("."));
    if !dir.is_dir() {
        return Err(AibomError::Validation {
            message: format!(
                "--output must be an existing directory when emitting multiple formats: {}",
                dir.display()
            ),
        }
        .into());
    }
    for document in &session.documents {
        let path = dir.join(document_file_name(session, document.format));
        FileSystemWriter::new(path).present(&document.content)?;
    }
    Ok(())
}

fn print_summary(session: &AnalysisSession) {
    let confidence = match session.confidence {
        ConfidenceLevel::None => session.confidence.as_str().dimmed().to_string(),
        ConfidenceLevel::Low => session.confidence.as_str().yellow().to_string(),
        ConfidenceLevel::Medium => session.confidence.as_str().cyan().to_string(),
        ConfidenceLevel::High => session.confidence.as_str().green().bold().to_string(),
    };
    eprintln!();
    eprintln!(
        "📊 AI detection score: {} (confidence: {})",
        session.score.bold(),
        confidence
    );
    eprintln!(
        "   {} findings, {} document(s) generated for {}",
        session.findings.len(),
        session.documents.len(),
        session.summary.full_name()
    );
}
