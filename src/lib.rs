//! aibom-scan - AI Bill of Materials generation for source repositories
//!
//! This library analyzes a repository for AI/LLM components (SDK
//! dependencies, model references, prompt assets, accelerator hints,
//! serving infrastructure) and emits the result as CycloneDX, SPDX or
//! extended AIBOM documents, following hexagonal architecture.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`analysis`): detection units, pipeline
//!   orchestration, finding reconciliation and BOM synthesis
//! - **Application Layer** (`application`): use cases, read models and
//!   the formatter factory
//! - **Ports** (`ports`): interface definitions for infrastructure
//! - **Adapters** (`adapters`): repository hosts, model registry,
//!   filesystem, console and document serializers
//! - **Shared** (`shared`): common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use aibom_scan::prelude::*;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! // Create adapters
//! let repository = LocalRepositoryContext::new(Path::new("."))?;
//! let registry = Arc::new(HuggingFaceClient::new()?);
//! let extractor = Arc::new(MarkdownExtractor::new());
//!
//! // Run the detection pipeline
//! let units = build_registry(registry, extractor);
//! let use_case = AnalyzeRepositoryUseCase::new(repository, StderrProgressReporter::new(), units);
//! let response = use_case.execute(AnalysisRequest::new()).await?;
//!
//! // Serialize the result
//! let synthesizer = SynthesizeDocumentsUseCase::new(StderrProgressReporter::new());
//! let session = synthesizer.execute(response, &[OutputFormat::CycloneDxJson])?;
//! println!("{}", session.documents[0].content);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod analysis;
pub mod application;
pub mod cli;
pub mod config;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::docs::MarkdownExtractor;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemWriter, LocalRepositoryContext, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{
        CycloneDxJsonFormatter, CycloneDxXmlFormatter, ExtendedFormatter, SpdxFormatter,
    };
    pub use crate::adapters::outbound::network::{
        CachingRepositoryContext, GithubRepositoryContext, HuggingFaceClient,
    };
    pub use crate::analysis::domain::{
        BomGraph, Category, Component, Evidence, Finding, RepoSummary, Severity,
    };
    pub use crate::analysis::services::{
        BomSynthesizer, ConfidenceLevel, ConfidenceScorer, FindingReconciler,
    };
    pub use crate::analysis::units::build_registry;
    pub use crate::application::dto::{AnalysisRequest, AnalysisResponse, OutputFormat};
    pub use crate::application::session::AnalysisSession;
    pub use crate::application::use_cases::{AnalyzeRepositoryUseCase, SynthesizeDocumentsUseCase};
    pub use crate::ports::outbound::{
        BomFormatter, DocExtractor, ModelRegistry, OutputPresenter, ProgressReporter,
        RepositoryContext,
    };
    pub use crate::shared::Result;
}
