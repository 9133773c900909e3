//! Domain models for AI component detection and BOM synthesis.

pub mod component;
pub mod context;
pub mod finding;
pub mod repository;
pub mod resumable;

pub use component::{BomGraph, Component, ComponentKind, Relationship};
pub use context::{DetectedDependencies, DetectedPackage, DocSection, ParsedDocs, PipelineContext};
pub use finding::{
    Category, DependencyInfo, Evidence, Finding, HardwareInfo, InfraInfo, ModelInfo, Payload,
    RegistryInfo, RegistryMetadata, RiskInfo, Severity, MAX_EVIDENCE,
};
pub use repository::{RepoFile, RepoSummary};
pub use resumable::{RateLimitWindow, Resumable, ResumeState, SearchQuery};
