use crate::analysis::domain::{RateLimitWindow, RepoFile, RepoSummary};
use crate::shared::Result;
use async_trait::async_trait;

/// One package of a host-provided dependency graph (SPDX-shaped).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SbomPackage {
    pub name: String,
    pub version: Option<String>,
    pub ecosystem: Option<String>,
}

/// One code-search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub path: String,
    pub url: Option<String>,
    pub snippet: Option<String>,
}

/// Result of one code-search call.
///
/// `RateLimited` is a distinguished signal, not a generic failure: it
/// triggers the pause/resume protocol. `Unavailable` means the search
/// capability cannot be used at all (no token, search disabled) and
/// callers should fall back to local scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Results {
        items: Vec<SearchHit>,
        rate_limit: RateLimitWindow,
    },
    RateLimited(RateLimitWindow),
    Unavailable,
}

/// RepositoryContext port: the repository host seen through a narrow
/// contract.
///
/// The file listing and summary are loaded when the adapter is
/// constructed; file content, dependency graph and search results are
/// fetched on demand. Transport failures degrade to `None`/fallback
/// values and never propagate past a detection unit boundary.
#[async_trait]
pub trait RepositoryContext: Send + Sync {
    fn summary(&self) -> &RepoSummary;

    /// Full file-path listing with sizes.
    fn files(&self) -> &[RepoFile];

    /// Content of one file, or `None` when the file cannot be read
    /// (binary, too large, transient fetch failure).
    async fn file_content(&self, path: &str) -> Result<Option<String>>;

    /// Machine-readable dependency graph from the host, or `None` when
    /// the service is disabled or the request is rejected (401/403/404).
    async fn dependency_graph(&self) -> Result<Option<Vec<SbomPackage>>>;

    /// Executes one code-search query against the host.
    async fn code_search(&self, query: &str) -> Result<SearchOutcome>;

    /// Whether an authenticated search capability is available at all.
    fn search_available(&self) -> bool;
}
