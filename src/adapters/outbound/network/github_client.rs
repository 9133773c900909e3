use crate::analysis::domain::{RateLimitWindow, RepoFile, RepoSummary};
use crate::ports::outbound::{
    ProgressReporter, RepositoryContext, SbomPackage, SearchHit, SearchOutcome,
};
use crate::shared::error::AibomError;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const API_BASE: &str = "https://api.github.com";
const RAW_BASE: &str = "https://raw.githubusercontent.com";

#[derive(Debug, Deserialize)]
struct RepoResponse {
    name: String,
    owner: OwnerResponse,
    html_url: String,
    default_branch: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwnerResponse {
    login: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    entry_type: String,
    #[serde(default)]
    size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SbomEnvelope {
    sbom: SbomDocument,
}

#[derive(Debug, Deserialize)]
struct SbomDocument {
    #[serde(default)]
    packages: Vec<SbomPackageEntry>,
}

#[derive(Debug, Deserialize)]
struct SbomPackageEntry {
    name: String,
    #[serde(rename = "versionInfo", default)]
    version_info: Option<String>,
    #[serde(rename = "externalRefs", default)]
    external_refs: Vec<ExternalRef>,
}

#[derive(Debug, Deserialize)]
struct ExternalRef {
    #[serde(rename = "referenceType")]
    reference_type: String,
    #[serde(rename = "referenceLocator")]
    reference_locator: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    path: String,
    #[serde(default)]
    html_url: Option<String>,
}

/// GithubRepositoryContext adapter for scanning a hosted repository
///
/// This adapter implements the RepositoryContext port against the
/// GitHub REST API. The summary and recursive file tree are fetched
/// once at construction; file contents, the dependency-graph SBOM and
/// code search are fetched on demand.
///
/// # Authentication
/// A token is optional. Without one, the summary, tree and raw file
/// fetches still work for public repositories, but code search is
/// reported as unavailable because the unauthenticated search quota is
/// too small to be useful.
pub struct GithubRepositoryContext {
    client: reqwest::Client,
    owner: String,
    repo: String,
    token: Option<String>,
    summary: RepoSummary,
    files: Vec<RepoFile>,
}

impl GithubRepositoryContext {
    /// Parses an `owner/repo` slug, rejecting anything else.
    pub fn parse_slug(slug: &str) -> Result<(String, String)> {
        let mut parts = slug.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => {
                if owner.contains("..") || repo.contains("..") {
                    return Err(AibomError::InvalidTarget {
                        target: slug.to_string(),
                        reason: "path traversal sequences are not allowed".to_string(),
                    }
                    .into());
                }
                Ok((owner.to_string(), repo.to_string()))
            }
            _ => Err(AibomError::InvalidTarget {
                target: slug.to_string(),
                reason: "expected exactly one '/' separating owner and repository".to_string(),
            }
            .into()),
        }
    }

    /// Fetches the repository summary and full file tree for a slug.
    pub async fn load(
        slug: &str,
        token: Option<String>,
        reporter: &dyn ProgressReporter,
    ) -> Result<Self> {
        let (owner, repo) = Self::parse_slug(slug)?;

        let user_agent = format!("aibom-scan/{}", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()?;

        let mut context = Self {
            client,
            owner,
            repo,
            token,
            summary: RepoSummary::default(),
            files: Vec::new(),
        };
        context.summary = context.fetch_summary().await?;
        context.files = context.fetch_tree(reporter).await?;
        Ok(context)
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder
    }

    async fn fetch_summary(&self) -> Result<RepoSummary> {
        let url = format!("{}/repos/{}/{}", API_BASE, self.owner, self.repo);
        let response = self.request(&url).send().await?;
        if !response.status().is_success() {
            return Err(AibomError::RepositoryFetch {
                resource: format!("{}/{}", self.owner, self.repo),
                details: format!("HTTP {}", response.status()),
            }
            .into());
        }
        let repo: RepoResponse = response.json().await?;
        Ok(RepoSummary {
            name: repo.name,
            owner: Some(repo.owner.login),
            url: Some(repo.html_url),
            default_branch: Some(repo.default_branch),
            description: repo.description,
        })
    }

    async fn fetch_tree(&self, reporter: &dyn ProgressReporter) -> Result<Vec<RepoFile>> {
        let branch = self.summary.default_branch.as_deref().unwrap_or("main");
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            API_BASE,
            self.owner,
            self.repo,
            urlencoding::encode(branch)
        );
        let response = self.request(&url).send().await?;
        if !response.status().is_success() {
            return Err(AibomError::RepositoryFetch {
                resource: format!("file tree of {}/{}", self.owner, self.repo),
                details: format!("HTTP {}", response.status()),
            }
            .into());
        }
        let tree: TreeResponse = response.json().await?;
        Ok(self.collect_tree(tree, reporter))
    }

    /// Keeps the blob entries of a tree listing, sorted by path. A
    /// truncated listing is surfaced through the reporter so stdout
    /// stays reserved for the documents.
    fn collect_tree(&self, tree: TreeResponse, reporter: &dyn ProgressReporter) -> Vec<RepoFile> {
        if tree.truncated {
            reporter.report_error(&format!(
                "File listing for {}/{} was truncated by the host; results may be incomplete",
                self.owner, self.repo
            ));
        }
        let mut files: Vec<RepoFile> = tree
            .tree
            .into_iter()
            .filter(|e| e.entry_type == "blob")
            .map(|e| RepoFile::new(e.path, e.size.unwrap_or(0)))
            .collect();
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files
    }

    fn rate_limit_from(headers: &reqwest::header::HeaderMap) -> RateLimitWindow {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        };
        RateLimitWindow::new(
            read("x-ratelimit-remaining").unwrap_or(0),
            read("x-ratelimit-reset").unwrap_or(0).into(),
        )
    }

    fn map_sbom_package(entry: SbomPackageEntry) -> SbomPackage {
        // The purl carries the ecosystem: pkg:pypi/langchain@0.2.1
        let ecosystem = entry
            .external_refs
            .iter()
            .find(|r| r.reference_type == "purl")
            .and_then(|r| {
                r.reference_locator
                    .strip_prefix("pkg:")
                    .and_then(|rest| rest.split('/').next())
                    .map(str::to_string)
            });
        SbomPackage {
            name: entry.name,
            version: entry.version_info,
            ecosystem,
        }
    }
}

#[async_trait]
impl RepositoryContext for GithubRepositoryContext {
    fn summary(&self) -> &RepoSummary {
        &self.summary
    }

    fn files(&self) -> &[RepoFile] {
        &self.files
    }

    async fn file_content(&self, path: &str) -> Result<Option<String>> {
        let branch = self.summary.default_branch.as_deref().unwrap_or("main");
        let url = format!(
            "{}/{}/{}/{}/{}",
            RAW_BASE, self.owner, self.repo, branch, path
        );
        // Transient fetch failures degrade to None; the detection units
        // treat missing content the same as a binary file.
        let Ok(response) = self.request(&url).send().await else {
            return Ok(None);
        };
        if !response.status().is_success() {
            return Ok(None);
        }
        Ok(response.text().await.ok())
    }

    async fn dependency_graph(&self) -> Result<Option<Vec<SbomPackage>>> {
        let url = format!(
            "{}/repos/{}/{}/dependency-graph/sbom",
            API_BASE, self.owner, self.repo
        );
        let Ok(response) = self.request(&url).send().await else {
            return Ok(None);
        };
        // 401/403 when the feature is disabled, 404 when never computed.
        if !response.status().is_success() {
            return Ok(None);
        }
        let Ok(envelope) = response.json::<SbomEnvelope>().await else {
            return Ok(None);
        };
        Ok(Some(
            envelope
                .sbom
                .packages
                .into_iter()
                .map(Self::map_sbom_package)
                .collect(),
        ))
    }

    async fn code_search(&self, query: &str) -> Result<SearchOutcome> {
        if self.token.is_none() {
            return Ok(SearchOutcome::Unavailable);
        }
        let scoped = format!("{} repo:{}/{}", query, self.owner, self.repo);
        let url = format!(
            "{}/search/code?q={}&per_page=20",
            API_BASE,
            urlencoding::encode(&scoped)
        );
        let Ok(response) = self.request(&url).send().await else {
            return Ok(SearchOutcome::Unavailable);
        };

        let rate_limit = Self::rate_limit_from(response.headers());
        let status = response.status();
        if status.as_u16() == 403 || status.as_u16() == 429 {
            return Ok(SearchOutcome::RateLimited(rate_limit));
        }
        if !status.is_success() {
            return Ok(SearchOutcome::Unavailable);
        }

        let Ok(body) = response.json::<SearchResponse>().await else {
            return Ok(SearchOutcome::Unavailable);
        };
        let items = body
            .items
            .into_iter()
            .map(|item| SearchHit {
                path: item.path,
                url: item.html_url,
                snippet: None,
            })
            .collect();
        Ok(SearchOutcome::Results { items, rate_limit })
    }

    fn search_available(&self) -> bool {
        self.token.is_some()
    }
}
