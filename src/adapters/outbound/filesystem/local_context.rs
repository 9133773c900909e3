use crate::analysis::domain::{RepoFile, RepoSummary};
use crate::ports::outbound::{RepositoryContext, SbomPackage, SearchOutcome};
use crate::shared::error::AibomError;
use crate::shared::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories that never contain first-party sources worth scanning.
const SKIP_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "target",
    "venv",
    ".venv",
    "__pycache__",
    ".mypy_cache",
    ".tox",
    "dist",
];

/// Files larger than this are listed but never content-fetched.
const MAX_CONTENT_BYTES: u64 = 512 * 1024;

/// LocalRepositoryContext adapter for scanning a directory on disk
///
/// The offline counterpart of the hosted adapter: no dependency graph,
/// no code search. Detection units fall back to manifest parsing and
/// local source scanning.
pub struct LocalRepositoryContext {
    root: PathBuf,
    summary: RepoSummary,
    files: Vec<RepoFile>,
}

impl LocalRepositoryContext {
    pub fn new(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(AibomError::InvalidTarget {
                target: root.display().to_string(),
                reason: "not a directory".to_string(),
            }
            .into());
        }

        let name = root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| root.display().to_string());

        let mut files = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                !(e.file_type().is_dir()
                    && SKIP_DIRS.contains(&e.file_name().to_string_lossy().as_ref()))
            })
        {
            let entry = entry.map_err(|e| AibomError::RepositoryFetch {
                resource: format!("local directory {}", root.display()),
                details: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            files.push(RepoFile::new(
                relative.to_string_lossy().replace('\\', "/"),
                size,
            ));
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(Self {
            root: root.to_path_buf(),
            summary: RepoSummary::local(name),
            files,
        })
    }
}

#[async_trait]
impl RepositoryContext for LocalRepositoryContext {
    fn summary(&self) -> &RepoSummary {
        &self.summary
    }

    fn files(&self) -> &[RepoFile] {
        &self.files
    }

    async fn file_content(&self, path: &str) -> Result<Option<String>> {
        let Some(file) = self.files.iter().find(|f| f.path == path) else {
            return Ok(None);
        };
        if file.size > MAX_CONTENT_BYTES {
            return Ok(None);
        }
        // Binary or unreadable files degrade to None, never to an error.
        Ok(std::fs::read_to_string(self.root.join(path)).ok())
    }

    async fn dependency_graph(&self) -> Result<Option<Vec<SbomPackage>>> {
        Ok(None)
    }

    async fn code_search(&self, _query: &str) -> Result<SearchOutcome> {
        Ok(SearchOutcome::Unavailable)
    }

    fn search_available(&self) -> bool {
        false
    }
}
