use aibom_scan::analysis::domain::{RepoFile, RepoSummary};
use aibom_scan::ports::outbound::{RepositoryContext, SbomPackage, SearchOutcome};
use aibom_scan::shared::Result;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Mock RepositoryContext backed by in-memory files and a scripted
/// sequence of code-search outcomes.
pub struct MockRepositoryContext {
    summary: RepoSummary,
    files: Vec<RepoFile>,
    contents: HashMap<String, String>,
    dependency_graph: Option<Vec<SbomPackage>>,
    search_enabled: bool,
    search_outcomes: Mutex<VecDeque<SearchOutcome>>,
    executed_queries: Mutex<Vec<String>>,
}

impl MockRepositoryContext {
    pub fn new(name: &str) -> Self {
        Self {
            summary: RepoSummary::local(name),
            files: Vec::new(),
            contents: HashMap::new(),
            dependency_graph: None,
            search_enabled: false,
            search_outcomes: Mutex::new(VecDeque::new()),
            executed_queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.push(RepoFile::new(path, content.len() as u64));
        self.contents.insert(path.to_string(), content.to_string());
        self
    }

    /// Registers a file in the listing without readable content.
    pub fn with_listed_file(mut self, path: &str, size: u64) -> Self {
        self.files.push(RepoFile::new(path, size));
        self
    }

    pub fn with_dependency_graph(mut self, packages: Vec<SbomPackage>) -> Self {
        self.dependency_graph = Some(packages);
        self
    }

    /// Enables search; outcomes are served in order, one per query.
    pub fn with_search_outcomes(mut self, outcomes: Vec<SearchOutcome>) -> Self {
        self.search_enabled = true;
        self.search_outcomes = Mutex::new(outcomes.into());
        self
    }

    /// Queries executed so far, in order.
    pub fn executed_queries(&self) -> Vec<String> {
        self.executed_queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepositoryContext for MockRepositoryContext {
    fn summary(&self) -> &RepoSummary {
        &self.summary
    }

    fn files(&self) -> &[RepoFile] {
        &self.files
    }

    async fn file_content(&self, path: &str) -> Result<Option<String>> {
        Ok(self.contents.get(path).cloned())
    }

    async fn dependency_graph(&self) -> Result<Option<Vec<SbomPackage>>> {
        Ok(self.dependency_graph.clone())
    }

    async fn code_search(&self, query: &str) -> Result<SearchOutcome> {
        if !self.search_enabled {
            return Ok(SearchOutcome::Unavailable);
        }
        self.executed_queries
            .lock()
            .unwrap()
            .push(query.to_string());
        Ok(self
            .search_outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(SearchOutcome::Unavailable))
    }

    fn search_available(&self) -> bool {
        self.search_enabled
    }
}
