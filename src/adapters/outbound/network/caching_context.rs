use crate::analysis::domain::{RepoFile, RepoSummary};
use crate::ports::outbound::{RepositoryContext, SbomPackage, SearchOutcome};
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// CachingRepositoryContext wraps a RepositoryContext and adds
/// in-memory caching of file contents.
///
/// Several detection units re-read the same manifests and sources; the
/// decorator makes each path cost at most one fetch per run, including
/// negative results for unreadable files. The cache is thread-safe and
/// suitable for concurrent access.
pub struct CachingRepositoryContext<R: RepositoryContext> {
    inner: R,
    content_cache: Arc<DashMap<String, Option<String>>>,
}

impl<R: RepositoryContext> CachingRepositoryContext<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            content_cache: Arc::new(DashMap::new()),
        }
    }

    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.content_cache.len()
    }
}

#[async_trait]
impl<R: RepositoryContext> RepositoryContext for CachingRepositoryContext<R> {
    fn summary(&self) -> &RepoSummary {
        self.inner.summary()
    }

    fn files(&self) -> &[RepoFile] {
        self.inner.files()
    }

    async fn file_content(&self, path: &str) -> Result<Option<String>> {
        if let Some(cached) = self.content_cache.get(path) {
            return Ok(cached.clone());
        }

        let content = self.inner.file_content(path).await?;
        self.content_cache
            .insert(path.to_string(), content.clone());
        Ok(content)
    }

    async fn dependency_graph(&self) -> Result<Option<Vec<SbomPackage>>> {
        self.inner.dependency_graph().await
    }

    async fn code_search(&self, query: &str) -> Result<SearchOutcome> {
        // Search results are never cached: the rate-limit window in the
        // response drives the pause/resume protocol and must stay fresh.
        self.inner.code_search(query).await
    }

    fn search_available(&self) -> bool {
        self.inner.search_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingContext {
        summary: RepoSummary,
        files: Vec<RepoFile>,
        fetches: AtomicUsize,
    }

    impl CountingContext {
        fn new() -> Self {
            Self {
                summary: RepoSummary::local("demo"),
                files: vec![RepoFile::new("requirements.txt", 20)],
                fetches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RepositoryContext for CountingContext {
        fn summary(&self) -> &RepoSummary {
            &self.summary
        }

        fn files(&self) -> &[RepoFile] {
            &self.files
        }

        async fn file_content(&self, path: &str) -> Result<Option<String>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if path == "requirements.txt" {
                Ok(Some("openai==1.30.0\n".to_string()))
            } else {
                Ok(None)
            }
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

    #[tokio::test]
    async fn test_second_read_is_cached() {
        let caching = CachingRepositoryContext::new(CountingContext::new());

        let first = caching.file_content("requirements.txt").await.unwrap();
        assert_eq!(first.as_deref(), Some("openai==1.30.0\n"));
        assert_eq!(caching.inner.fetches.load(Ordering::SeqCst), 1);

        let second = caching.file_content("requirements.txt").await.unwrap();
        assert_eq!(second.as_deref(), Some("openai==1.30.0\n"));
        assert_eq!(caching.inner.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(caching.cache_size(), 1);
    }

    #[tokio::test]
    async fn test_negative_results_are_cached() {
        let caching = CachingRepositoryContext::new(CountingContext::new());

        assert!(caching.file_content("missing.bin").await.unwrap().is_none());
        assert!(caching.file_content("missing.bin").await.unwrap().is_none());
        assert_eq!(caching.inner.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_wraps_a_local_context() {
        use crate::adapters::outbound::filesystem::LocalRepositoryContext;

        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("requirements.txt"), "openai==1.30.0\n").unwrap();

        let caching =
            CachingRepositoryContext::new(LocalRepositoryContext::new(dir.path()).unwrap());
        let first = caching.file_content("requirements.txt").await.unwrap();
        assert_eq!(first.as_deref(), Some("openai==1.30.0\n"));

        // The cached copy survives the file going away.
        std::fs::remove_file(dir.path().join("requirements.txt")).unwrap();
        let second = caching.file_content("requirements.txt").await.unwrap();
        assert_eq!(second.as_deref(), Some("openai==1.30.0\n"));
        assert_eq!(caching.cache_size(), 1);
    }
}
