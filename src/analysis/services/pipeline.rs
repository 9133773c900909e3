use crate::analysis::domain::{PipelineContext, Resumable, ResumeState};
use crate::analysis::units::{DetectionUnit, Needs, UnitInput, UnitOutcome};
use crate::ports::outbound::{ProgressReporter, RepositoryContext};
use chrono::Utc;
use std::time::Duration;

/// Longest acceptable wait for a rate-limit window to reset before a
/// paused unit is abandoned and partial results are emitted.
pub const MAX_RESUME_WAIT_SECS: i64 = 120;

/// Drives the detection units over one repository.
///
/// Units run sequentially in registry order. A unit failure is
/// reported and skipped, never aborting the run; a unit pause is
/// recorded and the unit is re-invoked once after all other units have
/// finished, provided the rate-limit window resets within the wait
/// budget.
pub struct PipelineOrchestrator<'a> {
    units: Vec<Box<dyn DetectionUnit>>,
    reporter: &'a dyn ProgressReporter,
    max_resume_wait_secs: i64,
}

impl<'a> PipelineOrchestrator<'a> {
    pub fn new(units: Vec<Box<dyn DetectionUnit>>, reporter: &'a dyn ProgressReporter) -> Self {
        Self {
            units,
            reporter,
            max_resume_wait_secs: MAX_RESUME_WAIT_SECS,
        }
    }

    pub fn with_max_resume_wait(mut self, secs: i64) -> Self {
        self.max_resume_wait_secs = secs;
        self
    }

    pub async fn run(&self, repo: &dyn RepositoryContext) -> PipelineContext {
        let mut ctx = PipelineContext::new();
        let mut paused: Option<(usize, ResumeState)> = None;
        let total = self.units.len();

        for (index, unit) in self.units.iter().enumerate() {
            self.reporter
                .report_progress(index + 1, total, Some(unit.name()));
            let input = Self::resolve_input(repo, unit.needs(), &ctx, None);
            match unit.run(input).await {
                Ok(Resumable::Complete(outcome)) => Self::absorb(&mut ctx, outcome),
                Ok(Resumable::Paused { partial, checkpoint }) => {
                    self.reporter.report(&format!(
                        "⏸️  {} paused on rate limit ({} queries remaining)",
                        unit.name(),
                        checkpoint.remaining().len()
                    ));
                    Self::absorb(&mut ctx, partial);
                    paused = Some((index, checkpoint));
                }
                Err(err) => {
                    self.reporter
                        .report_error(&format!("unit {} failed: {:#}", unit.name(), err));
                }
            }
        }

        if let Some((index, checkpoint)) = paused {
            self.resume_unit(repo, &mut ctx, index, checkpoint).await;
        }

        self.reporter.report_completion(&format!(
            "analysis complete: {} finding(s)",
            ctx.findings.len()
        ));
        ctx
    }

    /// Single re-invocation of a paused unit. A second pause is not
    /// retried; whatever partial output exists stands.
    async fn resume_unit(
        &self,
        repo: &dyn RepositoryContext,
        ctx: &mut PipelineContext,
        index: usize,
        checkpoint: ResumeState,
    ) {
        let unit = &self.units[index];
        let wait = checkpoint.rate_limit.wait_secs(Utc::now().timestamp());
        if wait > self.max_resume_wait_secs {
            self.reporter.report_error(&format!(
                "rate limit resets in {}s (budget {}s); keeping partial results for {}",
                wait,
                self.max_resume_wait_secs,
                unit.name()
            ));
            return;
        }
        if wait > 0 {
            self.reporter
                .report(&format!("waiting {}s for the rate limit to reset", wait));
            tokio::time::sleep(Duration::from_secs(wait as u64)).await;
        }

        self.reporter.report(&format!("resuming {}", unit.name()));
        let input = Self::resolve_input(repo, unit.needs(), ctx, Some(checkpoint));
        match unit.run(input).await {
            Ok(resumable) => {
                if resumable.is_paused() {
                    self.reporter.report_error(&format!(
                        "{} paused again after resume; keeping partial results",
                        unit.name()
                    ));
                }
                // The resumed outcome supersedes the partial findings
                // recorded at pause time.
                let outcome = resumable.into_inner();
                ctx.findings
                    .retain(|f| !outcome.findings.iter().any(|n| n.id == f.id));
                Self::absorb(ctx, outcome);
            }
            Err(err) => {
                self.reporter
                    .report_error(&format!("resume of {} failed: {:#}", unit.name(), err));
            }
        }
    }

    /// Resolves a unit's declared input set against the accumulated
    /// pipeline state.
    fn resolve_input<'r>(
        repo: &'r dyn RepositoryContext,
        needs: Needs,
        ctx: &'r PipelineContext,
        resume: Option<ResumeState>,
    ) -> UnitInput<'r> {
        UnitInput {
            repo,
            findings: needs.findings.then(|| ctx.findings.as_slice()),
            dependencies: if needs.dependencies {
                ctx.dependencies.as_ref()
            } else {
                None
            },
            docs: if needs.docs {
                ctx.parsed_docs.as_ref()
            } else {
                None
            },
            ai_files: needs.ai_files.then(|| ctx.ai_files_found.as_slice()),
            resume,
        }
    }

    fn absorb(ctx: &mut PipelineContext, outcome: UnitOutcome) {
        ctx.absorb_findings(outcome.findings);
        ctx.absorb_ai_files(outcome.ai_files);
        if let Some(deps) = outcome.dependencies {
            ctx.dependencies = Some(deps);
        }
        if let Some(docs) = outcome.parsed_docs {
            ctx.parsed_docs = Some(docs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::{
        Category, DetectedDependencies, Finding, RateLimitWindow, RepoFile, RepoSummary,
        SearchQuery, Severity,
    };
    use crate::ports::outbound::SearchOutcome;
    use crate::shared::Result;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct SilentReporter;

    impl ProgressReporter for SilentReporter {
        fn report(&self, _message: &str) {}
        fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}
        fn report_error(&self, _message: &str) {}
        fn report_completion(&self, _message: &str) {}
    }

    struct EmptyRepo {
        summary: RepoSummary,
    }

    impl EmptyRepo {
        fn new() -> Self {
            Self {
                summary: RepoSummary::local("fixture"),
            }
        }
    }

    #[async_trait]
    impl RepositoryContext for EmptyRepo {
        fn summary(&self) -> &RepoSummary {
            &self.summary
        }
        fn files(&self) -> &[RepoFile] {
            &[]
        }
        async fn file_content(&self, _path: &str) -> Result<Option<String>> {
            Ok(None)
        }
        async fn dependency_graph(&self) -> Result<Option<Vec<crate::ports::outbound::SbomPackage>>> {
            Ok(None)
        }
        async fn code_search(&self, _query: &str) -> Result<SearchOutcome> {
            Ok(SearchOutcome::Unavailable)
        }
        fn search_available(&self) -> bool {
            false
        }
    }

    struct StaticUnit {
        name: &'static str,
        findings: Vec<Finding>,
        fail: bool,
    }

    #[async_trait]
    impl DetectionUnit for StaticUnit {
        fn name(&self) -> &'static str {
            self.name
        }
        async fn run(&self, _input: UnitInput<'_>) -> Result<Resumable<UnitOutcome>> {
            if self.fail {
                anyhow::bail!("boom");
            }
            Ok(Resumable::Complete(UnitOutcome::from_findings(
                self.findings.clone(),
            )))
        }
    }

    /// Pauses once, then completes with a superseding finding set on
    /// the resume invocation.
    struct PausingUnit {
        invocations: Mutex<Vec<Option<usize>>>,
    }

    #[async_trait]
    impl DetectionUnit for PausingUnit {
        fn name(&self) -> &'static str {
            "pausing"
        }
        async fn run(&self, input: UnitInput<'_>) -> Result<Resumable<UnitOutcome>> {
            let resume_index = input.resume.as_ref().map(|s| s.next_query);
            self.invocations.lock().unwrap().push(resume_index);

            if input.resume.is_none() {
                return Ok(Resumable::Paused {
                    partial: UnitOutcome::from_findings(vec![Finding::new(
                        "code-openai",
                        Category::Code,
                        Severity::Medium,
                        10,
                        "partial",
                        "partial",
                    )]),
                    checkpoint: ResumeState {
                        queries: vec![
                            SearchQuery::new("openai", "a", "A"),
                            SearchQuery::new("anthropic", "b", "B"),
                        ],
                        next_query: 1,
                        provider_evidence: HashMap::new(),
                        // Window already reset: resume without sleeping
                        rate_limit: RateLimitWindow::new(0, 0),
                    },
                });
            }
            Ok(Resumable::Complete(UnitOutcome::from_findings(vec![
                Finding::new("code-openai", Category::Code, Severity::Medium, 10, "full", "full"),
                Finding::new("code-anthropic", Category::Code, Severity::Medium, 10, "full", "full"),
            ])))
        }
    }

    fn finding(id: &str) -> Finding {
        Finding::new(id, Category::Code, Severity::Medium, 10, id, id)
    }

    #[tokio::test]
    async fn test_unit_failure_is_isolated() {
        let units: Vec<Box<dyn DetectionUnit>> = vec![
            Box::new(StaticUnit { name: "a", findings: vec![finding("a-1")], fail: false }),
            Box::new(StaticUnit { name: "b", findings: vec![], fail: true }),
            Box::new(StaticUnit { name: "c", findings: vec![finding("c-1")], fail: false }),
        ];
        let reporter = SilentReporter;
        let orchestrator = PipelineOrchestrator::new(units, &reporter);
        let ctx = orchestrator.run(&EmptyRepo::new()).await;
        let ids: Vec<&str> = ctx.findings.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a-1", "c-1"]);
    }

    #[tokio::test]
    async fn test_paused_unit_is_resumed_exactly_once_after_the_rest() {
        let units: Vec<Box<dyn DetectionUnit>> = vec![
            Box::new(PausingUnit { invocations: Mutex::new(Vec::new()) }),
            Box::new(StaticUnit { name: "late", findings: vec![finding("late-1")], fail: false }),
        ];
        let reporter = SilentReporter;
        let orchestrator = PipelineOrchestrator::new(units, &reporter);
        let ctx = orchestrator.run(&EmptyRepo::new()).await;

        // Resumed output replaced the pause-time partial finding.
        let full = ctx.findings.iter().find(|f| f.id == "code-openai").unwrap();
        assert_eq!(full.title, "full");
        assert!(ctx.findings.iter().any(|f| f.id == "code-anthropic"));
        assert!(ctx.findings.iter().any(|f| f.id == "late-1"));
    }

    #[tokio::test]
    async fn test_resume_skipped_when_reset_exceeds_budget() {
        struct FarFutureUnit;

        #[async_trait]
        impl DetectionUnit for FarFutureUnit {
            fn name(&self) -> &'static str {
                "far"
            }
            async fn run(&self, input: UnitInput<'_>) -> Result<Resumable<UnitOutcome>> {
                assert!(input.resume.is_none(), "must not be re-invoked");
                Ok(Resumable::Paused {
                    partial: UnitOutcome::from_findings(vec![Finding::new(
                        "code-openai",
                        Category::Code,
                        Severity::Medium,
                        10,
                        "partial",
                        "partial",
                    )]),
                    checkpoint: ResumeState {
                        queries: vec![SearchQuery::new("openai", "a", "A")],
                        next_query: 0,
                        provider_evidence: HashMap::new(),
                        rate_limit: RateLimitWindow::new(0, i64::MAX / 2),
                    },
                })
            }
        }

        let units: Vec<Box<dyn DetectionUnit>> = vec![Box::new(FarFutureUnit)];
        let reporter = SilentReporter;
        let orchestrator = PipelineOrchestrator::new(units, &reporter);
        let ctx = orchestrator.run(&EmptyRepo::new()).await;
        assert_eq!(ctx.findings.len(), 1);
        assert_eq!(ctx.findings[0].title, "partial");
    }

    #[tokio::test]
    async fn test_needs_resolution_passes_dependencies() {
        struct DepsProducer;

        #[async_trait]
        impl DetectionUnit for DepsProducer {
            fn name(&self) -> &'static str {
                "producer"
            }
            async fn run(&self, _input: UnitInput<'_>) -> Result<Resumable<UnitOutcome>> {
                let mut outcome = UnitOutcome::default();
                outcome.dependencies = Some(DetectedDependencies::default());
                Ok(Resumable::Complete(outcome))
            }
        }

        struct DepsConsumer;

        #[async_trait]
        impl DetectionUnit for DepsConsumer {
            fn name(&self) -> &'static str {
                "consumer"
            }
            fn needs(&self) -> Needs {
                Needs { dependencies: true, ..Needs::NONE }
            }
            async fn run(&self, input: UnitInput<'_>) -> Result<Resumable<UnitOutcome>> {
                assert!(input.dependencies.is_some());
                assert!(input.findings.is_none());
                Ok(Resumable::Complete(UnitOutcome::default()))
            }
        }

        let units: Vec<Box<dyn DetectionUnit>> =
            vec![Box::new(DepsProducer), Box::new(DepsConsumer)];
        let reporter = SilentReporter;
        PipelineOrchestrator::new(units, &reporter)
            .run(&EmptyRepo::new())
            .await;
    }
}
