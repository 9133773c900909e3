use crate::analysis::domain::finding::Evidence;
use std::collections::HashMap;

/// Result of a detection unit invocation: either fully complete, or
/// paused with partial results plus a checkpoint sufficient to finish
/// the remaining work later.
#[derive(Debug)]
pub enum Resumable<T> {
    Complete(T),
    Paused { partial: T, checkpoint: ResumeState },
}

impl<T> Resumable<T> {
    pub fn is_paused(&self) -> bool {
        matches!(self, Resumable::Paused { .. })
    }

    /// Unwraps the inner value, dropping any checkpoint.
    pub fn into_inner(self) -> T {
        match self {
            Resumable::Complete(value) => value,
            Resumable::Paused { partial, .. } => partial,
        }
    }
}

/// One planned code-search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Provider or framework the query targets ("openai", "langchain", ...).
    pub provider: String,
    /// The search expression sent to the host's code search API.
    pub expression: String,
    /// Human-readable label used in finding titles.
    pub label: String,
}

impl SearchQuery {
    pub fn new(
        provider: impl Into<String>,
        expression: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            expression: expression.into(),
            label: label.into(),
        }
    }
}

/// Last observed rate-limit window from search response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateLimitWindow {
    /// Remaining quota units in the current window.
    pub remaining: u32,
    /// Unix epoch seconds at which the window resets.
    pub reset_at: i64,
}

impl RateLimitWindow {
    pub fn new(remaining: u32, reset_at: i64) -> Self {
        Self {
            remaining,
            reset_at,
        }
    }

    /// Seconds until the window resets, clamped at zero.
    pub fn wait_secs(&self, now_epoch: i64) -> i64 {
        (self.reset_at - now_epoch).max(0)
    }
}

/// Checkpoint for the rate-limited code-search unit.
///
/// Created when the unit cannot complete within its quota; consumed
/// exactly once by a later re-invocation of the same unit.
#[derive(Debug, Clone)]
pub struct ResumeState {
    /// Full planned query list; indices below `next_query` are done.
    pub queries: Vec<SearchQuery>,
    /// Index of the next unexecuted query.
    pub next_query: usize,
    /// Per-provider evidence accumulated before the pause.
    pub provider_evidence: HashMap<String, Vec<Evidence>>,
    /// Rate-limit window observed when the pause was taken.
    pub rate_limit: RateLimitWindow,
}

impl ResumeState {
    /// Queries still to be executed on resume.
    pub fn remaining(&self) -> &[SearchQuery] {
        &self.queries[self.next_query.min(self.queries.len())..]
    }
}
