/// AnalysisRequest - Internal request DTO for the repository analysis
/// use case.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Override for the rate-limit resume wait budget, in seconds.
    pub max_resume_wait_secs: Option<i64>,
}

impl AnalysisRequest {
    pub fn new() -> Self {
        Self {
            max_resume_wait_secs: None,
        }
    }
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self::new()
    }
}
