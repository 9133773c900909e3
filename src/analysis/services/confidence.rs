use crate::analysis::domain::Finding;

/// Aggregate confidence band derived from the detection score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    None,
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::None => "none",
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }
}

/// Computes the detection score and its confidence band.
pub struct ConfidenceScorer;

impl ConfidenceScorer {
    /// Plain sum of finding weights. Governance and risk findings carry
    /// weight zero, so documentation and hygiene never affect the score.
    pub fn score(findings: &[Finding]) -> u32 {
        findings.iter().map(|f| f.weight).sum()
    }

    pub fn level(score: u32) -> ConfidenceLevel {
        match score {
            0 => ConfidenceLevel::None,
            1..=19 => ConfidenceLevel::Low,
            20..=49 => ConfidenceLevel::Medium,
            _ => ConfidenceLevel::High,
        }
    }
}
