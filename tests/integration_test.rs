/// Integration tests for the analysis pipeline
mod test_utilities;

use std::sync::Arc;
use test_utilities::mocks::*;

use aibom_scan::analysis::domain::{Category, Payload, RateLimitWindow};
use aibom_scan::analysis::services::{ConfidenceLevel, ConfidenceScorer};
use aibom_scan::analysis::units::build_registry;
use aibom_scan::ports::outbound::{SbomPackage, SearchHit, SearchOutcome};
use aibom_scan::prelude::*;

fn use_case(
    repo: MockRepositoryContext,
    registry: MockModelRegistry,
) -> AnalyzeRepositoryUseCase<MockRepositoryContext, MockProgressReporter> {
    let units = build_registry(Arc::new(registry), Arc::new(MarkdownExtractor::new()));
    AnalyzeRepositoryUseCase::new(repo, MockProgressReporter::new(), units)
}

#[tokio::test]
async fn test_local_pipeline_happy_path() {
    let repo = MockRepositoryContext::new("demo-bot")
        .with_file("requirements.txt", "openai==1.30.0\nlangchain>=0.2.0\n")
        .with_file(
            "app.py",
            "from openai import OpenAI\n\nclient = OpenAI()\nresponse = client.chat.completions.create(model=\"gpt-4o\")\n",
        )
        .with_file(
            "README.md",
            "# demo-bot\n\nA chatbot.\n\n## Models\n\nWe call gpt-4o through the OpenAI API.\n",
        )
        .with_file("LICENSE", "MIT License\n");

    let response = use_case(repo, MockModelRegistry::new())
        .execute(AnalysisRequest::new())
        .await
        .unwrap();

    // Code usage merged into the dependency finding
    let openai = response
        .findings
        .iter()
        .find(|f| f.id == "dep-openai")
        .unwrap();
    assert_eq!(openai.title, "openai - Usage Detected");
    assert_eq!(openai.weight, 10);
    assert!(!openai.code_usage.is_empty());
    assert_eq!(openai.code_usage[0].file, "app.py");

    // Declared but unused package stays a plain dependency finding
    let langchain = response
        .findings
        .iter()
        .find(|f| f.id == "dep-langchain")
        .unwrap();
    assert_eq!(langchain.title, "langchain");
    assert!(langchain.code_usage.is_empty());

    // Model identity resolved from code
    let model = response
        .findings
        .iter()
        .find(|f| f.id == "model-openai-gpt-4o")
        .unwrap();
    assert_eq!(model.weight, 15);
    match &model.payload {
        Some(Payload::Model(info)) => {
            assert_eq!(info.provider, "openai");
            assert_eq!(info.model_name, "gpt-4o");
            assert_eq!(info.locations, vec!["app.py".to_string()]);
        }
        other => panic!("expected model payload, got {:?}", other),
    }

    // Documentation discusses models
    assert!(response.findings.iter().any(|f| f.id == "docs-ai-topics"));

    // Governance checklist: license present, everything else missing
    let governance: Vec<&str> = response
        .findings
        .iter()
        .filter(|f| f.category == Category::Governance)
        .map(|f| f.title.as_str())
        .collect();
    assert_eq!(governance.len(), 4);
    assert!(governance.contains(&"License Present"));
    assert!(governance.contains(&"Model Card Missing"));

    // Governance gap risk fires because AI components are present
    let risk = response
        .findings
        .iter()
        .find(|f| f.id == "risk-governance-gaps")
        .unwrap();
    assert_eq!(risk.weight, 0);

    // Weight-0 findings never move the score
    assert_eq!(response.findings.len(), 9);
    assert_eq!(response.score, 40);
    assert_eq!(response.confidence, ConfidenceLevel::Medium);
    assert_eq!(response.score, ConfidenceScorer::score(&response.findings));
    assert!(response.ai_detected());
}

#[tokio::test]
async fn test_empty_repository_scores_zero() {
    let repo = MockRepositoryContext::new("empty");
    let response = use_case(repo, MockModelRegistry::new())
        .execute(AnalysisRequest::new())
        .await
        .unwrap();

    assert_eq!(response.score, 0);
    assert_eq!(response.confidence, ConfidenceLevel::None);
    assert!(!response.ai_detected());
    // The governance checklist is emitted even for a non-AI repository
    assert!(response
        .findings
        .iter()
        .all(|f| f.category == Category::Governance));
    // But no governance-gap risk without AI evidence
    assert!(!response.findings.iter().any(|f| f.id == "risk-governance-gaps"));
}

#[tokio::test]
async fn test_rate_limited_search_resumes_each_query_once() {
    let now = chrono::Utc::now().timestamp();
    let repo = MockRepositoryContext::new("hosted")
        .with_dependency_graph(vec![
            SbomPackage {
                name: "openai".to_string(),
                version: Some("1.30.0".to_string()),
                ecosystem: Some("pypi".to_string()),
            },
            SbomPackage {
                name: "langchain".to_string(),
                version: None,
                ecosystem: Some("pypi".to_string()),
            },
        ])
        .with_search_outcomes(vec![
            // First query succeeds but exhausts the window
            SearchOutcome::Results {
                items: vec![SearchHit {
                    path: "app.py".to_string(),
                    url: Some("https://example.com/app.py".to_string()),
                    snippet: None,
                }],
                rate_limit: RateLimitWindow::new(0, now + 1),
            },
            // Second query runs after the resume wait
            SearchOutcome::Results {
                items: vec![SearchHit {
                    path: "chain.py".to_string(),
                    url: Some("https://example.com/chain.py".to_string()),
                    snippet: None,
                }],
                rate_limit: RateLimitWindow::new(29, now + 60),
            },
        ]);

    let response = use_case(repo, MockModelRegistry::new())
        .execute(AnalysisRequest::new())
        .await
        .unwrap();

    // Both smart queries executed, each exactly once
    let openai = response
        .findings
        .iter()
        .find(|f| f.id == "dep-openai")
        .unwrap();
    assert_eq!(openai.title, "openai - Usage Detected");
    assert_eq!(openai.code_usage[0].file, "app.py");

    let langchain = response
        .findings
        .iter()
        .find(|f| f.id == "dep-langchain")
        .unwrap();
    assert_eq!(langchain.title, "langchain - Usage Detected");
    assert_eq!(langchain.code_usage[0].file, "chain.py");
}

#[tokio::test]
async fn test_resume_budget_exceeded_keeps_partial_results() {
    let far_future = chrono::Utc::now().timestamp() + 3600;
    let repo = MockRepositoryContext::new("hosted")
        .with_dependency_graph(vec![
            SbomPackage {
                name: "openai".to_string(),
                version: None,
                ecosystem: Some("pypi".to_string()),
            },
            SbomPackage {
                name: "anthropic".to_string(),
                version: None,
                ecosystem: Some("pypi".to_string()),
            },
        ])
        .with_search_outcomes(vec![SearchOutcome::Results {
            items: vec![SearchHit {
                path: "app.py".to_string(),
                url: None,
                snippet: None,
            }],
            rate_limit: RateLimitWindow::new(0, far_future),
        }]);

    let response = use_case(repo, MockModelRegistry::new())
        .execute(AnalysisRequest::new())
        .await
        .unwrap();

    // The first query's partial result survives; the second never ran
    let openai = response
        .findings
        .iter()
        .find(|f| f.id == "dep-openai")
        .unwrap();
    assert_eq!(openai.title, "openai - Usage Detected");

    let anthropic = response
        .findings
        .iter()
        .find(|f| f.id == "dep-anthropic")
        .unwrap();
    assert_eq!(anthropic.title, "anthropic");
    assert!(anthropic.code_usage.is_empty());
}

#[tokio::test]
async fn test_hardcoded_key_risk_detected() {
    let repo = MockRepositoryContext::new("leaky")
        .with_file("requirements.txt", "openai==1.30.0\n")
        .with_file(
            "app.py",
            "from openai import OpenAI\nclient = OpenAI(api_key=\"sk-proj-abcdefghijklmnopqrstuvwx\")\n",
        );

    let response = use_case(repo, MockModelRegistry::new())
        .execute(AnalysisRequest::new())
        .await
        .unwrap();

    let risk = response
        .findings
        .iter()
        .find(|f| f.id == "risk-hardcoded-keys")
        .unwrap();
    assert_eq!(risk.weight, 0);
    assert_eq!(risk.severity, Severity::High);
    // Evidence locates the key without reproducing it
    assert!(risk.evidence.iter().all(|e| e.snippet.is_none()));
}

#[tokio::test]
async fn test_document_synthesis_produces_all_formats() {
    let repo = MockRepositoryContext::new("demo-bot")
        .with_file("requirements.txt", "openai==1.30.0\n");

    let response = use_case(repo, MockModelRegistry::new())
        .execute(AnalysisRequest::new())
        .await
        .unwrap();

    let synthesizer = SynthesizeDocumentsUseCase::new(MockProgressReporter::new());
    let session = synthesizer
        .execute(response, &OutputFormat::ALL)
        .unwrap();

    assert_eq!(session.documents.len(), 4);
    for format in OutputFormat::ALL {
        assert!(session.document(format).is_some());
    }
}
