use crate::analysis::domain::{
    Category, DependencyInfo, DetectedDependencies, DetectedPackage, Evidence, Finding, Payload,
    Resumable, Severity,
};
use crate::analysis::policies::ai_packages::{is_ai_package, line_matches, AI_PACKAGES};
use crate::analysis::units::{DetectionUnit, UnitInput, UnitOutcome};
use crate::shared::Result;
use async_trait::async_trait;

/// Manifest files parsed by the fallback path, with the ecosystem each
/// one belongs to.
const MANIFESTS: &[(&str, &str)] = &[
    ("requirements.txt", "pypi"),
    ("requirements-dev.txt", "pypi"),
    ("pyproject.toml", "pypi"),
    ("pipfile", "pypi"),
    ("setup.py", "pypi"),
    ("poetry.lock", "pypi"),
    ("uv.lock", "pypi"),
    ("package.json", "npm"),
    ("package-lock.json", "npm"),
    ("yarn.lock", "npm"),
    ("cargo.toml", "cargo"),
    ("go.mod", "golang"),
    ("pom.xml", "maven"),
    ("build.gradle", "gradle"),
];

/// Dependency detection unit.
///
/// Primary strategy: the host's machine-readable dependency graph,
/// filtered against the AI package allow-list. Fallback: line-oriented
/// parsing of manifest files with word-boundary matching. Exposes
/// whether the SBOM path succeeded and the resolved dependency list
/// for downstream units.
pub struct DependencyUnit;

impl DependencyUnit {
    pub fn new() -> Self {
        Self
    }

    async fn from_dependency_graph(
        &self,
        input: &UnitInput<'_>,
    ) -> Result<Option<(Vec<Finding>, DetectedDependencies)>> {
        let Some(packages) = input.repo.dependency_graph().await? else {
            return Ok(None);
        };

        let mut findings = Vec::new();
        let mut detected = DetectedDependencies {
            sbom_available: true,
            packages: Vec::new(),
        };
        for package in packages {
            if !is_ai_package(&package.name) {
                continue;
            }
            let ecosystem = package.ecosystem.clone().unwrap_or_else(|| "unknown".to_string());
            detected.packages.push(DetectedPackage {
                name: package.name.clone(),
                version: package.version.clone(),
                ecosystem: ecosystem.clone(),
            });
            findings.push(
                Finding::new(
                    format!("dep-{}", package.name),
                    Category::Dependencies,
                    Severity::Medium,
                    10,
                    package.name.clone(),
                    format!(
                        "AI-related package `{}` declared in the dependency graph",
                        package.name
                    ),
                )
                .with_payload(Payload::Dependency(DependencyInfo {
                    name: package.name.clone(),
                    version: package.version,
                    ecosystem,
                    source: "dependency-graph".to_string(),
                }))
                .with_evidence(Evidence::file("dependency-graph")),
            );
        }
        Ok(Some((findings, detected)))
    }

    async fn from_manifests(
        &self,
        input: &UnitInput<'_>,
    ) -> Result<(Vec<Finding>, DetectedDependencies)> {
        let mut findings: Vec<Finding> = Vec::new();
        let mut detected = DetectedDependencies::default();

        let manifest_files: Vec<(String, &str)> = input
            .repo
            .files()
            .iter()
            .filter_map(|f| {
                let name = f.file_name();
                MANIFESTS
                    .iter()
                    .find(|(m, _)| *m == name)
                    .map(|(_, eco)| (f.path.clone(), *eco))
            })
            .collect();

        for (path, ecosystem) in manifest_files {
            let Some(content) = input.repo.file_content(&path).await? else {
                continue;
            };
            for (line_no, line) in content.lines().enumerate() {
                let trimmed = line.trim();
                if trimmed.starts_with('#') || trimmed.starts_with("//") {
                    continue;
                }
                for entry in AI_PACKAGES {
                    if !line_matches(trimmed, entry) {
                        continue;
                    }
                    let id = format!("dep-{}", entry);
                    if let Some(existing) = findings.iter_mut().find(|f| f.id == id) {
                        existing.push_evidence(
                            Evidence::at_line(&path, line_no as u32 + 1)
                                .with_snippet(trimmed.chars().take(120).collect::<String>()),
                        );
                        continue;
                    }
                    detected.packages.push(DetectedPackage {
                        name: entry.to_string(),
                        version: extract_version(trimmed),
                        ecosystem: ecosystem.to_string(),
                    });
                    findings.push(
                        Finding::new(
                            id,
                            Category::Dependencies,
                            Severity::Medium,
                            10,
                            *entry,
                            format!("AI-related package `{}` declared in {}", entry, path),
                        )
                        .with_payload(Payload::Dependency(DependencyInfo {
                            name: entry.to_string(),
                            version: extract_version(trimmed),
                            ecosystem: ecosystem.to_string(),
                            source: path.clone(),
                        }))
                        .with_evidence(
                            Evidence::at_line(&path, line_no as u32 + 1)
                                .with_snippet(trimmed.chars().take(120).collect::<String>()),
                        ),
                    );
                }
            }
        }
        Ok((findings, detected))
    }
}

/// Best-effort version extraction from a manifest line.
fn extract_version(line: &str) -> Option<String> {
    for sep in ["==", ">=", "~=", "@ ", "\": \"^", "\": \"~", "\": \""] {
        if let Some((_, rest)) = line.split_once(sep) {
            let version: String = rest
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            if !version.is_empty() {
                return Some(version);
            }
        }
    }
    None
}

#[async_trait]
impl DetectionUnit for DependencyUnit {
    fn name(&self) -> &'static str {
        "dependencies"
    }

    async fn run(&self, input: UnitInput<'_>) -> Result<Resumable<UnitOutcome>> {
        let (findings, detected) = match self.from_dependency_graph(&input).await? {
            Some(result) => result,
            None => self.from_manifests(&input).await?,
        };

        Ok(Resumable::Complete(UnitOutcome {
            findings,
            dependencies: Some(detected),
            ..Default::default()
        }))
    }
}
