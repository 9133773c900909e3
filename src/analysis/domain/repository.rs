use serde::{Deserialize, Serialize};

/// One entry of the repository file listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoFile {
    pub path: String,
    pub size: u64,
}

impl RepoFile {
    pub fn new(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    /// Lowercased file name without directories.
    pub fn file_name(&self) -> String {
        self.path
            .rsplit('/')
            .next()
            .unwrap_or(&self.path)
            .to_lowercase()
    }

    /// Lowercased extension, without the dot.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name();
        name.rsplit_once('.').map(|(_, ext)| ext.to_string())
    }

    /// Whether the file looks like source code worth content scanning.
    pub fn is_source(&self) -> bool {
        matches!(
            self.extension().as_deref(),
            Some(
                "py" | "js" | "jsx" | "ts" | "tsx" | "go" | "java" | "kt" | "rb" | "rs" | "cs"
                    | "php" | "scala" | "swift" | "ipynb"
            )
        )
    }

    /// Whether the file is a configuration file.
    pub fn is_config(&self) -> bool {
        let name = self.file_name();
        matches!(
            self.extension().as_deref(),
            Some("yaml" | "yml" | "json" | "toml" | "ini" | "cfg" | "env")
        ) || name.starts_with(".env")
    }
}

/// Descriptive summary of the scanned repository, used as the root
/// node of every generated BOM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RepoSummary {
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// "owner/name" when an owner is known, plain name otherwise.
    pub fn full_name(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{}/{}", owner, self.name),
            None => self.name.clone(),
        }
    }
}
