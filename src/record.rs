use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A generated script together with the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRecord {
    pub target: String,
    pub release: String,
    pub build_dir: String,
    pub script: String,
}

impl ScriptRecord {
    pub fn new(target: &str, release: &str, build_dir: &str, script: String) -> Self {
        Self {
            target: target.to_string(),
            release: release.to_string(),
            build_dir: build_dir.to_string(),
            script,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize script record to JSON")
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write script record to {}", path.display()))
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script record from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse script record JSON from {}", path.display()))
    }
}
