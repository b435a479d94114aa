//! Target definitions loaded from a JSON file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::platform::PlatformMapping;
use crate::registry::{ScriptRef, TargetRegistry};
use crate::targets::{BuildProfile, CargoScript, TemplateScript};

pub const DEFAULT_TARGET_FILE: &str = "buildkit.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetFile {
    #[serde(default)]
    pub targets: Vec<TargetDef>,
}

/// One target definition. Unknown or misspelled fields are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
pub enum TargetDef {
    Template {
        name: String,
        command: String,
    },
    Cargo {
        name: String,
        #[serde(default)]
        platform: Option<String>,
        #[serde(default)]
        repository: Option<String>,
        #[serde(default)]
        profile: BuildProfile,
        #[serde(default)]
        features: Vec<String>,
        #[serde(default)]
        no_default_features: bool,
    },
}

impl TargetDef {
    pub fn name(&self) -> &str {
        match self {
            TargetDef::Template { name, .. } | TargetDef::Cargo { name, .. } => name,
        }
    }

    /// Builds the provider, checking the definition before anything is registered.
    pub fn provider(&self, mapping: &PlatformMapping) -> Result<ScriptRef> {
        match self {
            TargetDef::Template { name, command } => {
                let template = TemplateScript::new(command)
                    .with_context(|| format!("Target '{}'", name))?;
                Ok(Arc::new(template))
            }
            TargetDef::Cargo {
                name,
                platform,
                repository,
                profile,
                features,
                no_default_features,
            } => {
                let mut cargo = CargoScript::new()
                    .profile(*profile)
                    .features(features.clone())
                    .no_default_features(*no_default_features);

                if let Some(platform) = platform {
                    let triple = mapping
                        .resolve(platform)
                        .with_context(|| format!("Target '{}'", name))?;
                    cargo = cargo.target(triple);
                }
                if let Some(url) = repository {
                    cargo = cargo.repository(url.clone());
                }

                Ok(Arc::new(cargo))
            }
        }
    }
}

impl TargetFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read target file {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse target file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Registers every definition. Stops at the first failure; earlier
    /// definitions stay registered.
    pub fn register_into(&self, registry: &TargetRegistry) -> Result<()> {
        let mapping = PlatformMapping::new();

        for def in &self.targets {
            let provider = def.provider(&mapping)?;
            registry
                .register(def.name(), provider)
                .with_context(|| format!("Failed to register target '{}'", def.name()))?;
        }

        Ok(())
    }
}
