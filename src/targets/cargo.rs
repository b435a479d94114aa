use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{Result as BuildResult, ScriptError};
use crate::platform::PlatformMapping;
use crate::registry::TargetRegistry;
use crate::script::{Script, join_dir, require_inputs, shell_quote, trim_dir};

/// Registers `cargo-host` plus one `cargo-<platform>` target per known platform.
pub fn register(registry: &TargetRegistry) -> BuildResult<()> {
    registry.register("cargo-host", Arc::new(CargoScript::new()))?;

    let mapping = PlatformMapping::new();
    for platform in mapping.platforms() {
        if let Some(triple) = mapping.triple(platform) {
            registry.register(
                format!("cargo-{}", platform),
                Arc::new(CargoScript::new().target(triple)),
            )?;
        }
    }

    Ok(())
}

/// Produces a shell script that checks out a release and builds it with cargo.
#[derive(Debug, Clone)]
pub struct CargoScript {
    repository: Option<String>,
    target: Option<String>,
    profile: BuildProfile,
    features: Vec<String>,
    no_default_features: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildProfile {
    Debug,
    #[default]
    Release,
}

impl CargoScript {
    pub fn new() -> Self {
        Self {
            repository: None,
            target: None,
            profile: BuildProfile::Release,
            features: Vec::new(),
            no_default_features: false,
        }
    }

    /// Clone from `url` instead of adding a worktree of the current repository.
    pub fn repository(mut self, url: impl Into<String>) -> Self {
        self.repository = Some(url.into());
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn profile(mut self, profile: BuildProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn features(mut self, features: Vec<String>) -> Self {
        self.features = features;
        self
    }

    pub fn no_default_features(mut self, no_default: bool) -> Self {
        self.no_default_features = no_default;
        self
    }

    fn build_command(&self, build_dir: &str) -> String {
        let mut cmd = vec!["cargo".to_string(), "build".to_string(), "--locked".to_string()];

        match self.profile {
            BuildProfile::Release => cmd.push("--release".to_string()),
            BuildProfile::Debug => {
                // Debug is default, no flag needed
            }
        }

        if let Some(ref target) = self.target {
            cmd.push("--target".to_string());
            cmd.push(shell_quote(target));
        }

        if self.no_default_features {
            cmd.push("--no-default-features".to_string());
        }

        if !self.features.is_empty() {
            cmd.push("--features".to_string());
            cmd.push(shell_quote(&self.features.join(",")));
        }

        cmd.push("--target-dir".to_string());
        cmd.push(shell_quote(&join_dir(build_dir, "target")));

        cmd.join(" ")
    }
}

impl Default for CargoScript {
    fn default() -> Self {
        Self::new()
    }
}

impl Script for CargoScript {
    fn script(&self, release: &str, build_dir: &str) -> Result<String, ScriptError> {
        require_inputs(release, build_dir)?;

        let build_dir = trim_dir(build_dir);
        let src_dir = join_dir(build_dir, "src");

        let checkout = match self.repository {
            Some(ref url) => format!(
                "git clone --depth 1 --branch {} {} {}",
                shell_quote(release),
                shell_quote(url),
                shell_quote(&src_dir)
            ),
            None => format!(
                "git worktree add --force --detach {} {}",
                shell_quote(&src_dir),
                shell_quote(release)
            ),
        };

        let lines = [
            "set -eu".to_string(),
            format!("mkdir -p {}", shell_quote(build_dir)),
            checkout,
            format!("cd {}", shell_quote(&src_dir)),
            self.build_command(build_dir),
        ];

        Ok(lines.join("\n"))
    }
}
