use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{DEFAULT_TARGET_FILE, TargetFile};
use crate::platform::PlatformMapping;
use crate::record::ScriptRecord;
use crate::registry::TargetRegistry;
use crate::targets;

#[derive(Parser)]
#[command(name = "buildkit")]
#[command(about = "Generate build scripts for named build targets")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the build script for a target (the script is not run)
    Script {
        /// Build target name
        #[arg(long)]
        target: String,

        /// Release to build (tag, branch or version)
        #[arg(long)]
        release: String,

        /// Directory the build writes into
        #[arg(long)]
        build_dir: String,

        /// Extra target definitions (defaults to buildkit.json when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Emit a JSON record instead of the bare script
        #[arg(long)]
        json: bool,

        /// Write the output to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List registered build targets
    List {
        /// Extra target definitions (defaults to buildkit.json when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check for the tools generated scripts rely on
    Doctor,
}

pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Script {
            target,
            release,
            build_dir,
            config,
            json,
            output,
        } => script_command(&target, &release, &build_dir, config, json, output),
        Commands::List { config } => list_command(config),
        Commands::Doctor => doctor_command(),
    }
}

/// Builds the registry: built-in targets first, then the target file.
pub fn build_registry(config: Option<&Path>) -> Result<TargetRegistry> {
    let registry = TargetRegistry::new();
    targets::register_builtin(&registry).context("Failed to register built-in targets")?;

    let default_path = Path::new(DEFAULT_TARGET_FILE);
    let config_path = match config {
        Some(path) => Some(path),
        None if default_path.exists() => Some(default_path),
        None => None,
    };

    if let Some(path) = config_path {
        info!(path = %path.display(), "loading target file");
        TargetFile::load(path)?.register_into(&registry)?;
    }

    Ok(registry)
}

fn script_command(
    target: &str,
    release: &str,
    build_dir: &str,
    config: Option<PathBuf>,
    json: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let registry = build_registry(config.as_deref())?;

    let script = registry.script(target, release, build_dir)?;
    info!(target_name = target, release, "generated build script");

    let rendered = if json {
        ScriptRecord::new(target, release, build_dir, script).to_json()?
    } else {
        script
    };

    match output {
        Some(path) => {
            fs::write(&path, format!("{}\n", rendered))
                .with_context(|| format!("Failed to write script to {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

fn list_command(config: Option<PathBuf>) -> Result<()> {
    let registry = build_registry(config.as_deref())?;

    println!("{} build targets:", registry.len());
    for name in registry.names() {
        println!("  {}", name);
    }

    Ok(())
}

fn doctor_command() -> Result<()> {
    println!("buildkit doctor - checking tools used by generated scripts...\n");

    let mut missing = 0;
    for (command, description) in [("git", "git"), ("cargo", "Rust toolchain")] {
        match which::which(command) {
            Ok(path) => println!("✓ {} found at: {}", description, path.display()),
            Err(_) => {
                println!("✗ {} not found ({})", description, command);
                missing += 1;
            }
        }
    }

    let mapping = PlatformMapping::new();
    println!("\nPlatform targets:");
    for platform in mapping.platforms() {
        if let Some(triple) = mapping.triple(platform) {
            println!("  cargo-{} -> {}", platform, triple);
        }
    }

    if missing > 0 {
        return Err(anyhow::anyhow!("{} required tool(s) not found in PATH", missing));
    }

    println!("\n✓ buildkit doctor check complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script_command() {
        let cli = Cli::try_parse_from([
            "buildkit", "-v", "script", "--target", "cargo-linux", "--release", "v1",
            "--build-dir", "/tmp/out", "--json",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Script { target, release, build_dir, json, output, .. } => {
                assert_eq!(target, "cargo-linux");
                assert_eq!(release, "v1");
                assert_eq!(build_dir, "/tmp/out");
                assert!(json);
                assert!(output.is_none());
            }
            _ => panic!("expected script command"),
        }
    }

    #[test]
    fn test_build_registry_with_target_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("targets.json");
        fs::write(
            &path,
            r#"{ "targets": [ { "name": "docs", "kind": "template", "command": "make docs" } ] }"#,
        )
        .unwrap();

        let registry = build_registry(Some(path.as_path())).unwrap();
        assert!(registry.contains("docs"));
        assert!(registry.contains("cargo-host"));
    }

    #[test]
    fn test_missing_target_file() {
        let result = build_registry(Some(Path::new("/nonexistent/buildkit.json")));
        assert!(result.is_err());
    }
}
