use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::error::{BuildError, Result};
use crate::script::Script;

/// Shared handle to a registered provider
pub type ScriptRef = Arc<dyn Script>;

/// Name-addressable table of build-script providers.
///
/// Built once by the driver and passed to whatever needs to register or look
/// up targets. Names are case-sensitive and bound at most once; a second
/// registration under the same name is rejected.
#[derive(Default)]
pub struct TargetRegistry {
    targets: RwLock<HashMap<String, ScriptRef>>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: impl Into<String>, provider: ScriptRef) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(BuildError::InvalidTargetName(name));
        }

        let mut targets = self.targets.write().unwrap_or_else(PoisonError::into_inner);
        if targets.contains_key(&name) {
            return Err(BuildError::DuplicateTarget(name));
        }

        debug!(target_name = %name, "registered build target");
        targets.insert(name, provider);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<ScriptRef> {
        self.targets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| BuildError::UnknownTarget(name.to_string()))
    }

    /// Looks up `name` and asks its provider for a script.
    pub fn script(&self, name: &str, release: &str, build_dir: &str) -> Result<String> {
        let provider = self.lookup(name)?;
        debug!(target_name = %name, release, build_dir, "generating build script");

        provider
            .script(release, build_dir)
            .map_err(|source| BuildError::ScriptGeneration {
                target: name.to_string(),
                source,
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.targets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.targets.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted snapshot of the registered names. Clone the iterator to walk it again.
    pub fn names(&self) -> TargetNames {
        let mut names: Vec<String> = self
            .targets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();

        TargetNames {
            names: Arc::from(names),
            pos: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TargetNames {
    names: Arc<[String]>,
    pos: usize,
}

impl Iterator for TargetNames {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let name = self.names.get(self.pos)?.clone();
        self.pos += 1;
        Some(name)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.names.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TargetNames {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScriptError;

    fn echo(tag: &'static str) -> ScriptRef {
        Arc::new(move |release: &str, dir: &str| -> std::result::Result<String, ScriptError> {
            Ok(format!("{} {} {}", tag, release, dir))
        })
    }

    #[test]
    fn test_lookup_returns_registered_provider() {
        let registry = TargetRegistry::new();
        let provider = echo("linux");
        registry.register("linux", provider.clone()).unwrap();

        let found = registry.lookup("linux").unwrap();
        assert!(Arc::ptr_eq(&found, &provider));
        assert_eq!(found.script("v1", "/out").unwrap(), "linux v1 /out");
    }

    #[test]
    fn test_unknown_target() {
        let registry = TargetRegistry::new();
        assert!(matches!(
            registry.lookup("windows"),
            Err(BuildError::UnknownTarget(name)) if name == "windows"
        ));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let registry = TargetRegistry::new();
        registry.register("Linux", echo("a")).unwrap();
        assert!(registry.lookup("linux").is_err());
        registry.register("linux", echo("b")).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_empty_name_rejected() {
        let registry = TargetRegistry::new();
        assert!(matches!(
            registry.register("", echo("x")),
            Err(BuildError::InvalidTargetName(_))
        ));
        assert!(matches!(
            registry.register("   ", echo("x")),
            Err(BuildError::InvalidTargetName(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_rejected_and_original_kept() {
        let registry = TargetRegistry::new();
        let first = echo("first");
        registry.register("docs", first.clone()).unwrap();

        assert!(matches!(
            registry.register("docs", echo("second")),
            Err(BuildError::DuplicateTarget(name)) if name == "docs"
        ));
        assert!(Arc::ptr_eq(&registry.lookup("docs").unwrap(), &first));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_script_wraps_provider_error() {
        let registry = TargetRegistry::new();
        let failing: ScriptRef = Arc::new(|release: &str, dir: &str| {
            if release.is_empty() {
                Err(ScriptError::EmptyRelease)
            } else {
                Ok(format!("build {} {}", release, dir))
            }
        });
        registry.register("pkg", failing).unwrap();

        match registry.script("pkg", "", "/tmp/out") {
            Err(BuildError::ScriptGeneration { target, source }) => {
                assert_eq!(target, "pkg");
                assert_eq!(source, ScriptError::EmptyRelease);
            }
            other => panic!("expected script generation error, got {:?}", other),
        }
        assert_eq!(registry.script("pkg", "v2", "/o").unwrap(), "build v2 /o");
    }

    #[test]
    fn test_names_sorted_and_restartable() {
        let registry = TargetRegistry::new();
        for name in ["zip", "docs", "linux"] {
            registry.register(name, echo("x")).unwrap();
        }

        let names = registry.names();
        assert_eq!(names.len(), 3);
        let first: Vec<String> = names.clone().collect();
        let second: Vec<String> = names.collect();
        assert_eq!(first, vec!["docs", "linux", "zip"]);
        assert_eq!(first, second);
    }
}
