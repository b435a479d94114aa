//! The script provider capability.

use crate::error::ScriptError;

/// Produces the build script for one build target.
///
/// Implementations translate a release identifier and a build directory into
/// a shell command (or multi-line script body). They never run anything:
/// executing the returned string is up to the caller.
///
/// Either a usable script or an error comes back, never both. Providers are
/// expected to be deterministic, so the same inputs give the same script or
/// the same error.
pub trait Script: Send + Sync {
    fn script(&self, release: &str, build_dir: &str) -> Result<String, ScriptError>;
}

impl<F> Script for F
where
    F: Fn(&str, &str) -> Result<String, ScriptError> + Send + Sync,
{
    fn script(&self, release: &str, build_dir: &str) -> Result<String, ScriptError> {
        self(release, build_dir)
    }
}

/// Rejects inputs no built-in provider can put into a shell command.
pub fn require_inputs(release: &str, build_dir: &str) -> Result<(), ScriptError> {
    if release.trim().is_empty() {
        return Err(ScriptError::EmptyRelease);
    }
    if build_dir.trim().is_empty() {
        return Err(ScriptError::EmptyBuildDir);
    }

    // git and tar read a leading dash as an option
    if release.starts_with('-') {
        return Err(ScriptError::Invalid(format!("Invalid release: {}", release)));
    }
    if build_dir.starts_with('-') {
        return Err(ScriptError::Invalid(format!("Invalid build directory: {}", build_dir)));
    }
    Ok(())
}

/// Single-quotes `value` for a POSIX shell unless it is made only of safe characters.
pub fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./,:=+@%".contains(c));

    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

/// `dir` without trailing slashes; the root stays `/`.
pub fn trim_dir(dir: &str) -> &str {
    let trimmed = dir.trim_end_matches('/');
    if trimmed.is_empty() && dir.starts_with('/') { "/" } else { trimmed }
}

/// Joins `child` onto `dir` with exactly one separator.
pub fn join_dir(dir: &str, child: &str) -> String {
    match trim_dir(dir) {
        "/" => format!("/{}", child),
        dir => format!("{}/{}", dir, child),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_provider() {
        let provider = |release: &str, dir: &str| -> Result<String, ScriptError> {
            Ok(format!("echo {} {}", release, dir))
        };
        assert_eq!(provider.script("v1", "/out").unwrap(), "echo v1 /out");
    }

    #[test]
    fn test_require_inputs() {
        assert_eq!(require_inputs("", "/out"), Err(ScriptError::EmptyRelease));
        assert_eq!(require_inputs("v1", "  "), Err(ScriptError::EmptyBuildDir));
        assert!(matches!(require_inputs("--output=/etc/x", "/d"), Err(ScriptError::Invalid(_))));
        assert!(matches!(require_inputs("v1", "-rf"), Err(ScriptError::Invalid(_))));
        assert!(require_inputs("v1", "/out").is_ok());
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("v1.2"), "v1.2");
        assert_eq!(shell_quote("a b"), "'a b'");
        assert_eq!(shell_quote("v1;touch /tmp/x"), "'v1;touch /tmp/x'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn test_join_dir() {
        assert_eq!(join_dir("/", "src"), "/src");
        assert_eq!(join_dir("///", "src"), "/src");
        assert_eq!(join_dir("/tmp/build/", "src"), "/tmp/build/src");
        assert_eq!(join_dir("out", "target"), "out/target");
        assert_eq!(trim_dir("/"), "/");
        assert_eq!(trim_dir("/tmp/"), "/tmp");
    }
}
