use std::sync::Arc;

use crate::error::{BuildError, Result as BuildResult, ScriptError};
use crate::registry::TargetRegistry;
use crate::script::{Script, require_inputs, shell_quote, trim_dir};

/// Source archive of a tagged release, written into the build directory.
pub const SOURCE_TARBALL: &str =
    "mkdir -p {build_dir} && git archive --format=tar.gz --prefix={release}/ -o {build_dir}/{release}.tar.gz {release}";

pub fn register(registry: &TargetRegistry) -> BuildResult<()> {
    let name = "source-tarball";
    let tarball = TemplateScript::new(SOURCE_TARBALL).map_err(|source| BuildError::ScriptGeneration {
        target: name.to_string(),
        source,
    })?;
    registry.register(name, Arc::new(tarball))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Release,
    BuildDir,
}

/// A command line with `{release}` and `{build_dir}` substituted in.
///
/// Each placeholder expands to a single shell word, quoted when needed, so it
/// must not be wrapped in quotes inside the template. Any other brace is
/// copied through untouched, which keeps `${VAR}` and `awk '{print $1}'`
/// working.
#[derive(Debug, Clone)]
pub struct TemplateScript {
    segments: Vec<Segment>,
}

impl TemplateScript {
    pub fn new(template: &str) -> Result<Self, ScriptError> {
        if template.trim().is_empty() {
            return Err(ScriptError::Invalid("Template command is empty".to_string()));
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while !rest.is_empty() {
            let placeholder = if rest.starts_with("{release}") {
                Some((Segment::Release, "{release}".len()))
            } else if rest.starts_with("{build_dir}") {
                Some((Segment::BuildDir, "{build_dir}".len()))
            } else {
                None
            };

            match placeholder {
                Some((segment, len)) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(segment);
                    rest = &rest[len..];
                }
                None => {
                    let mut chars = rest.chars();
                    if let Some(c) = chars.next() {
                        literal.push(c);
                    }
                    rest = chars.as_str();
                }
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }
}

impl Script for TemplateScript {
    fn script(&self, release: &str, build_dir: &str) -> Result<String, ScriptError> {
        require_inputs(release, build_dir)?;

        let release = shell_quote(release);
        let build_dir = shell_quote(trim_dir(build_dir));

        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Release => out.push_str(&release),
                Segment::BuildDir => out.push_str(&build_dir),
            }
        }
        Ok(out)
    }
}
