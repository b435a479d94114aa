//! Built-in build targets.
//!
//! Every provider family exposes a `register` function that binds its targets
//! into a [`TargetRegistry`]. [`register_builtin`] calls each of them once.

pub mod cargo;
pub mod template;

pub use cargo::{BuildProfile, CargoScript};
pub use template::TemplateScript;

use crate::error::Result;
use crate::registry::TargetRegistry;

pub fn register_builtin(registry: &TargetRegistry) -> Result<()> {
    cargo::register(registry)?;
    template::register(registry)?;
    Ok(())
}
