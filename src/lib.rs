pub mod cli;
pub mod config;
pub mod error;
pub mod platform;
pub mod record;
pub mod registry;
pub mod script;
pub mod targets;

pub use error::{BuildError, ScriptError};
pub use registry::{ScriptRef, TargetRegistry};
pub use script::Script;
