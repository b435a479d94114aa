use std::collections::HashMap;

use crate::error::ScriptError;

/// Maps short platform names onto Rust target triples.
#[derive(Debug, Clone)]
pub struct PlatformMapping {
    platform_to_triple: HashMap<String, String>,
}

impl PlatformMapping {
    pub fn new() -> Self {
        let mut mapping = HashMap::new();

        // Linux
        mapping.insert("linux".to_string(), "x86_64-unknown-linux-gnu".to_string());
        mapping.insert("linux-musl".to_string(), "x86_64-unknown-linux-musl".to_string());
        mapping.insert("linux-arm".to_string(), "aarch64-unknown-linux-gnu".to_string());
        mapping.insert("linux-arm-musl".to_string(), "aarch64-unknown-linux-musl".to_string());

        // macOS
        mapping.insert("macos".to_string(), "x86_64-apple-darwin".to_string());
        mapping.insert("macos-arm".to_string(), "aarch64-apple-darwin".to_string());

        // Windows
        mapping.insert("windows".to_string(), "x86_64-pc-windows-msvc".to_string());
        mapping.insert("windows-gnu".to_string(), "x86_64-pc-windows-gnu".to_string());
        mapping.insert("windows-arm".to_string(), "aarch64-pc-windows-msvc".to_string());

        mapping.insert("freebsd".to_string(), "x86_64-unknown-freebsd".to_string());

        Self {
            platform_to_triple: mapping,
        }
    }

    pub fn triple(&self, platform: &str) -> Option<&str> {
        self.platform_to_triple.get(platform).map(|s| s.as_str())
    }

    pub fn resolve(&self, platform: &str) -> Result<&str, ScriptError> {
        self.triple(platform)
            .ok_or_else(|| ScriptError::UnsupportedPlatform(platform.to_string()))
    }

    /// Platform names, sorted.
    pub fn platforms(&self) -> Vec<&str> {
        let mut platforms: Vec<&str> = self.platform_to_triple.keys().map(|s| s.as_str()).collect();
        platforms.sort_unstable();
        platforms
    }
}

impl Default for PlatformMapping {
    fn default() -> Self {
        Self::new()
    }
}
