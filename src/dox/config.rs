//! Project configuration.
//!
//! A `dox.yaml` file at the project root configures the include search path
//! for `@include`/`@snippet` resolution and the set of HTML tags that may
//! appear in annotation text. Everything has a sensible default so the
//! toolchain also runs without a config file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// HTML tags accepted in annotation text without a warning.
pub const DEFAULT_EXPECTED_TAGS: &[&str] = &[
    "a", "b", "i", "u", "em", "strong", "tt", "code", "sub", "sup", "small", "br", "p", "ul", "ol",
    "li", "dl", "dt", "dd", "table", "tr", "th", "td", "caption", "img",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DoxConfig {
    /// Ordered list of directories `@include`/`@snippet` paths resolve
    /// against; first match wins.
    pub include_dirs: Vec<PathBuf>,
    /// HTML tags allowed in annotation text.
    pub expected_tags: Vec<String>,
}

impl Default for DoxConfig {
    fn default() -> DoxConfig {
        DoxConfig {
            include_dirs: vec![PathBuf::from(".")],
            expected_tags: DEFAULT_EXPECTED_TAGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl DoxConfig {
    /// Load a YAML config file.
    pub fn load(path: &Path) -> Result<DoxConfig, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError {
            path: path.to_path_buf(),
            msg: e.to_string(),
        })?;
        serde_yaml::from_str(&text).map_err(|e| ConfigError {
            path: path.to_path_buf(),
            msg: e.to_string(),
        })
    }
}

/// Raised when the config file cannot be read or parsed.
#[derive(Debug)]
pub struct ConfigError {
    pub path: PathBuf,
    pub msg: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error in {}: {}", self.path.display(), self.msg)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DoxConfig::default();
        assert_eq!(config.include_dirs, vec![PathBuf::from(".")]);
        assert!(config.expected_tags.iter().any(|t| t == "tt"));
    }

    #[test]
    fn test_parse_yaml() {
        let config: DoxConfig =
            serde_yaml::from_str("include_dirs:\n  - demos\n  - snippets\n").unwrap();
        assert_eq!(
            config.include_dirs,
            vec![PathBuf::from("demos"), PathBuf::from("snippets")]
        );
        // Unset fields keep their defaults.
        assert!(!config.expected_tags.is_empty());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(serde_yaml::from_str::<DoxConfig>("includes: [x]\n").is_err());
    }
}
