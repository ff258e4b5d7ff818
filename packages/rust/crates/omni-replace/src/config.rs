//! Configuration loading.
//!
//! A config file holds the rule list and, optionally, the source/output
//! roots and mirror options:
//!
//! ```yaml
//! rules:
//!   - pattern: "old.api"
//!     replacement: "new.api"
//!   - pattern: 'v(\d+)'
//!     replacement: "version-$1"
//!     regex: true
//! sources: ["src/views"]
//! outputs: ["../mirror/src/views"]
//! options:
//!   workers: 4
//!   context_lines: 3
//! ```
//!
//! `.yaml`/`.yml` files are parsed as YAML, anything else as JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ReplaceError;
use crate::mirror::MirrorOptions;
use crate::rules::{Rule, RuleSet};

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from the file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Top-level config file shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceConfig {
    /// Ordered substitution rules (required).
    pub rules: Vec<Rule>,
    /// Source roots, parallel to `outputs`.
    #[serde(default)]
    pub sources: Vec<PathBuf>,
    /// Output roots, parallel to `sources`.
    #[serde(default)]
    pub outputs: Vec<PathBuf>,
    /// Mirror options.
    #[serde(default)]
    pub options: MirrorOptions,
}

impl ReplaceConfig {
    /// Compile the rule list.
    ///
    /// # Errors
    /// `ReplaceError::Pattern` for a rule that does not compile.
    pub fn rule_set(&self) -> Result<RuleSet, ReplaceError> {
        RuleSet::new(self.rules.clone())
    }
}

/// Parse config text in the given format.
///
/// # Errors
/// `ReplaceError::Config` for malformed documents or a missing `rules` key.
pub fn parse_config(raw: &str, format: ConfigFormat) -> Result<ReplaceConfig, ReplaceError> {
    match format {
        ConfigFormat::Json => serde_json::from_str(raw)
            .map_err(|e| ReplaceError::Config(format!("invalid JSON config: {e}"))),
        ConfigFormat::Yaml => serde_yaml::from_str(raw)
            .map_err(|e| ReplaceError::Config(format!("invalid YAML config: {e}"))),
    }
}

/// Read and parse a config file.
///
/// # Errors
/// `ReplaceError::Config` when the file is missing, unreadable or malformed.
pub fn load_config(path: &Path) -> Result<ReplaceConfig, ReplaceError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        ReplaceError::Config(format!("cannot read config {}: {e}", path.display()))
    })?;
    let config = parse_config(&raw, ConfigFormat::from_path(path))?;
    tracing::debug!(
        path = %path.display(),
        rules = config.rules.len(),
        sources = config.sources.len(),
        "loaded config"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::PreviewMode;

    #[test]
    fn test_json_rules_only() {
        let config = parse_config(
            r#"{"rules": [{"pattern": "a", "replacement": "b"}]}"#,
            ConfigFormat::Json,
        )
        .unwrap();
        assert_eq!(config.rules, vec![Rule::literal("a", "b")]);
        assert!(config.sources.is_empty());
        assert_eq!(config.options, MirrorOptions::default());
    }

    #[test]
    fn test_yaml_with_options() {
        let raw = r"
rules:
  - pattern: 'v(\d+)'
    replacement: 'version-$1'
    regex: true
sources: [src]
outputs: [out]
options:
  workers: 4
  preview: windowed
";
        let config = parse_config(raw, ConfigFormat::Yaml).unwrap();
        assert!(config.rules[0].regex);
        assert_eq!(config.sources, vec![PathBuf::from("src")]);
        assert_eq!(config.options.workers, 4);
        assert_eq!(config.options.preview, PreviewMode::Windowed);
        assert_eq!(config.options.context_lines, 3);
    }

    #[test]
    fn test_missing_rules_is_error() {
        let err = parse_config(r#"{"sources": ["src"]}"#, ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, ReplaceError::Config(_)));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("r.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("r.YAML")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("replace-config.json")), ConfigFormat::Json);
    }
}
