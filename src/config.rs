//! CLI configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via WABIN_CONFIG or --config)
//! 3. Environment variables

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wabin_protocol::EncoderConfig;

/// How encoded frames are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Lowercase hex followed by a newline.
    #[default]
    Hex,
    /// The frame bytes as-is.
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(OutputFormat::Hex),
            "raw" => Ok(OutputFormat::Raw),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Encoder settings.
    pub encoder: EncoderConfig,
    /// Output format.
    pub output: OutputFormat,
}

impl Config {
    /// Loads configuration from `path` (or WABIN_CONFIG), then applies
    /// environment variable overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("WABIN_CONFIG").map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(policy) = lookup("WABIN_NULL_CHILDREN") {
            self.encoder.null_children = policy.parse().map_err(ConfigError::ValidationError)?;
        }

        if let Some(capacity) = lookup("WABIN_INITIAL_CAPACITY") {
            self.encoder.initial_capacity = capacity.parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "WABIN_INITIAL_CAPACITY is not a number: {}",
                    capacity
                ))
            })?;
        }

        if let Some(output) = lookup("WABIN_OUTPUT") {
            self.output = output.parse().map_err(ConfigError::ValidationError)?;
        }

        Ok(())
    }
}

/// Configuration error.
#[derive(Debug)]
pub enum ConfigError {
    IoError(PathBuf, std::io::Error),
    ParseError(PathBuf, String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, e) => {
                write!(f, "failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::ValidationError(msg) => {
                write!(f, "configuration validation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use wabin_protocol::NullChildPolicy;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output, OutputFormat::Hex);
        assert_eq!(config.encoder.null_children, NullChildPolicy::Skip);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = Config {
            encoder: EncoderConfig::default().with_null_children(NullChildPolicy::Count),
            output: OutputFormat::Raw,
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "encoder:\n  null_children: count\noutput: raw").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.encoder.null_children, NullChildPolicy::Count);
        assert_eq!(config.encoder.initial_capacity, 256);
        assert_eq!(config.output, OutputFormat::Raw);
    }

    #[test]
    fn test_from_file_errors() {
        let err = Config::from_file("/nonexistent/wabin.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError(..)));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "output: [not, a, format]").unwrap();
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(..)));
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup(&[
                ("WABIN_NULL_CHILDREN", "count"),
                ("WABIN_INITIAL_CAPACITY", "4096"),
                ("WABIN_OUTPUT", "raw"),
            ]))
            .unwrap();

        assert_eq!(config.encoder.null_children, NullChildPolicy::Count);
        assert_eq!(config.encoder.initial_capacity, 4096);
        assert_eq!(config.output, OutputFormat::Raw);
    }

    #[test]
    fn test_invalid_overrides() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(lookup(&[("WABIN_INITIAL_CAPACITY", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = config
            .apply_overrides(lookup(&[("WABIN_OUTPUT", "base64")]))
            .unwrap_err();
        assert!(err.to_string().contains("base64"));
    }
}
