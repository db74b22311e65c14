//! Configuration loading and parsing for cminus
//!
//! Reads `cminus.toml`, searched for from the analyzed tree's directory
//! upward. A missing file means defaults; unknown keys are reported as
//! warnings rather than rejected.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "cminus.toml";

const KNOWN_SECTIONS: &[(&str, &[&str])] = &[
    ("analysis", &["builtins"]),
    ("report", &["symbols"]),
    ("gate", &["fail_on_symbol_errors"]),
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid TOML in '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct ConfigResult {
    pub config: Config,
    pub path: Option<PathBuf>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub report: ReportConfig,
    pub gate: GateConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Pre-declare `input` and `output` in the global scope.
    pub builtins: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { builtins: true }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Print the symbol table after the diagnostics.
    pub symbols: bool,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GateConfig {
    /// Fail the run on binding errors as well as on type errors.
    pub fail_on_symbol_errors: bool,
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = read(path)?;
    parse(path, &content)
}

pub fn load_config_with_warnings(path: &Path) -> Result<ConfigResult, ConfigError> {
    let content = read(path)?;
    let config = parse(path, &content)?;
    let warnings = detect_unknown_keys(&content);

    Ok(ConfigResult {
        config,
        path: Some(path.to_path_buf()),
        warnings,
    })
}

/// Finds and loads the nearest config. No file yields defaults; a broken
/// file is an error.
pub fn discover_config(start_dir: &Path) -> Result<ConfigResult, ConfigError> {
    match find_config_file(start_dir) {
        Some(path) => load_config_with_warnings(&path),
        None => Ok(ConfigResult::default()),
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse(path: &Path, content: &str) -> Result<Config, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}

fn detect_unknown_keys(content: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    let table: toml::Table = match content.parse() {
        Ok(t) => t,
        Err(_) => return warnings,
    };

    let known_sections: HashSet<&str> = KNOWN_SECTIONS.iter().map(|(name, _)| *name).collect();
    for key in table.keys() {
        if !known_sections.contains(key.as_str()) {
            warnings.push(format!("Unknown config option: '{}'", key));
        }
    }

    for (section, known_keys) in KNOWN_SECTIONS {
        if let Some(toml::Value::Table(values)) = table.get(*section) {
            for key in values.keys() {
                if !known_keys.contains(&key.as_str()) {
                    warnings.push(format!("Unknown config option in [{}]: '{}'", section, key));
                }
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn create_temp_dir() -> tempfile::TempDir {
        tempfile::tempdir().expect("Failed to create temp dir")
    }

    #[test]
    fn load_config_from_file() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &config_path,
            r#"
[analysis]
builtins = false

[report]
symbols = true

[gate]
fail_on_symbol_errors = true
"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();

        assert!(!config.analysis.builtins);
        assert!(config.report.symbols);
        assert!(config.gate.fail_on_symbol_errors);
    }

    #[test]
    fn defaults_keep_builtins() {
        let config = Config::default();

        assert!(config.analysis.builtins);
        assert!(!config.report.symbols);
        assert!(!config.gate.fail_on_symbol_errors);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "[report]\nsymbols = true\n").unwrap();

        let config = load_config(&config_path).unwrap();

        assert!(config.report.symbols);
        assert!(config.analysis.builtins);
    }

    #[test]
    fn default_config_when_missing() {
        let dir = create_temp_dir();
        let result = discover_config(dir.path()).unwrap();

        assert_eq!(result.config, Config::default());
        assert!(result.path.is_none());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn error_on_invalid_toml() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "this is not valid { toml }").unwrap();

        let result = load_config(&config_path);

        assert!(result.is_err());
        match result.unwrap_err() {
            ConfigError::ParseError { path, message } => {
                assert_eq!(path, config_path);
                assert!(!message.is_empty());
            }
            other => panic!("Expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn error_on_wrong_value_type() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "[analysis]\nbuiltins = \"yes\"\n").unwrap();

        assert!(matches!(
            load_config(&config_path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn find_config_in_parent_directory() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "[report]\nsymbols = true\n").unwrap();

        let nested = dir.path().join("programs").join("sorting");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config_file(&nested), Some(config_path.clone()));

        let result = discover_config(&nested).unwrap();
        assert!(result.config.report.symbols);
        assert_eq!(result.path, Some(config_path));
    }

    #[test]
    fn warns_on_unknown_keys() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &config_path,
            r#"
optimize = true

[analysis]
builtins = true
strict = true
"#,
        )
        .unwrap();

        let result = load_config_with_warnings(&config_path).unwrap();

        assert_eq!(
            result.warnings,
            vec![
                "Unknown config option: 'optimize'".to_string(),
                "Unknown config option in [analysis]: 'strict'".to_string(),
            ]
        );
    }

    #[test]
    fn read_error_on_missing_file() {
        let dir = create_temp_dir();
        let missing = dir.path().join(CONFIG_FILENAME);

        let err = load_config(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
        assert!(err.to_string().contains(CONFIG_FILENAME));
    }
}
