//! examsim configuration file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::ExamConfig;
use crate::statistics::DEFAULT_PASS_THRESHOLD;

/// Top-level examsim configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamsimConfig {
    /// Where answers are persisted between runs.
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
    /// Percentage at or above which an exam counts as passed.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: u32,
    /// Default question source. The bundled sample is used when unset.
    #[serde(default)]
    pub questions: Option<PathBuf>,
    /// Default exam parameters.
    #[serde(default)]
    pub exam: ExamConfig,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".examsim/answers.json")
}

fn default_pass_threshold() -> u32 {
    DEFAULT_PASS_THRESHOLD
}

impl Default for ExamsimConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            pass_threshold: default_pass_threshold(),
            questions: None,
            exam: ExamConfig::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `examsim.toml` in the current directory
/// 2. `~/.config/examsim/config.toml`
///
/// Environment variable overrides: `EXAMSIM_STORAGE_PATH`, `EXAMSIM_PASS_THRESHOLD`.
pub fn load_config() -> Result<ExamsimConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamsimConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("examsim.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => ExamsimConfig::default(),
    };

    // Apply env var overrides
    if let Ok(path) = std::env::var("EXAMSIM_STORAGE_PATH") {
        config.storage_path = PathBuf::from(path);
    }
    if let Ok(threshold) = std::env::var("EXAMSIM_PASS_THRESHOLD") {
        config.pass_threshold = threshold
            .trim()
            .parse()
            .with_context(|| format!("invalid EXAMSIM_PASS_THRESHOLD: '{threshold}'"))?;
    }

    config.storage_path = resolve_path(&config.storage_path);
    config.questions = config.questions.as_deref().map(resolve_path);

    Ok(config)
}

/// Parse a TOML string into a config and check its values.
pub fn parse_config_str(content: &str) -> Result<ExamsimConfig> {
    let config: ExamsimConfig = toml::from_str(content)?;
    anyhow::ensure!(
        config.pass_threshold <= 100,
        "pass_threshold must be between 0 and 100 (got {})",
        config.pass_threshold
    );
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examsim"))
}

/// Starter configuration written by `examsim init`.
pub const SAMPLE_CONFIG: &str = r#"# examsim configuration

# Where answers are saved between runs.
storage_path = ".examsim/answers.json"

# Percentage needed to pass an exam.
pass_threshold = 50

# Default question source (JSON or text document).
questions = "questions.json"

[exam]
question_count = 50
time_limit = 60
"#;
