//! Grading configuration and the `answerkey.toml` loader.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// How unordered comma-separated answers are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListMatchMode {
    /// Both sides must hold the same tokens, in any order.
    #[default]
    Exact,
    /// Each student token only has to appear somewhere in the accepted value.
    /// `4` is therefore accepted inside `14,4`.
    Contains,
}

/// Settings that affect how a single answer is graded.
///
/// Captured once at the start of a run and passed by value into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GradingConfig {
    /// Keep interior whitespace when comparing answers.
    pub preserve_spacing: bool,
    /// When false, `5,4` may match `4,5`.
    pub list_order_matters: bool,
    /// Rewrite `a/b` answers to their two-decimal quotient.
    pub convert_fractions_to_decimals: bool,
    /// Points awarded for a fully correct answer.
    pub default_point_value: f64,
    pub list_match: ListMatchMode,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            preserve_spacing: false,
            list_order_matters: true,
            convert_fractions_to_decimals: true,
            default_point_value: 1.0,
            list_match: ListMatchMode::Exact,
        }
    }
}

/// Top-level answerkey configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerkeyConfig {
    #[serde(default)]
    pub grading: GradingConfig,
    /// Write a `<student file>_Grade.txt` next to the output directory.
    #[serde(default = "default_true")]
    pub create_results_file: bool,
    /// Add parenthesized and bare forms of list answers when compiling.
    #[serde(default)]
    pub expand_equivalents: bool,
    /// Max student files graded concurrently.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Output directory for grade files and reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_true() -> bool {
    true
}
fn default_parallelism() -> usize {
    4
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./answerkey-results")
}

impl Default for AnswerkeyConfig {
    fn default() -> Self {
        Self {
            grading: GradingConfig::default(),
            create_results_file: true,
            expand_equivalents: false,
            parallelism: default_parallelism(),
            output_dir: default_output_dir(),
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `answerkey.toml` in the current directory
/// 2. `~/.config/answerkey/config.toml`
///
/// Environment variable overrides: `ANSWERKEY_POINT_VALUE`, `ANSWERKEY_PRESERVE_SPACING`.
pub fn load_config() -> Result<AnswerkeyConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<AnswerkeyConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("answerkey.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => read_config_file(&path)?,
        None => AnswerkeyConfig::default(),
    };

    apply_overrides(
        &mut config,
        std::env::var("ANSWERKEY_POINT_VALUE").ok().as_deref(),
        std::env::var("ANSWERKEY_PRESERVE_SPACING").ok().as_deref(),
    )?;

    config.validate()?;
    Ok(config)
}

/// Read and parse one config file, without overrides or validation.
pub fn read_config_file(path: &Path) -> Result<AnswerkeyConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&content).with_context(|| format!("failed to parse config: {}", path.display()))
}

/// Apply `ANSWERKEY_POINT_VALUE` and `ANSWERKEY_PRESERVE_SPACING` values.
pub fn apply_overrides(
    config: &mut AnswerkeyConfig,
    point_value: Option<&str>,
    preserve_spacing: Option<&str>,
) -> Result<()> {
    if let Some(value) = point_value {
        config.grading.default_point_value = value
            .trim()
            .parse()
            .with_context(|| format!("ANSWERKEY_POINT_VALUE is not a number: '{value}'"))?;
    }
    if let Some(value) = preserve_spacing {
        config.grading.preserve_spacing = value
            .trim()
            .parse()
            .with_context(|| format!("ANSWERKEY_PRESERVE_SPACING is not a bool: '{value}'"))?;
    }
    Ok(())
}

/// Parse a TOML string into a config (useful for testing).
pub fn parse_config(content: &str) -> Result<AnswerkeyConfig> {
    let config: AnswerkeyConfig = toml::from_str(content)?;
    Ok(config)
}

impl AnswerkeyConfig {
    /// Reject settings no run can use.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.parallelism >= 1, "parallelism must be at least 1");
        anyhow::ensure!(
            self.grading.default_point_value.is_finite()
                && self.grading.default_point_value > 0.0,
            "default_point_value must be a positive number"
        );
        Ok(())
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("answerkey"))
}
