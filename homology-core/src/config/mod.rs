//! Configuration types for the homology pipeline
//!
//! A `Config` is built once per process (from TOML, deployment properties or
//! defaults) and handed to the aligner and pipeline constructors by value.

use crate::types::AlignerTool;
use crate::HomologyError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub aligner: AlignerConfig,
    #[serde(default)]
    pub scratch: ScratchConfig,
    #[serde(default)]
    pub panel: PanelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlignerConfig {
    #[serde(default)]
    pub tool: AlignerTool,
    /// Directory holding the aligner binaries; `None` resolves them on `PATH`
    #[serde(default)]
    pub bin_dir: Option<PathBuf>,
    /// E-value cutoff, passed to the aligner verbatim
    #[serde(default = "default_max_evalue")]
    pub max_evalue: String,
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Wall-clock limit for a single aligner invocation
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScratchConfig {
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
    /// Keep a failed run's temporary files for inspection
    #[serde(default)]
    pub preserve_on_failure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelConfig {
    /// Ortholog groups whose member sequences make up the reference panel
    #[serde(default = "default_ortholog_group_ids")]
    pub ortholog_group_ids: Vec<String>,
}

// Default value functions
fn default_max_evalue() -> String { "1.0E-5".to_string() }
fn default_threads() -> usize { num_cpus::get() }
fn default_scratch_dir() -> PathBuf { std::env::temp_dir().join("homology") }
fn default_ortholog_group_ids() -> Vec<String> {
    vec!["KBHgp746131".to_string(), "KBHgp779288".to_string()]
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            tool: AlignerTool::default(),
            bin_dir: None,
            max_evalue: default_max_evalue(),
            threads: default_threads(),
            timeout_seconds: None,
        }
    }
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
            preserve_on_failure: false,
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            ortholog_group_ids: default_ortholog_group_ids(),
        }
    }
}

impl AlignerConfig {
    /// Full path (or bare name for `PATH` lookup) of one of the tool's binaries
    pub fn binary_path(&self, binary: &str) -> PathBuf {
        match &self.bin_dir {
            Some(dir) => dir.join(binary),
            None => PathBuf::from(binary),
        }
    }

    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_seconds.map(std::time::Duration::from_secs)
    }
}

impl Config {
    /// Build a config from flat deployment properties
    /// (`scratch`, `aligner`, `blast-bin`, `max-evalue`, `threads`)
    pub fn from_properties(props: &HashMap<String, String>) -> Result<Config, HomologyError> {
        let mut config = Config::default();

        if let Some(scratch) = props.get("scratch") {
            config.scratch.scratch_dir = PathBuf::from(scratch);
        }
        if let Some(tool) = props.get("aligner") {
            config.aligner.tool = tool.parse()?;
        }
        if let Some(bin) = props.get("blast-bin") {
            config.aligner.bin_dir = Some(PathBuf::from(bin));
        }
        if let Some(evalue) = props.get("max-evalue") {
            config.aligner.max_evalue = evalue.trim().to_string();
        }
        if let Some(threads) = props.get("threads") {
            config.aligner.threads = threads
                .trim()
                .parse()
                .map_err(|_| HomologyError::Configuration(format!("Invalid thread count: {}", threads)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply `HOMOLOGY_*` environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var("HOMOLOGY_SCRATCH") {
            self.scratch.scratch_dir = PathBuf::from(dir);
        }
        if let Ok(bin) = std::env::var("HOMOLOGY_ALIGNER_BIN") {
            self.aligner.bin_dir = Some(PathBuf::from(bin));
        }
        if let Ok(evalue) = std::env::var("HOMOLOGY_MAX_EVALUE") {
            self.aligner.max_evalue = evalue;
        }
        if std::env::var("HOMOLOGY_PRESERVE_ON_FAILURE").is_ok() {
            self.scratch.preserve_on_failure = true;
        }
        self
    }

    pub fn validate(&self) -> Result<(), HomologyError> {
        match self.aligner.max_evalue.parse::<f64>() {
            Ok(v) if v >= 0.0 && v.is_finite() => {}
            _ => {
                return Err(HomologyError::Configuration(format!(
                    "max_evalue must be a non-negative number, got '{}'",
                    self.aligner.max_evalue
                )))
            }
        }
        if self.aligner.threads == 0 {
            return Err(HomologyError::Configuration("threads must be at least 1".to_string()));
        }
        if self.panel.ortholog_group_ids.is_empty() {
            return Err(HomologyError::Configuration(
                "panel.ortholog_group_ids must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, HomologyError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| HomologyError::Configuration(format!("Failed to parse config: {}", e)))?;
    config.validate()?;
    tracing::debug!(
        path = %path.as_ref().display(),
        tool = config.aligner.tool.name(),
        max_evalue = %config.aligner.max_evalue,
        "Loaded configuration"
    );
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), HomologyError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| HomologyError::Configuration(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
