use crate::cli::SweepCli;
use crate::platform::Platform;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Configuration for a sweep, loaded from an optional TOML file and overridden from the CLI.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    pub tool: ToolConfig,
    pub paths: PathsConfig,
}

/// How to invoke the external build tool.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// The program to run. Can be overridden with `BUILD_SWEEP_TOOL`.
    pub program: String,
    /// Arguments passed before anything else, for both the build and the report commands.
    pub args: Vec<String>,
    /// The target to build. Defaults to `<platform>Editor`.
    pub target: Option<String>,
    /// Flag placed before the level, only passed when the level is above 0.
    pub parallelism_flag: String,
    /// Arguments that make the tool print its time report.
    pub report_args: Vec<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: "perl".to_string(),
            args: vec!["jam.pl".to_string()],
            target: None,
            parallelism_flag: "-j".to_string(),
            report_args: vec!["time-report".to_string()],
        }
    }
}

impl ToolConfig {
    pub fn target_for(&self, platform: Platform) -> String {
        self.target
            .clone()
            .unwrap_or_else(|| platform.default_target())
    }
}

/// Locations used by a sweep. Relative paths are resolved against `workdir`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub workdir: PathBuf,
    pub output_parent: PathBuf,
    /// Directory of profiling artifacts the tool leaves behind after a build.
    pub artifacts: PathBuf,
    /// Single files copied next to the profiling artifacts.
    pub extra_artifacts: Vec<PathBuf>,
    /// Paths removed before every build.
    pub clean: Vec<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from("."),
            output_parent: PathBuf::from(".."),
            artifacts: PathBuf::from("artifacts/BuildProfile"),
            extra_artifacts: vec![PathBuf::from("artifacts/profile.json")],
            clean: vec![PathBuf::from("build"), PathBuf::from("artifacts")],
        }
    }
}

impl PathsConfig {
    /// Resolve a configured path against the working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workdir.join(path)
        }
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.resolve(&self.artifacts)
    }

    pub fn extra_artifact_files(&self) -> Vec<PathBuf> {
        self.extra_artifacts.iter().map(|p| self.resolve(p)).collect()
    }

    pub fn clean_paths(&self) -> Vec<PathBuf> {
        self.clean.iter().map(|p| self.resolve(p)).collect()
    }

    pub fn output_parent_dir(&self) -> PathBuf {
        self.resolve(&self.output_parent)
    }
}

impl SweepConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the file named on the CLI, if any, and apply the CLI overrides on top.
    pub fn from_cli(cli: &SweepCli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &SweepCli) {
        if let Some(workdir) = &cli.workdir {
            self.paths.workdir = workdir.clone();
        }
        if let Some(output_parent) = &cli.output_parent {
            self.paths.output_parent = output_parent.clone();
        }
    }
}
