//! Configuration settings for the crossword generator

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub input: InputConfig,
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Grid structure file: `_` for fillable cells, anything else is blocked
    pub structure_file: PathBuf,
    /// Word list, one word per line
    pub words_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Run AC-3 over every arc before the search starts
    #[serde(default = "default_true")]
    pub enforce_arc_consistency: bool,
    /// Re-run AC-3 on the neighbours of every tentatively assigned slot
    #[serde(default)]
    pub maintain_arc_consistency: bool,
    /// Explore the first slot's candidates on separate workers
    #[serde(default)]
    pub parallel: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    #[serde(default)]
    pub output_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: InputConfig {
                structure_file: PathBuf::from("data/structure0.txt"),
                words_file: PathBuf::from("data/words0.txt"),
            },
            solver: SolverConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Text,
                output_file: None,
            },
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            enforce_arc_consistency: true,
            maintain_arc_consistency: false,
            parallel: false,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if !self.input.structure_file.exists() {
            anyhow::bail!("Structure file does not exist: {}", self.input.structure_file.display());
        }

        if !self.input.words_file.exists() {
            anyhow::bail!("Words file does not exist: {}", self.input.words_file.display());
        }

        if let Some(ref output_file) = self.output.output_file {
            if output_file.is_dir() {
                anyhow::bail!("Output path is a directory: {}", output_file.display());
            }
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref structure_file) = cli_overrides.structure_file {
            self.input.structure_file = structure_file.clone();
        }
        if let Some(ref words_file) = cli_overrides.words_file {
            self.input.words_file = words_file.clone();
        }
        if let Some(ref output_file) = cli_overrides.output_file {
            self.output.output_file = Some(output_file.clone());
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
        // Flags can only switch these on; a config file may already have.
        if cli_overrides.maintain_arc_consistency {
            self.solver.maintain_arc_consistency = true;
        }
        if cli_overrides.parallel {
            self.solver.parallel = true;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub structure_file: Option<PathBuf>,
    pub words_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub maintain_arc_consistency: bool,
    pub parallel: bool,
}
