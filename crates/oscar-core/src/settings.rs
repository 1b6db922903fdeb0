use clap::Parser;
use std::path::PathBuf;

use crate::error::{OscarError, Result};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Parse SMASH dilepton output and histogram the reconstructed pairs
#[derive(Parser, Debug, Clone)]
#[command(
    name = "smash-dileptons",
    about = "Parse SMASH dilepton output and histogram the reconstructed pairs",
    version
)]
pub struct Settings {
    /// Top-level directory holding simulation output
    #[arg(long, default_value = ".")]
    pub base_path: PathBuf,

    /// Data subdirectory below the base path
    #[arg(long, default_value = "")]
    pub data_dir: String,

    /// Output file name inside each run directory
    #[arg(long, default_value = "Dileptons.oscar")]
    pub file_name: String,

    /// Read only `<base-path>/<data-dir>/<file-name>` instead of every run below it
    #[arg(long)]
    pub single_run: bool,

    /// Column to histogram
    #[arg(long, default_value = "m_inv")]
    pub bin_axis: String,

    /// Column holding the per-row weight
    #[arg(long, default_value = "block_weight_adj")]
    pub weight_column: String,

    /// Number of histogram bins
    #[arg(long, default_value = "35", value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub bins: u32,

    /// Lower edge of the first bin
    #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
    pub min: f64,

    /// Upper edge of the last bin
    #[arg(long, default_value = "0.7", allow_negative_numbers = true)]
    pub max: f64,

    /// Output mode
    #[arg(long, default_value = "text", value_parser = ["tui", "text", "json", "csv"])]
    pub output: String,

    /// Display theme for the terminal view
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// JSON file with extra PDG id → name entries
    #[arg(long)]
    pub particle_table: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply `--debug`.
    pub fn load() -> Self {
        Self::parse().apply_debug_flag()
    }

    /// Same as [`load`](Self::load) with an explicit argument list.
    pub fn try_load_from<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args).map(Self::apply_debug_flag)
    }

    /// Check value combinations clap cannot express.
    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(OscarError::Config(
                "histogram range must be finite".to_string(),
            ));
        }
        if self.min >= self.max {
            return Err(OscarError::Config(format!(
                "--min ({}) must be below --max ({})",
                self.min, self.max
            )));
        }
        if self.file_name.trim().is_empty() {
            return Err(OscarError::Config("--file-name is empty".to_string()));
        }
        Ok(())
    }

    /// `--debug` overrides the log level.
    fn apply_debug_flag(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
