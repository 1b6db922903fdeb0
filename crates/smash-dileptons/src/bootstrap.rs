use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use oscar_core::pdg::ParticleTable;

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a CLI log-level name onto a tracing filter directive.
///
/// Unknown names pass through unchanged so that full `EnvFilter`
/// directives such as `oscar_data=trace` keep working.
pub fn normalise_level(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to an [`EnvFilter`] directive, falling back to
/// `"info"` if it does not parse.  Output goes to `log_file` (appending,
/// no ANSI colours) when given, otherwise to stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(normalise_level(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let stderr_layer = match log_file {
        Some(_) => None,
        None => Some(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("initialising tracing subscriber")?;

    Ok(())
}

// ── Particle names ─────────────────────────────────────────────────────────────

/// Built-in particle names, extended from `path` when given.
pub fn load_particle_table(path: Option<&Path>) -> anyhow::Result<ParticleTable> {
    match path {
        Some(p) => ParticleTable::from_json_file(p)
            .with_context(|| format!("loading particle table {}", p.display())),
        None => Ok(ParticleTable::default()),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
