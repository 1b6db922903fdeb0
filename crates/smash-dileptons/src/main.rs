mod bootstrap;
mod report;

use std::io::{self, Write};

use anyhow::{Context, Result};
use oscar_core::models::ColumnRef;
use oscar_core::settings::Settings;
use oscar_data::analysis::{aggregate_runs, analyze_file, AnalysisResult};
use oscar_data::export::write_records_csv;
use oscar_data::histogram::{histogram_by_parent, linspace};
use oscar_data::reader::resolve_output_file;
use oscar_ui::app::App;

fn main() -> Result<()> {
    let settings = Settings::load();
    settings.validate()?;

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("smash-dileptons v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Input: base {}, dir '{}', file '{}', output {}",
        settings.base_path.display(),
        settings.data_dir,
        settings.file_name,
        settings.output
    );

    let particles = bootstrap::load_particle_table(settings.particle_table.as_deref())?;

    let (source, analysis) = load_analysis(&settings)?;

    let edges = linspace(settings.min, settings.max, settings.bins as usize + 1);
    let set = histogram_by_parent(
        &analysis.table,
        &ColumnRef::from(settings.bin_axis.as_str()),
        &ColumnRef::from(settings.weight_column.as_str()),
        &edges,
        &particles,
    )?;
    tracing::debug!(
        "Histogram: {} series, {} entries, {} skipped",
        set.series.len(),
        set.total.entries(),
        set.skipped
    );

    match settings.output.as_str() {
        "tui" => {
            App::new(&settings.theme, source).run_histogram(&set)?;
        }
        "json" => {
            let report = report::JsonReport {
                source: &source,
                metadata: &analysis.metadata,
                histogram: &set,
            };
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &report)?;
            writeln!(stdout)?;
        }
        "csv" => {
            write_records_csv(io::stdout().lock(), &analysis.table.records)?;
        }
        _ => {
            print!("{}", report::render_text(&source, &analysis.metadata, &set));
        }
    }

    Ok(())
}

/// Analyse one output file (`--single-run`) or every run below the data
/// directory.  Returns a description of the input alongside the result.
fn load_analysis(settings: &Settings) -> Result<(String, AnalysisResult)> {
    if settings.single_run {
        let path = resolve_output_file(&settings.file_name, &settings.data_dir, &settings.base_path)?;
        let result =
            analyze_file(&path).with_context(|| format!("analysing {}", path.display()))?;
        Ok((path.display().to_string(), result))
    } else {
        let result = aggregate_runs(&settings.base_path, &settings.data_dir, &settings.file_name)?;
        let root = settings.base_path.join(&settings.data_dir);
        let source = format!("{} run(s) below {}", result.metadata.files.len(), root.display());
        Ok((source, result))
    }
}
