//! Batch run: selection, progress, outputs, report and summary.

use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use squish_core::types::format_size;
use squish_core::{
    BatchCoordinator, BatchReport, BatchSummary, Config, ExportPackager, FailedImage,
    FileSelector, OutputFormat, OutputWriter,
};

use super::CompressArgs;

/// Compress the selection named by `args`, write outputs into `output_dir`
/// and the report into `report_out`.
pub async fn run_batch<W: Write>(
    args: &CompressArgs,
    config: &Config,
    output_dir: &Path,
    format: OutputFormat,
    report_out: W,
) -> anyhow::Result<BatchSummary> {
    let files = FileSelector::new(args.recursive).select(&args.paths)?;

    let mut batch = BatchCoordinator::new(config);
    if batch.select(files).is_none() {
        tracing::warn!("No image files found in {:?}", args.paths);
        return Ok(BatchSummary::from_state(batch.state()));
    }
    tracing::info!("Compressing {} image(s)", batch.state().total_expected());

    let start_time = Instant::now();
    let progress = create_progress_bar(batch.state().total_expected() as u64);
    while let Some(event) = batch.next_event().await {
        progress.inc(1);
        progress.set_message(event.name);
    }
    progress.finish_and_clear();
    let elapsed = start_time.elapsed();

    let state = batch.state();
    let packager = ExportPackager::new(&config.export);

    if !args.no_files && state.outcome_count() > 0 {
        let written = packager.write_files(output_dir, state.outcomes())?;
        tracing::info!("Wrote {} file(s) to {:?}", written.len(), output_dir);
    }

    if args.zip {
        if state.is_export_ready() {
            let path = packager.write_to_dir(output_dir, state.outcomes())?;
            tracing::info!("Archive written to {:?}", path);
        } else {
            tracing::warn!("Nothing to archive: every image failed");
        }
    }

    let report = BatchReport::from_state(state, config.output.include_previews);
    let mut writer = OutputWriter::new(report_out, format, config.output.pretty);
    writer.write_report(&report)?;

    print_summary(&report.summary, &report.failures, elapsed);
    Ok(report.summary)
}

/// Create a progress bar for batch processing.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table to stderr.
fn print_summary(summary: &BatchSummary, failures: &[FailedImage], elapsed: Duration) {
    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Succeeded:    {:>8}", summary.succeeded);
    if summary.failed > 0 {
        eprintln!("    Failed:       {:>8}", summary.failed);
        for failure in failures {
            eprintln!("      - {}", failure.name);
        }
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Before:       {:>10}", format_size(summary.original_bytes));
    eprintln!("    After:        {:>10}", format_size(summary.compressed_bytes));
    eprintln!("    Ratio:        {:>9.1}%", summary.ratio * 100.0);
    eprintln!("    Duration:     {:>9.1}s", elapsed.as_secs_f64());
    eprintln!("  ====================================");
}
