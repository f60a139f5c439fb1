//! Batch reports in JSON or JSON Lines.
//!
//! JSON writes one object with `images`, `failures` and `summary`. JSON Lines
//! writes one tagged object per line: each image, each failure, then the
//! summary.

use serde::Serialize;
use std::io::{self, Write};

use crate::batch::{BatchState, FailedImage};
use crate::preview::PreviewRecord;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON document
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Totals for one batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Size of the inputs that compressed successfully
    pub original_bytes: u64,
    pub compressed_bytes: u64,
    /// `compressed_bytes / original_bytes`, 0 when nothing compressed
    pub ratio: f64,
    pub export_ready: bool,
}

impl BatchSummary {
    pub fn from_state(state: &BatchState) -> Self {
        let outcomes = state.outcomes();
        let original_bytes: u64 = outcomes.iter().map(|o| o.original_size_bytes).sum();
        let compressed_bytes: u64 = outcomes.iter().map(|o| o.compressed_size_bytes()).sum();
        let ratio = if original_bytes > 0 {
            compressed_bytes as f64 / original_bytes as f64
        } else {
            0.0
        };
        Self {
            succeeded: outcomes.len(),
            failed: state.failures().len(),
            original_bytes,
            compressed_bytes,
            ratio,
            export_ready: state.is_export_ready(),
        }
    }
}

/// Everything reported for one batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub images: Vec<PreviewRecord>,
    pub failures: Vec<FailedImage>,
    pub summary: BatchSummary,
}

impl BatchReport {
    pub fn from_state(state: &BatchState, with_previews: bool) -> Self {
        Self {
            images: state
                .outcomes()
                .into_iter()
                .map(|o| PreviewRecord::from_outcome(o, with_previews))
                .collect(),
            failures: state.failures().to_vec(),
            summary: BatchSummary::from_state(state),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ReportLine<'a> {
    Image(&'a PreviewRecord),
    Failure(&'a FailedImage),
    Summary(&'a BatchSummary),
}

/// Serializes batch reports to a writer.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects [`OutputFormat::Json`].
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    pub fn write_report(&mut self, report: &BatchReport) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, report)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, report).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
            }
            OutputFormat::JsonLines => {
                let lines = report
                    .images
                    .iter()
                    .map(ReportLine::Image)
                    .chain(report.failures.iter().map(ReportLine::Failure))
                    .chain(std::iter::once(ReportLine::Summary(&report.summary)));
                for line in lines {
                    serde_json::to_writer(&mut self.writer, &line).map_err(io::Error::other)?;
                    writeln!(self.writer)?;
                }
            }
        }
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
