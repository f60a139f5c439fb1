//! The `squish compress` command.

mod batch;
pub mod types;

pub use types::{Collision, OutputFormat};

use clap::Args;
use squish_core::{Config, OutputFormat as CoreOutputFormat};
use std::path::PathBuf;

use batch::run_batch;

/// Arguments for the `compress` command.
#[derive(Args, Debug, Default)]
pub struct CompressArgs {
    /// Image files or directories to compress
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Directory to write compressed files and the archive to
    /// (defaults to `export.output_dir` from the config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Also bundle every compressed image into one zip archive
    #[arg(long)]
    pub zip: bool,

    /// Do not write individual compressed files
    #[arg(long)]
    pub no_files: bool,

    /// Report format (defaults to `output.format` from the config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,

    /// Embed original and compressed images as data URLs in the report
    #[arg(long)]
    pub previews: bool,

    /// Longest edge in pixels after resizing
    #[arg(long)]
    pub max_dimension: Option<u32>,

    /// Output budget as a fraction of the original size
    #[arg(long)]
    pub target_ratio: Option<f64>,

    /// Name collision handling for outputs and archive entries
    #[arg(long, value_enum)]
    pub collision: Option<Collision>,
}

/// Execute the compress command.
pub async fn execute(args: CompressArgs, config: Config) -> anyhow::Result<()> {
    let config = apply_overrides(config, &args)?;
    let output_dir = resolve_output_dir(&args, &config);
    let format = report_format(&args, &config)?;

    let summary = run_batch(&args, &config, &output_dir, format, std::io::stdout()).await?;
    if summary.succeeded == 0 && summary.failed > 0 {
        anyhow::bail!("No image could be compressed");
    }
    Ok(())
}

/// Fold command-line overrides into the config and re-validate it.
fn apply_overrides(mut config: Config, args: &CompressArgs) -> anyhow::Result<Config> {
    if let Some(max_dimension) = args.max_dimension {
        config.compression.max_dimension = max_dimension;
    }
    if let Some(target_ratio) = args.target_ratio {
        config.compression.target_ratio = target_ratio;
    }
    if let Some(collision) = args.collision {
        config.export.collision = collision.into();
    }
    if args.previews {
        config.output.include_previews = true;
    }
    if args.pretty {
        config.output.pretty = true;
    }
    config.validate()?;
    Ok(config)
}

fn resolve_output_dir(args: &CompressArgs, config: &Config) -> PathBuf {
    match &args.output {
        Some(path) => {
            let raw = path.to_string_lossy();
            PathBuf::from(shellexpand::tilde(&raw).into_owned())
        }
        None => config.output_dir(),
    }
}

fn report_format(args: &CompressArgs, config: &Config) -> anyhow::Result<CoreOutputFormat> {
    match args.format {
        Some(format) => Ok(format.into()),
        None => CoreOutputFormat::parse(&config.output.format).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown output.format {:?} (expected json or jsonl)",
                config.output.format
            )
        }),
    }
}
