use clap::{Parser, Subcommand};
use derive_more::{Display, Error};
use exn::ResultExt;
use sidecar_config::{AssociateConfig, Config};
use sidecar_library::Context;
use sidecar_record::RowPolicy;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

type Result<T> = std::result::Result<T, exn::Exn<ErrorKind>>;

#[derive(Debug, Display, Error)]
enum ErrorKind {
    #[display("expected at least two directories: one or more sources, then the destination")]
    TooFewDirectories,
    #[display("unable to load configuration")]
    Config,
    #[display("merge failed")]
    Merge,
    #[display("association failed")]
    Associate,
}

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Log progress (info level). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Configuration file to use instead of the one in the user's
    /// configuration directory.
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge several directory trees into one, never overwriting files.
    Merge {
        /// Source directories, followed by the destination directory.
        #[arg(value_name = "DIR")]
        dirs: Vec<PathBuf>,
    },
    /// Pair metadata sidecars with their media files and write the result as JSON.
    Associate {
        /// Root of the exported tree.
        source: PathBuf,
        /// Where to write the association document.
        output: PathBuf,
        /// Suffix marking metadata sidecar files.
        #[arg(long, value_name = "SUFFIX", value_parser = clap::builder::NonEmptyStringValueParser::new())]
        marker: Option<String>,
        /// Drop metadata documents with more than one row instead of keeping the first.
        #[arg(long)]
        strict_rows: bool,
        /// Pretty-print the association document.
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:?}");
            ExitCode::FAILURE
        },
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { LevelFilter::INFO } else { LevelFilter::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::builder().with_default_directive(level.into()).from_env_lossy())
        .init();
}

fn run(cli: Cli) -> Result<()> {
    // Validated for every command, including those that don't use it.
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    match cli.command {
        Command::Merge { dirs } => merge(&dirs),
        Command::Associate { source, output, marker, strict_rows, pretty } => {
            let config = with_overrides(config.associate, marker, strict_rows, pretty);
            let count = associate(&config, &source, &output)?;
            println!("Output {count} associations into {}", output.display());
            Ok(())
        },
    }
}

fn merge(dirs: &[PathBuf]) -> Result<()> {
    let Some((destination, sources)) = dirs.split_last().filter(|(_, sources)| !sources.is_empty()) else {
        exn::bail!(ErrorKind::TooFewDirectories);
    };
    let report = sidecar_library::merge::merge(sources, destination).or_raise(|| ErrorKind::Merge)?;
    tracing::info!(
        copied = report.copied,
        skipped = report.skipped,
        failed = report.failed,
        "Merged {} directories into {}",
        sources.len(),
        destination.display()
    );
    Ok(())
}

fn associate(config: &AssociateConfig, source: &Path, output: &Path) -> Result<usize> {
    let ctx = Context::from(config);
    let report = sidecar_library::associate::associate(&ctx, source).or_raise(|| ErrorKind::Associate)?;
    sidecar_library::write_associations(output, &report.associations, config.pretty)
        .or_raise(|| ErrorKind::Associate)?;
    Ok(report.associations.len())
}

/// Applies command-line flags on top of the loaded configuration.
fn with_overrides(mut config: AssociateConfig, marker: Option<String>, strict_rows: bool, pretty: bool) -> AssociateConfig {
    if let Some(marker) = marker {
        config.marker = marker;
    }
    if strict_rows {
        config.rows = RowPolicy::RejectMultiple;
    }
    config.pretty |= pretty;
    config
}
