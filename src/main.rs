use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crosswin::{cross_similarity, CrossOptions, SparseMatrix};

/// Windowed sparse cross-similarity over document-term matrices
#[derive(Parser, Debug)]
#[command(name = "crosswin")]
#[command(about = "Score row pairs of sparse matrices within group/time windows", long_about = None)]
struct Args {
    /// Path to the JSON job file (matrices, metadata, options)
    input: PathBuf,

    /// Write the score triples here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Matrix exchange format: shape plus (row, col, value) entries.
#[derive(Debug, Deserialize)]
struct MatrixSpec {
    rows: usize,
    cols: usize,
    entries: Vec<(u32, u32, f64)>,
}

impl MatrixSpec {
    fn build(&self) -> crosswin::Result<SparseMatrix> {
        Ok(SparseMatrix::from_triplets(self.rows, self.cols, &self.entries)?)
    }
}

#[derive(Debug, Deserialize)]
struct Job {
    m: MatrixSpec,
    m2: Option<MatrixSpec>,
    /// Adjacency matrix for softprod/softl2, supplied alongside the options
    simmat: Option<MatrixSpec>,
    #[serde(default)]
    options: CrossOptions,
}

#[derive(Debug, Serialize)]
struct ScoreOutput {
    rows: usize,
    cols: usize,
    entries: Vec<(u32, u32, f64)>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting crosswin v{}", env!("CARGO_PKG_VERSION"));
    info!("Job file: {:?}", args.input);

    let job: Job = serde_json::from_str(&fs::read_to_string(&args.input)?)?;

    let m = job.m.build()?;
    let m2 = job.m2.as_ref().map(MatrixSpec::build).transpose()?;
    let mut options = job.options;
    options.simmat = job.simmat.as_ref().map(MatrixSpec::build).transpose()?;

    info!(
        "Primary matrix: {}x{} ({} nonzeros)",
        m.rows(),
        m.cols(),
        m.nnz()
    );

    let scores = cross_similarity(&m, m2.as_ref(), &options)?;
    info!(
        "Scored: {} surviving entries in a {}x{} matrix",
        scores.nnz(),
        scores.rows(),
        scores.cols()
    );

    let output = ScoreOutput {
        rows: scores.rows(),
        cols: scores.cols(),
        entries: scores.triplets(),
    };
    let rendered = serde_json::to_string_pretty(&output)?;
    match &args.output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!("Wrote {:?}", path);
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
