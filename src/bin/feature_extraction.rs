//! Structural feature extraction driver
//!
//! Loads a Matrix Market file, converts it to the requested format, extracts
//! the structural features and writes them to `<outdir>/features.csv`.
//! When the conversion is refused the features are taken from the matrix as
//! loaded, since they do not depend on the storage format.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;

use sparsetune::constants::NFORMATS;
use sparsetune::io::{ensure_output_dir, read_matrix_market, write_features_csv};
use sparsetune::{extract, ConversionLimits, FormatId, Runtime, RuntimeConfig};

const USAGE: &str = "Usage: feature-extraction [OPTIONS] <filename> <outdir> <fmt_id>";

#[derive(Parser, Debug)]
#[command(name = "feature-extraction", version, about = "Extract structural features of a sparse matrix")]
struct Cli {
    /// <filename> <outdir> <fmt_id>
    #[arg(value_name = "ARGS")]
    positionals: Vec<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

struct Args {
    filename: PathBuf,
    outdir: PathBuf,
    format: FormatId,
}

impl Args {
    fn from_positionals(positionals: &[String]) -> Option<Self> {
        let [filename, outdir, fmt_id] = positionals else {
            return None;
        };
        let format = fmt_id.parse::<usize>().ok().and_then(|id| FormatId::try_from(id).ok())?;

        Some(Self {
            filename: PathBuf::from(filename),
            outdir: PathBuf::from(outdir),
            format,
        })
    }
}

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return 0;
        }
        Err(e) => {
            println!("{}", e.render());
            return -1;
        }
    };

    let Some(args) = Args::from_positionals(&cli.positionals) else {
        println!("{}", USAGE);
        println!("\t<fmt_id> must be a format index below {}", NFORMATS);
        return -1;
    };

    let config = RuntimeConfig::default().log_level(cli.log_level);
    let runtime = match Runtime::initialize(&config) {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    // Runtime is dropped on return, before process::exit
    match runtime.install(|| execute(&args)) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn execute(args: &Args) -> anyhow::Result<()> {
    println!("\nRunning feature extraction with:");
    println!("\tFilename    : {}", args.filename.display());
    println!("\tOutDir      : {}", args.outdir.display());
    println!("\tFormat ID   : {}", args.format.index());

    let mut matrix = match read_matrix_market(&args.filename) {
        Ok(matrix) => matrix,
        Err(e) => {
            eprintln!("Exception Raised:: {}", e);
            return Ok(());
        }
    };

    if let Err(e) = matrix.convert_to(args.format, &ConversionLimits::default()) {
        eprintln!("Warning:: {}; extracting from {} instead", e, matrix.active_format());
    }

    let features = match extract(&matrix) {
        Ok(features) => features,
        Err(e) => {
            eprintln!("Exception Raised:: {}", e);
            return Ok(());
        }
    };
    println!("\nFeatures ({}):\n{}", matrix.active_format(), features);

    ensure_output_dir(&args.outdir)?;
    let path = write_features_csv(&args.outdir, &features)
        .with_context(|| format!("writing features to {}", args.outdir.display()))?;
    println!("Wrote {}", path.display());

    Ok(())
}
