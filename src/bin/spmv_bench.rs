//! SpMV format benchmark driver
//!
//! Times SpMV on every storage format and reports the fastest one. With an
//! output directory the averages are also written to `<outdir>/runtime.csv`.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;

use sparsetune::io::{ensure_output_dir, read_matrix_market, write_runtime_csv};
use sparsetune::io::report::format_seconds;
use sparsetune::{tune, ExecutionSpace, Runtime, RuntimeConfig, SpmvUpdate, TuneConfig};

const USAGE: &str = "Usage: spmv-bench [OPTIONS] <filename> [outdir] <reps>";

#[derive(Parser, Debug)]
#[command(name = "spmv-bench", version, about = "Benchmark SpMV across sparse storage formats")]
struct Cli {
    /// <filename> [outdir] <reps>
    #[arg(value_name = "ARGS")]
    positionals: Vec<String>,

    /// Execution space of the timed kernels
    #[arg(long, default_value = "serial")]
    exec: ExecutionSpace,

    /// Worker threads for the threads execution space
    #[arg(long)]
    threads: Option<usize>,

    /// Reset y before every SpMV instead of accumulating into it
    #[arg(long)]
    overwrite: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

struct Args {
    filename: PathBuf,
    outdir: Option<PathBuf>,
    reps: usize,
}

impl Args {
    fn from_positionals(positionals: &[String]) -> Option<Self> {
        let (filename, outdir, reps) = match positionals {
            [filename, reps] => (filename, None, reps),
            [filename, outdir, reps] => (filename, Some(PathBuf::from(outdir)), reps),
            _ => return None,
        };
        let reps: usize = reps.parse().ok().filter(|&r| r > 0)?;

        Some(Self {
            filename: PathBuf::from(filename),
            outdir,
            reps,
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
        println!("\t<reps> must be a positive integer");
        return -1;
    };

    let mut config = RuntimeConfig::default().log_level(cli.log_level.clone());
    if let Some(threads) = cli.threads {
        config = config.threads(threads);
    }
    let runtime = match Runtime::initialize(&config) {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let update = if cli.overwrite {
        SpmvUpdate::Overwrite
    } else {
        SpmvUpdate::Accumulate
    };

    // Runtime is dropped on return, before process::exit
    match runtime.install(|| execute(&args, cli.exec, update)) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn execute(args: &Args, exec: ExecutionSpace, update: SpmvUpdate) -> anyhow::Result<()> {
    println!("\nRunning SpMV benchmark with:");
    println!("\tFilename    : {}", args.filename.display());
    if let Some(outdir) = &args.outdir {
        println!("\tOutDir      : {}", outdir.display());
    }
    println!("\tRepetitions : {}", args.reps);
    println!("\tExecution   : {}\n", exec.name());

    let mut matrix = match read_matrix_market(&args.filename) {
        Ok(matrix) => matrix,
        Err(e) => {
            eprintln!("Exception Raised:: {}", e);
            return Ok(());
        }
    };

    let config = TuneConfig::with_repetitions(args.reps)?.exec(exec).update(update);
    let selection = tune(&mut matrix, &config).context("benchmarking SpMV formats")?;

    for (fmt, avg) in selection.averages.iter() {
        println!("({}) | {}", fmt.index(), format_seconds(avg));
    }
    println!("Optimum Format = {}", selection.format.index());

    if let Some(outdir) = &args.outdir {
        ensure_output_dir(outdir)?;
        let path = write_runtime_csv(outdir, &selection)
            .with_context(|| format!("writing timings to {}", outdir.display()))?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}
