use orbitsim::{run_simulation, RunConfig};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

/// Planar N-body leapfrog integrator.
///
/// Reads one initial record from the input and writes a trajectory record
/// every `--out` units of simulated time.
#[derive(Parser, Debug)]
#[command(name = "orbitsim", version)]
struct Args {
    /// Timestep [default: 1]
    #[arg(long)]
    step: Option<f64>,

    /// Output interval, in simulated time [default: 1]
    #[arg(long)]
    out: Option<f64>,

    /// End time of the simulation
    #[arg(long)]
    end: Option<f64>,

    /// Gravitational constant before mass normalization [default: 6.67384e-11]
    #[arg(long)]
    g_base: Option<f64>,

    /// Move the initial state into the center-of-mass frame
    #[arg(long)]
    recenter: bool,

    /// Log energy diagnostics every DIA units of simulated time
    #[arg(long)]
    dia: Option<f64>,

    /// YAML run configuration; command-line values take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial record [default: stdin]
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Trajectory output [default: stdout]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            step: self.step,
            out: self.out,
            end: self.end,
            g_base: self.g_base,
            recenter: self.recenter.then_some(true),
            diagnostics: self.dia,
        }
    }
}

// load here to keep main clean
fn load_config(args: &Args) -> Result<RunConfig> {
    let file_cfg = match &args.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open config {}", path.display()))?;
            RunConfig::from_yaml_reader(BufReader::new(file))
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => RunConfig::default(),
    };
    Ok(file_cfg.merge(args.run_config()))
}

fn open_input(path: &Option<PathBuf>) -> Result<Box<dyn BufRead>> {
    Ok(match path {
        Some(p) => {
            let file = File::open(p).with_context(|| format!("failed to open input {}", p.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    })
}

fn open_output(path: &Option<PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => {
            let file = File::create(p).with_context(|| format!("failed to create output {}", p.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    // step/out/end problems are reported before the input is touched
    let settings = load_config(&args)?.resolve().context("invalid run configuration")?;

    let input = open_input(&args.input)?;
    let output = open_output(&args.output)?;

    let summary = run_simulation(input, output, &settings).context("simulation aborted")?;
    tracing::info!(
        records = summary.records,
        rel_energy_error = summary.relative_energy_error(),
        "done"
    );

    Ok(())
}
