use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use kicad_falstad::convert;

#[derive(Parser)]
#[command(name = "kicad_falstad")]
#[command(about = "Convert a KiCad schematic into a Falstad circuit", long_about = None)]
#[command(version)]
struct Cli {
    /// KiCad schematic (.kicad_sch) to convert
    #[arg(value_hint = clap::ValueHint::FilePath)]
    input: PathBuf,

    /// Write the circuit here instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    output: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            err.print()?;
            // Same status as a negative exit code on Unix
            return Ok(ExitCode::from(255));
        }
        Err(err) => err.exit(),
    };

    // Initialize logger with default level (overridden by RUST_LOG)
    let env = Env::default().default_filter_or("warn");
    env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stderr)
        .init();

    let input = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    let netlist =
        convert(&input).with_context(|| format!("Failed to parse {}", cli.input.display()))?;

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            netlist.write_to(&mut out)?;
            out.flush()?;
            info!("Wrote {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            netlist.write_to(&mut out)?;
            out.flush()?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
