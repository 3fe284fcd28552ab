use std::process;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;

use sleepwaste::memory_waste;

/// Hold a fixed amount of resident memory for a fixed wall-clock time.
#[derive(Parser, Debug)]
#[command(name = "sleepwaste")]
struct Args {
    /// time (s) to waste
    time: u64,

    /// memory (MB) to waste
    mem: usize,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Anything malformed on the command line collapses to the one-line usage
/// message and exit status 1; an explicit `--help` still gets the long form.
fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(err) if err.kind() == ErrorKind::DisplayHelp => err.exit(),
        Err(_) => {
            eprintln!("usage: sleepwaste TIME MEM");
            process::exit(1);
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = parse_args();

    memory_waste::waste_memory(args.mem, args.time)?;

    println!("slept for {} s and wasted {} MB", args.time, args.mem);
    Ok(())
}
