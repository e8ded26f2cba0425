// Reads a tab-separated file of records
//  <ignored>\t<key>\t<count>\t<ignored...>
// sums the counts per key across all records and prints the key with the
// largest sum:
//  max_key: <key> sum: <sum>
// Field positions can be moved with --key-field / --value-field (0-based).

use std::{
    io::{self, Write},
    num::NonZeroUsize,
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use colsum::{config::DEFAULT_BUCKETS, Config};

#[derive(Parser, Debug)]
#[command(about = "Sum a count column per key and report the key with the largest sum")]
struct Args {
    /// Tab-separated input file
    file: PathBuf,
    /// Worker threads; defaults to the available parallelism
    #[arg(short, long)]
    workers: Option<NonZeroUsize>,
    /// Hash buckets per table (power of two)
    #[arg(short, long, default_value_t = DEFAULT_BUCKETS)]
    buckets: usize,
    #[arg(long, default_value_t = 1)]
    key_field: usize,
    #[arg(long, default_value_t = 2)]
    value_field: usize,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(if args.verbose { "debug" } else { "warn" })
        .init();

    let mut config = Config {
        buckets: args.buckets,
        key_field: args.key_field,
        value_field: args.value_field,
        ..Config::default()
    };
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }
    let summary = colsum::run(&args.file, &config)
        .with_context(|| format!("cannot aggregate {}", args.file.display()))?;

    let mut out = io::stdout().lock();
    summary.write_line(&mut out)?;
    out.flush()?;
    Ok(())
}
