// Writes a synthetic input file for colsum:
//  row<N>\t<key>\t<count>\t<padding>
// with keys drawn uniformly from a random pool.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use rand::{distributions::Alphanumeric, rngs::StdRng, Rng, SeedableRng};
use tracing::info;

#[derive(Parser, Debug)]
struct Args {
    output: PathBuf,
    #[arg(long, default_value_t = 1_000_000)]
    records: u64,
    #[arg(long, default_value_t = 10_000)]
    keys: usize,
    #[arg(long, default_value_t = 1_000)]
    max_count: u64,
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter("info")
        .init();
    let args = Args::parse();
    ensure!(args.keys > 0, "--keys must be positive");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let pool: Vec<String> = (0..args.keys)
        .map(|_| {
            let len = rng.gen_range(3..=24);
            (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(len)
                .map(char::from)
                .collect()
        })
        .collect();

    let file = File::create(&args.output)
        .with_context(|| format!("create {}", args.output.display()))?;
    let mut out = BufWriter::new(file);
    for row in 0..args.records {
        let key = &pool[rng.gen_range(0..pool.len())];
        let count = rng.gen_range(0..=args.max_count);
        writeln!(out, "row{row}\t{key}\t{count}\t{}", row % 97)?;
    }
    out.flush()?;
    info!(
        path = %args.output.display(),
        records = args.records,
        keys = args.keys,
        "sample written"
    );
    Ok(())
}
