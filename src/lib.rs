//! Parallel per-key summation over a memory-mapped tab-separated file.
//!
//! The input is mapped once, cut into line-aligned regions, and each region is
//! parsed on its own thread into a private table. The tables are then folded
//! into one, keeping track of the key with the largest sum.
pub mod config;
pub mod error;
pub mod hash;
pub mod mapped;
pub mod merge;
pub mod partition;
pub mod table;
pub mod worker;

use std::{path::Path, thread, time::Instant};

use tracing::{debug, info};

pub use config::Config;
pub use error::{Error, Result};
pub use merge::Summary;

use mapped::MappedFile;
use partition::Region;
use worker::Local;

pub fn run(file_path: &Path, config: &Config) -> Result<Summary> {
    config.validate()?;
    let data = MappedFile::open(file_path)?;
    info!(path = %file_path.display(), bytes = data.len(), "mapped input");
    aggregate(data.as_slice(), config)
}

/// Runs the partition, scan and merge steps over an in-memory buffer.
pub fn aggregate(data: &[u8], config: &Config) -> Result<Summary> {
    config.validate()?;
    let regions = partition::partition(data, config.workers);
    partition::verify(&regions, data)?;
    debug!(?regions, "partitioned input");

    let started = Instant::now();
    let mut locals = scan_regions(data, &regions, config)?.into_iter();
    info!(workers = regions.len(), elapsed = ?started.elapsed(), "all regions scanned");

    let seed = locals.next().ok_or(Error::Layout {
        offset: 0,
        reason: "no regions",
    })?;
    let summary = merge::merge(seed, locals).summary();
    info!(
        records = summary.records,
        keys = summary.distinct_keys,
        "merged worker tables"
    );
    Ok(summary)
}

/// Spawns one thread per region and waits for all of them.
fn scan_regions<'a>(
    data: &'a [u8],
    regions: &[Region],
    config: &Config,
) -> Result<Vec<Local<'a>>> {
    let fields = config.fields();
    let buckets = config.buckets;
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(regions.len());
        for (index, &region) in regions.iter().enumerate() {
            let handle = thread::Builder::new()
                .name(format!("worker-{index}"))
                .spawn_scoped(scope, move || -> Result<Local<'a>> {
                    let started = Instant::now();
                    let local = worker::run(data, region, fields, buckets)?;
                    debug!(
                        worker = index,
                        begin = region.begin,
                        end = region.end,
                        records = local.records,
                        keys = local.table.len(),
                        elapsed = ?started.elapsed(),
                        "region scanned"
                    );
                    Ok(local)
                })
                .map_err(Error::Spawn)?;
            handles.push(handle);
        }
        // Join every thread before looking at any result.
        let joined: Vec<_> = handles.into_iter().map(|handle| handle.join()).collect();
        joined
            .into_iter()
            .enumerate()
            .map(|(index, result)| {
                result
                    .map_err(|_| Error::Worker(index))
                    .and_then(|local| local)
            })
            .collect()
    })
}
